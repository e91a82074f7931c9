//! Route table construction and dispatch.
//!
//! The table is built once at startup from an ordered list of [`Mount`]s
//! and never changes afterwards; dispatch walks it per request and picks
//! the longest matching prefix.

use std::borrow::Cow;
use std::path::PathBuf;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use percent_encoding::percent_decode_str;

use crate::handler::{Files, Handler};
use crate::http;
use crate::middleware::{Cors, StripPrefix};

/// One route-table entry: a URL path prefix mapped onto a filesystem root.
///
/// A prefix ending in `/` owns the whole subtree beneath it; a prefix
/// without a trailing slash matches exactly one path.
#[derive(Debug, Clone)]
pub struct Mount {
    pub prefix: String,
    pub root: PathBuf,
    pub strip: Option<String>,
}

impl Mount {
    pub fn new(prefix: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self { prefix: prefix.into(), root: root.into(), strip: None }
    }

    /// Remove `prefix` from the request path before the filesystem lookup.
    #[must_use]
    pub fn strip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.strip = Some(prefix.into());
        self
    }
}

/// The handler chain for one mount, composed once at construction. CORS
/// sits outermost so even prefix-stripping rejections carry its headers.
enum Pipeline {
    Direct(Cors<Files>),
    Stripped(Cors<StripPrefix<Files>>),
}

impl Pipeline {
    fn build(mount: &Mount) -> Self {
        let files = Files::new(&mount.root);
        match &mount.strip {
            Some(prefix) => Self::Stripped(Cors::new(StripPrefix::new(prefix, files))),
            None => Self::Direct(Cors::new(files)),
        }
    }

    async fn handle(&self, req: Request<()>) -> Response<Full<Bytes>> {
        match self {
            Self::Direct(handler) => handler.handle(req).await,
            Self::Stripped(handler) => handler.handle(req).await,
        }
    }
}

struct Route {
    mount: Mount,
    pipeline: Pipeline,
}

/// Immutable route table.
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new(mounts: Vec<Mount>) -> Self {
        let routes = mounts
            .into_iter()
            .map(|mount| Route { pipeline: Pipeline::build(&mount), mount })
            .collect();
        Self { routes }
    }

    /// The configured mounts, in registration order.
    pub fn mounts(&self) -> impl Iterator<Item = &Mount> {
        self.routes.iter().map(|route| &route.mount)
    }

    /// Route one request to its mount's handler chain.
    ///
    /// Prefixes are matched against the percent-decoded path; the request
    /// itself is passed on unmodified, so a stripping mount still sees the
    /// wire form. Paths that match no mount get a plain 404 with none of
    /// the mount middleware applied.
    pub async fn dispatch(&self, req: Request<()>) -> Response<Full<Bytes>> {
        let path = decode_for_match(req.uri().path());

        // A subtree mount "/p/" also owns "/p": redirect to the slashed
        // form before prefix matching, keeping any query string.
        if self.redirects_to_subtree(&path) {
            let location = match req.uri().query() {
                Some(q) => format!("{path}/?{q}"),
                None => format!("{path}/"),
            };
            return http::moved_permanently(&location);
        }

        match self.best_match(&path) {
            Some(route) => route.pipeline.handle(req).await,
            None => http::not_found(),
        }
    }

    /// True when `path` has no mount of its own but `path + "/"` names a
    /// registered subtree.
    fn redirects_to_subtree(&self, path: &str) -> bool {
        if path.ends_with('/') {
            return false;
        }
        if self.routes.iter().any(|route| route.mount.prefix == path) {
            return false;
        }
        self.routes
            .iter()
            .any(|route| route.mount.prefix.len() > 1 && route.mount.prefix.strip_suffix('/') == Some(path))
    }

    /// Longest matching mount for `path`, if any.
    fn best_match(&self, path: &str) -> Option<&Route> {
        self.routes
            .iter()
            .filter(|route| prefix_matches(&route.mount.prefix, path))
            .max_by_key(|route| route.mount.prefix.len())
    }
}

/// Subtree prefixes (trailing `/`) match everything beneath them; other
/// patterns match exactly.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix.ends_with('/') {
        path.starts_with(prefix)
    } else {
        path == prefix
    }
}

/// Percent-decode a path for prefix matching. Undecodable paths are
/// matched as sent.
fn decode_for_match(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map_or_else(|_| raw.to_string(), Cow::into_owned)
}
