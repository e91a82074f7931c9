//! Static file serving for one mount root.
//!
//! Lookup semantics follow the classic file-server contract: directories
//! without a trailing slash redirect to the slashed form, directories with
//! one serve `index.html` when present and a generated listing otherwise,
//! and plain files are served with conditional and range support.

use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use tokio::fs;

use crate::handler::Handler;
use crate::http::{self, etag, mime, RangeOutcome};
use crate::logger;

const INDEX_PAGE: &str = "index.html";

/// Characters escaped in listing hrefs beyond the control set.
const HREF_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'&')
    .add(b'\'');

/// Serves files from a single root directory.
///
/// The root is stored as configured; it is resolved against the working
/// directory on every request so a root created after startup still works.
pub struct Files {
    root: PathBuf,
}

/// Request fields the file layer cares about, extracted up front so the
/// lookup code does not carry the whole request around.
struct FileRequest<'a> {
    path: String,
    query: Option<&'a str>,
    is_head: bool,
    if_none_match: Option<&'a str>,
    range: Option<&'a str>,
}

impl Files {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Handler for Files {
    async fn handle(&self, req: Request<()>) -> Response<Full<Bytes>> {
        let Some(path) = decode_path(req.uri().path()) else {
            return http::not_found();
        };
        let file_req = FileRequest {
            path,
            query: req.uri().query(),
            is_head: *req.method() == Method::HEAD,
            if_none_match: header_str(&req, "if-none-match"),
            range: header_str(&req, "range"),
        };
        self.serve(&file_req).await
    }
}

impl Files {
    async fn serve(&self, req: &FileRequest<'_>) -> Response<Full<Bytes>> {
        let root = match self.root.canonicalize() {
            Ok(root) => root,
            Err(e) => {
                logger::log_warning(&format!(
                    "Serve root '{}' is not accessible: {e}",
                    self.root.display()
                ));
                return http::not_found();
            }
        };

        let relative = req.path.trim_start_matches('/').trim_end_matches('/');
        let wants_dir = relative.is_empty() || req.path.ends_with('/');
        let target = root.join(relative);
        let Ok(meta) = fs::metadata(&target).await else {
            return http::not_found();
        };

        if meta.is_dir() {
            if !wants_dir {
                // Redirect to the slashed form. Relative, so it lands on
                // the original URL even behind a stripped prefix.
                let base = relative.rsplit('/').next().unwrap_or(relative);
                return http::moved_permanently(&with_query(&format!("{base}/"), req.query));
            }
            let index = target.join(INDEX_PAGE);
            if fs::metadata(&index).await.is_ok_and(|m| m.is_file()) {
                return serve_file(&root, &index, req).await;
            }
            return serve_listing(&target, req.is_head).await;
        }

        if wants_dir && !relative.is_empty() {
            // Regular file requested with a trailing slash: point back at
            // the file itself.
            let base = relative.rsplit('/').next().unwrap_or(relative);
            return http::moved_permanently(&with_query(&format!("../{base}"), req.query));
        }

        serve_file(&root, &target, req).await
    }
}

/// Serve one regular file: containment check, conditional GET, range, then
/// the full entity.
async fn serve_file(root: &Path, file_path: &Path, req: &FileRequest<'_>) -> Response<Full<Bytes>> {
    let Ok(canonical) = file_path.canonicalize() else {
        return http::not_found();
    };
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Blocked path escaping '{}': {}",
            root.display(),
            canonical.display()
        ));
        return http::not_found();
    }

    let content = match fs::read(&canonical).await {
        Ok(content) => content,
        Err(e) => {
            logger::log_error(&format!("Failed to read '{}': {e}", canonical.display()));
            return http::not_found();
        }
    };

    let content_type = mime::from_extension(canonical.extension().and_then(|e| e.to_str()));
    let tag = etag::compute(&content);
    if etag::matches(req.if_none_match, &tag) {
        return http::not_modified(&tag);
    }

    let total = content.len();
    match http::parse_range(req.range, total) {
        RangeOutcome::Satisfiable(range) => {
            let start = range.start;
            let end = range.end_position(total);
            http::partial_entity(
                Bytes::copy_from_slice(&content[start..=end]),
                content_type,
                &tag,
                start,
                end,
                total,
                req.is_head,
            )
        }
        RangeOutcome::Unsatisfiable => http::range_not_satisfiable(total),
        RangeOutcome::Ignored => {
            http::full_entity(Bytes::from(content), content_type, &tag, req.is_head)
        }
    }
}

/// Percent-decode a request path. Rejects undecodable bytes, embedded NUL,
/// and `..` segments; an empty result becomes `/`.
fn decode_path(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    if decoded.contains('\0') {
        return None;
    }
    if decoded.split('/').any(|segment| segment == "..") {
        return None;
    }
    if decoded.is_empty() {
        return Some("/".to_string());
    }
    Some(decoded.into_owned())
}

fn header_str<'a>(req: &'a Request<()>, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn with_query(location: &str, query: Option<&str>) -> String {
    match query {
        Some(q) => format!("{location}?{q}"),
        None => location.to_string(),
    }
}

/// Render a directory listing, entries sorted by name with directories
/// marked by a trailing slash.
async fn serve_listing(dir: &Path, is_head: bool) -> Response<Full<Bytes>> {
    let mut reader = match fs::read_dir(dir).await {
        Ok(reader) => reader,
        Err(e) => {
            logger::log_error(&format!("Failed to list '{}': {e}", dir.display()));
            return http::not_found();
        }
    };

    let mut entries = Vec::new();
    while let Ok(Some(entry)) = reader.next_entry().await {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort();

    http::html_page(listing_html(&entries), is_head)
}

fn listing_html(entries: &[String]) -> String {
    let mut page = String::from("<pre>\n");
    for name in entries {
        let href = utf8_percent_encode(name, HREF_ESCAPES);
        page.push_str(&format!("<a href=\"{href}\">{}</a>\n", html_escape(name)));
    }
    page.push_str("</pre>\n");
    page
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
