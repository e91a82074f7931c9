//! Path prefix stripping.
//!
//! Adapts mount-level URLs to root-relative file lookups: a bundle mounted
//! at `/app/` whose URLs are built as `/app/<asset>` strips `/app` before
//! the filesystem layer sees the path.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response, Uri};

use crate::handler::Handler;
use crate::http;
use crate::logger;

/// Removes a literal leading prefix from the request path before
/// delegating. Paths that do not carry the prefix are answered with a 404
/// and never reach the inner handler.
pub struct StripPrefix<H> {
    prefix: String,
    inner: H,
}

impl<H> StripPrefix<H> {
    pub fn new(prefix: impl Into<String>, inner: H) -> Self {
        Self { prefix: prefix.into(), inner }
    }
}

impl<H: Handler> Handler for StripPrefix<H> {
    async fn handle(&self, req: Request<()>) -> Response<Full<Bytes>> {
        let path = req.uri().path();
        let Some(rest) = path.strip_prefix(self.prefix.as_str()) else {
            return http::not_found();
        };
        // An exactly-matching path strips down to "", which the file layer
        // expects as "/".
        let rest = if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{rest}")
        };
        match rewrite_path(req, &rest) {
            Some(req) => self.inner.handle(req).await,
            None => {
                logger::log_warning(&format!(
                    "Unrewritable path after stripping '{}': {rest}",
                    self.prefix
                ));
                http::not_found()
            }
        }
    }
}

/// Replace the request path, keeping the query string intact.
fn rewrite_path(req: Request<()>, path: &str) -> Option<Request<()>> {
    let (mut parts, body) = req.into_parts();
    let path_and_query = match parts.uri.query() {
        Some(q) => format!("{path}?{q}"),
        None => path.to_string(),
    };
    let mut uri_parts = parts.uri.into_parts();
    uri_parts.path_and_query = Some(path_and_query.parse().ok()?);
    parts.uri = Uri::from_parts(uri_parts).ok()?;
    Some(Request::from_parts(parts, body))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use hyper::{Method, StatusCode};

    use super::*;

    /// Inner handler that records the path-and-query it was given.
    struct PathRecorder {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl PathRecorder {
        fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (Self { seen: Arc::clone(&seen) }, seen)
        }
    }

    impl Handler for PathRecorder {
        async fn handle(&self, req: Request<()>) -> Response<Full<Bytes>> {
            let uri = req.uri();
            let recorded = match uri.query() {
                Some(q) => format!("{}?{q}", uri.path()),
                None => uri.path().to_string(),
            };
            self.seen.lock().unwrap().push(recorded);
            Response::new(Full::new(Bytes::new()))
        }
    }

    fn request(path: &str) -> Request<()> {
        Request::builder().method(Method::GET).uri(path).body(()).unwrap()
    }

    #[tokio::test]
    async fn test_strips_prefix_before_delegating() {
        let (recorder, seen) = PathRecorder::new();
        let strip = StripPrefix::new("/app", recorder);

        let resp = strip.handle(request("/app/main.js")).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(*seen.lock().unwrap(), ["/main.js"]);
    }

    #[tokio::test]
    async fn test_query_string_survives_the_rewrite() {
        let (recorder, seen) = PathRecorder::new();
        let strip = StripPrefix::new("/app", recorder);

        strip.handle(request("/app/bundle.js?v=3")).await;

        assert_eq!(*seen.lock().unwrap(), ["/bundle.js?v=3"]);
    }

    #[tokio::test]
    async fn test_exact_prefix_strips_to_root() {
        let (recorder, seen) = PathRecorder::new();
        let strip = StripPrefix::new("/app", recorder);

        strip.handle(request("/app")).await;

        assert_eq!(*seen.lock().unwrap(), ["/"]);
    }

    #[tokio::test]
    async fn test_non_matching_path_is_rejected() {
        let (recorder, seen) = PathRecorder::new();
        let strip = StripPrefix::new("/apps/github", recorder);

        let resp = strip.handle(request("/apps/other/main.js")).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(seen.lock().unwrap().is_empty());
    }
}
