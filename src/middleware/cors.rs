//! Permissive CORS decoration.
//!
//! The served bundles are fetched from pages living on other origins, so
//! every response carries the full allow-everything header set and
//! preflights are answered directly.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use hyper::{Method, Request, Response};

use crate::handler::Handler;

/// Origins allowed to read responses: any.
pub const ALLOW_ORIGIN: &str = "*";
/// Methods a preflight may ask for.
pub const ALLOW_METHODS: &str = "POST, GET, PUT, OPTIONS, DELETE";
/// Request headers a preflight may ask for.
pub const ALLOW_HEADERS: &str =
    "Accept, Content-Type, Content-Length, Accept-Encoding, Authorization";

/// Wraps a handler so every response it produces carries the permissive
/// CORS headers, and `OPTIONS` preflights are answered with an empty 200
/// without invoking the wrapped handler at all.
pub struct Cors<H> {
    inner: H,
}

impl<H> Cors<H> {
    pub const fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H: Handler> Handler for Cors<H> {
    async fn handle(&self, req: Request<()>) -> Response<Full<Bytes>> {
        if *req.method() == Method::OPTIONS {
            // Preflight: the inner handler never runs, not even for paths
            // it would reject.
            return decorate(Response::new(Full::new(Bytes::new())));
        }
        decorate(self.inner.handle(req).await)
    }
}

/// Set the three `Access-Control-*` headers, replacing any values the inner
/// handler may have produced.
fn decorate(mut resp: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    let headers = resp.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    resp
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use hyper::StatusCode;

    use super::*;

    /// Inner handler that counts invocations and replies with a fixed
    /// status.
    struct Upstream {
        hits: Arc<AtomicUsize>,
        status: StatusCode,
    }

    impl Upstream {
        fn new(status: StatusCode) -> (Self, Arc<AtomicUsize>) {
            let hits = Arc::new(AtomicUsize::new(0));
            (Self { hits: Arc::clone(&hits), status }, hits)
        }
    }

    impl Handler for Upstream {
        async fn handle(&self, _req: Request<()>) -> Response<Full<Bytes>> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            let mut resp = Response::new(Full::new(Bytes::from_static(b"inner")));
            *resp.status_mut() = self.status;
            resp
        }
    }

    fn request(method: Method, path: &str) -> Request<()> {
        Request::builder().method(method).uri(path).body(()).unwrap()
    }

    fn header<'a>(resp: &'a Response<Full<Bytes>>, name: &str) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_preflight_short_circuits_inner_handler() {
        let (upstream, hits) = Upstream::new(StatusCode::OK);
        let cors = Cors::new(upstream);

        let resp = cors.handle(request(Method::OPTIONS, "/anything")).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
        assert_eq!(
            header(&resp, "access-control-allow-methods"),
            Some("POST, GET, PUT, OPTIONS, DELETE")
        );
        assert_eq!(
            header(&resp, "access-control-allow-headers"),
            Some("Accept, Content-Type, Content-Length, Accept-Encoding, Authorization")
        );
    }

    #[tokio::test]
    async fn test_non_options_requests_pass_through_decorated() {
        let (upstream, hits) = Upstream::new(StatusCode::OK);
        let cors = Cors::new(upstream);

        let resp = cors.handle(request(Method::GET, "/file.js")).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
    }

    #[tokio::test]
    async fn test_error_responses_are_decorated_too() {
        let (upstream, _) = Upstream::new(StatusCode::NOT_FOUND);
        let cors = Cors::new(upstream);

        let resp = cors.handle(request(Method::DELETE, "/missing")).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
        assert!(header(&resp, "access-control-allow-headers").is_some());
    }

    #[tokio::test]
    async fn test_inner_cors_headers_are_replaced() {
        struct Opinionated;
        impl Handler for Opinionated {
            async fn handle(&self, _req: Request<()>) -> Response<Full<Bytes>> {
                let mut resp = Response::new(Full::new(Bytes::new()));
                resp.headers_mut().insert(
                    ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("https://example.com"),
                );
                resp
            }
        }

        let cors = Cors::new(Opinionated);
        let resp = cors.handle(request(Method::GET, "/")).await;

        assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
    }
}
