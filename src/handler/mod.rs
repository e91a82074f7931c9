//! Request handling: the handler capability, the static file handler, and
//! the route table that dispatches to per-mount handler chains.

pub mod router;
pub mod static_files;

use std::future::Future;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};

pub use router::{Mount, Router};
pub use static_files::Files;

/// The unit of composition for request processing: turn one request into
/// one response.
///
/// Middleware wraps one `Handler` in another; the innermost link is the
/// static file handler. Request bodies are dropped at the connection layer
/// (a file server never reads them), so handlers see `Request<()>`, which
/// also keeps them trivially constructible in tests.
pub trait Handler: Send + Sync {
    fn handle(&self, req: Request<()>) -> impl Future<Output = Response<Full<Bytes>>> + Send;
}
