//! distserve - small CORS-wrapped static file servers
//!
//! One library, two binaries. Each binary fixes a route table (URL prefix to
//! filesystem root, with optional prefix stripping) at startup and serves it
//! over HTTP/1.1, decorating every routed response with permissive CORS
//! headers. Built on tokio and hyper.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod middleware;
pub mod server;
