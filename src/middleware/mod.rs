//! Composable request middleware.
//!
//! Each middleware owns the next handler in the chain and implements
//! [`Handler`](crate::handler::Handler) itself, so chains are plain nested
//! values built once at startup.

pub mod cors;
pub mod strip_prefix;

pub use cors::Cors;
pub use strip_prefix::StripPrefix;
