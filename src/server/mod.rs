//! Listener setup and the accept loop.

pub mod connection;
pub mod listener;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use crate::config::Settings;
use crate::handler::Router;
use crate::logger;

pub use listener::create_listener;

/// Bind the configured address and serve until the process is killed.
///
/// The route table is built by the caller and immutable from here on. A
/// bind failure is returned rather than retried; the binaries treat it as
/// fatal.
pub async fn run(settings: Settings, router: Router) -> Result<(), Box<dyn std::error::Error>> {
    let addr = settings.socket_addr()?;
    let tcp_listener = listener::create_listener(addr)?;

    logger::log_server_start(&addr, &settings);
    for mount in router.mounts() {
        logger::log_mount(mount);
    }
    logger::log_server_ready();

    let router = Arc::new(router);
    let settings = Arc::new(settings);
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        match tcp_listener.accept().await {
            Ok((stream, peer_addr)) => {
                connection::accept_connection(
                    stream,
                    peer_addr,
                    &router,
                    &settings,
                    &active_connections,
                );
            }
            Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
        }
    }
}
