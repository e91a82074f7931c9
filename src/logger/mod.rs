//! Logging for the server binaries.
//!
//! Two streams: an access/info stream (startup banner, optional per-request
//! lines) and an error stream. Each goes to stdout/stderr or to a file,
//! chosen at startup from settings.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use crate::config::Settings;
use crate::handler::Mount;

/// Wire up log targets from settings. Call once, before serving.
pub fn init(settings: &Settings) -> std::io::Result<()> {
    writer::init(
        settings.logging.access_log_file.as_deref(),
        settings.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(writer) => writer.write_info(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(writer) => writer.write_error(message),
        None => eprintln!("{message}"),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(writer) => writer.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, settings: &Settings) {
    write_info("======================================");
    write_info("Static file server started");
    write_info(&format!("Listening on: http://{addr}"));
    if let Some(workers) = settings.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = settings.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = settings.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
}

/// One startup line per configured mount.
pub fn log_mount(mount: &Mount) {
    match &mount.strip {
        Some(stripped) => write_info(&format!(
            "Serving {} at {} (strip {stripped})",
            mount.root.display(),
            mount.prefix
        )),
        None => {
            write_info(&format!("Serving {} at {}", mount.root.display(), mount.prefix));
        }
    }
}

pub fn log_server_ready() {
    write_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Render and emit one access line.
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
