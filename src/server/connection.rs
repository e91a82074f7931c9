//! Per-connection handling.
//!
//! Each accepted stream is served on its own task: HTTP/1.1 with keep-alive
//! per settings, a whole-connection timeout, and an optional access log
//! line per request.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use http_body_util::Full;
use hyper::body::{Body as _, Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::Settings;
use crate::handler::Router;
use crate::logger;
use crate::logger::AccessLogEntry;

/// Admit one accepted connection, or drop it when the connection cap is
/// already reached.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    router: &Arc<Router>,
    settings: &Arc<Settings>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment before checking so two racing accepts cannot both slip
    // past a nearly-full limit.
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);
    if let Some(max_conn) = settings.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    if settings.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    serve_connection(
        stream,
        peer_addr,
        Arc::clone(router),
        Arc::clone(settings),
        Arc::clone(conn_counter),
    );
}

/// Serve one HTTP/1.1 connection on its own task until it closes or times
/// out.
fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    router: Arc<Router>,
    settings: Arc<Settings>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let timeout_duration = Duration::from_secs(std::cmp::max(
            settings.performance.read_timeout,
            settings.performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder.keep_alive(settings.performance.keep_alive_timeout > 0);

        let service_router = Arc::clone(&router);
        let service_settings = Arc::clone(&settings);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let router = Arc::clone(&service_router);
                let settings = Arc::clone(&service_settings);
                async move { serve_request(req, peer_addr, &router, &settings).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {}s",
                timeout_duration.as_secs()
            )),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Dispatch one request through the route table and emit an access line
/// when enabled.
async fn serve_request(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    router: &Router,
    settings: &Settings,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut entry = settings.logging.access_log.then(|| access_entry(&req, peer_addr));

    // The file handlers never read request bodies; drop them here so the
    // routed handlers stay body-agnostic.
    let response = router.dispatch(req.map(|_| ())).await;

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &settings.logging.access_log_format);
    }

    Ok(response)
}

/// Capture the request-side fields of an access line before dispatch
/// consumes the request.
fn access_entry(req: &Request<Incoming>, peer_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2.0",
        hyper::Version::HTTP_3 => "3.0",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header_string(req, "referer");
    entry.user_agent = header_string(req, "user-agent");
    entry
}

fn header_string(req: &Request<Incoming>, name: &str) -> Option<String> {
    req.headers().get(name).and_then(|v| v.to_str().ok()).map(ToString::to_string)
}
