//! Server A: the app workspace dev server.
//!
//! Serves the working tree at `/` and the built bundle under `/app/`, both
//! wrapped in permissive CORS so pages hosted elsewhere can fetch from it.

use distserve::config::Settings;
use distserve::handler::{Mount, Router};
use distserve::{logger, server};

/// Fixed route table: the working tree, then the bundle mount. Bundle URLs
/// are built as `/app/<asset>`, so the mount strips `/app` before lookup.
fn mounts() -> Vec<Mount> {
    vec![
        Mount::new("/", "dev"),
        Mount::new("/app/", "dist").strip_prefix("/app"),
    ]
}

fn main() {
    if let Err(e) = run() {
        logger::log_error(&format!("fatal: {e}"));
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_from("dev-server")?;
    logger::init(&settings)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = settings.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(server::run(settings, Router::new(mounts())))
}
