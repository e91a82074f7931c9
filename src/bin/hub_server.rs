//! Server B: the apps hub server.
//!
//! Serves the built GitHub app bundle under `/apps/`. The bundle's asset
//! URLs are built as `/apps/github/<asset>`, so that prefix is stripped
//! before the lookup in `apps/github/dist`.

use distserve::config::Settings;
use distserve::handler::{Mount, Router};
use distserve::{logger, server};

fn mounts() -> Vec<Mount> {
    vec![Mount::new("/apps/", "apps/github/dist").strip_prefix("/apps/github")]
}

fn main() {
    if let Err(e) = run() {
        logger::log_error(&format!("fatal: {e}"));
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_from("hub-server")?;
    logger::init(&settings)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = settings.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(server::run(settings, Router::new(mounts())))
}
