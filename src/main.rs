use std::sync::Arc;

use autoserve::config::{self, AppState, Config};
use autoserve::error::StartupError;
use autoserve::logger;
use autoserve::routing::{resolve_aliases, Registrar, RouteRegistry};
use autoserve::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path).map_err(StartupError::from)?;

    logger::init(&cfg).map_err(StartupError::LogFile)?;

    if !cfg.site.root.is_dir() {
        return Err(StartupError::RootMissing(cfg.site.root.clone()).into());
    }

    // Build the Tokio runtime, sized by `server.workers` if set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg))?;
    Ok(())
}

async fn async_main(cfg: Config) -> Result<(), StartupError> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    let aliases = resolve_aliases(&cfg.site.root, &cfg.site.aliases);
    for (url, target) in &aliases {
        logger::log_alias(url, target);
    }
    let registry = Arc::new(RouteRegistry::with_aliases(aliases));

    let registrar = Registrar::new(
        cfg.site.root.clone(),
        cfg.site.scan_interval(),
        Arc::clone(&registry),
    )
    .with_watch(cfg.site.watch);

    let state = Arc::new(AppState::new(cfg, registry));
    logger::log_server_start(&addr, &state.config);

    // Sole writer of the registry; runs for the life of the process
    tokio::spawn(registrar.run());

    // Connections are served on local tasks
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, state))
        .await;
    Ok(())
}
