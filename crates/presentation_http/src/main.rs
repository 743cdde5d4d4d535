//! tracking-chaos HTTP server
//!
//! Main entry point: loads configuration and the chaos document, then
//! serves the tracking endpoints until SIGINT/SIGTERM.

use std::{sync::Arc, time::Duration};

use anyhow::Context as _;
use application::{ChaosDispatcher, TrackerService};
use infrastructure::{AppConfig, JsonLinesPublisher, SystemClock, init_logging, load_chaos};
use presentation_http::{ChaosLayer, create_app, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_logging(&config.logging)?;

    info!("tracking-chaos v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = config.server.port,
        log_format = %config.logging.format,
        "Configuration loaded"
    );

    // A rejected chaos document must never be served
    let chaos = load_chaos(&config.chaos).map_err(|e| {
        error!(error = %e, "Chaos configuration rejected");
        e
    })?;
    let dispatcher = ChaosDispatcher::new(chaos);

    let publisher = JsonLinesPublisher::from_config(&config.output)
        .context("Failed to open message output")?;

    let tracker = TrackerService::new(Arc::new(publisher), Arc::new(SystemClock));
    let state = AppState::new(tracker);

    let chaos_layer = ChaosLayer::new(dispatcher).exclude_paths(config.chaos.excluded_paths.clone());
    let app = create_app(state, chaos_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().include_headers(config.server.debug)),
    );

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for SIGINT or SIGTERM
///
/// Once a signal arrives a watchdog exits the process if connections are
/// still open after `timeout`.
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        error!("Connections still open after {:?}, exiting", timeout);
        std::process::exit(1);
    });
}
