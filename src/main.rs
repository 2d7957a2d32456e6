//! callintake webhook receiver.
//!
//! Main entry point. Loads configuration, wires the file-backed store and
//! team notifier into the HTTP API, and serves until shutdown.

use std::sync::Arc;

use anyhow::{Context, Result};
use callintake_api::{start_server, AppState, Config};
use callintake_core::{Clock, JsonFileStore, NotificationLog, RealClock, TeamNotifier};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    init_tracing(&config.rust_log)?;

    info!("Starting callintake webhook receiver");

    let addr = config.parse_server_addr()?;
    info!(
        server_addr = %addr,
        data_file = %config.data_file,
        notifications_file = %config.notifications_file,
        "Configuration loaded"
    );

    let clock: Arc<dyn Clock> = Arc::new(RealClock::new());
    let store = Arc::new(JsonFileStore::new(&config.data_file));
    let notification_log = NotificationLog::new(&config.notifications_file);
    let notifier = Arc::new(TeamNotifier::new(notification_log.clone(), Arc::clone(&clock)));

    let state = AppState::new(store, notifier, notification_log, clock)
        .with_service_name(config.service_name.clone());

    info!("Health check: http://{addr}/health");
    info!("View patients: http://{addr}/patients");
    info!("View notifications: http://{addr}/notifications");

    start_server(state, addr, config.request_timeout()).await.context("Server failed")?;

    info!("callintake shutdown complete");
    Ok(())
}

/// Initializes tracing, preferring `RUST_LOG` over the configured filter.
fn init_tracing(default_filter: &str) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .context("Invalid log filter")?;

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
    Ok(())
}
