use std::net::SocketAddr;
use std::sync::Arc;

use application_portal::{
    config::Config,
    database::pool::create_pool,
    routes,
    services::{
        application_store::{ApplicationStore, SqliteApplicationStore},
        notification_service::NotificationDispatcher,
    },
    utils::logging::init_tracing,
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let pool = create_pool(&config.database_url).await?;
    let store = SqliteApplicationStore::new(pool);
    store.initialize().await?;
    info!(database_url = %config.database_url, "Connected to SQLite database");

    let dispatcher = NotificationDispatcher::from_config(&config).await;
    info!(
        email = dispatcher.email_enabled(),
        sms = dispatcher.sms_enabled(),
        await_notifications = config.await_notifications,
        "Notification channels ready"
    );

    let app_state = AppState::new(Arc::new(store), dispatcher, &config);
    let app = routes::router(app_state, &config.static_dir);

    let addr: SocketAddr = config.server_address().parse()?;
    info!("Server running at http://{}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
