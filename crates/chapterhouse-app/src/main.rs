use std::sync::Arc;

use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use chapterhouse_app::app::api::routes;
use chapterhouse_app::config::ConfigHandler;
use chapterhouse_app::db_handler::DbProviderHandler;
use chapterhouse_core::config::load_config;
use chapterhouse_db::db::DbProvider;
use chapterhouse_db::db::connection::create_pool;
use chapterhouse_service::alerts::run_alert_scanner;
use chapterhouse_service::push::PushClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Chapterhouse membership server");

    let config = load_config()?;

    // Secrets (jwt, database credentials) stay out of the log.
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        db_max_connections = config.database.max_connections,
        push_gateway = %config.push.gateway_url,
        log_level = %config.logging.level,
        "Configuration loaded"
    );

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let pool = create_pool(
        &config.database.url,
        u32::from(config.database.max_connections),
    )
    .await?;

    tracing::info!("Database connection pool created.");

    let push_client = PushClient::new(&config.push)?;
    let scanner_provider: Arc<dyn DbProvider> = Arc::new(pool.clone());
    tokio::spawn(run_alert_scanner(
        scanner_provider,
        Arc::new(config.clone()),
        push_client,
    ));

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(DbProviderHandler { provider: pool })
        .hoop(ConfigHandler {
            settings: config.clone(),
        })
        .push(routes());

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
