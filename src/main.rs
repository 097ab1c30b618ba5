use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;
use todo_rest::app_env::AppConfig;
use todo_rest::{SharedData, db, logging, routes};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = AppConfig::from_env().context("loading configuration")?;

    let otel_exporters = config
        .otel
        .as_ref()
        .map(logging::init_exporters)
        .transpose()?;
    logging::setup_logging_and_tracing(logging::init_env_filter()?, otel_exporters.as_ref());

    info!("Connecting to database");
    let pool = db::connect_sqlx(
        &config.database_url,
        config.db_max_connections,
        config.db_acquire_timeout,
    )
    .await
    .context("connecting to the database")?;
    if config.init_schema {
        db::ensure_schema(&pool, &config.user_schema, &config.todo_schema).await?;
    }

    let shared_data = Arc::new(SharedData::new(
        pool,
        &config.user_schema,
        &config.todo_schema,
    ));
    let router = routes::build_router(Arc::clone(&shared_data), &config);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding to {}", config.listen_addr))?;
    info!(address = %config.listen_addr, "Starting server");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running the server")?;

    info!("Server stopped, closing database connections");
    shared_data.ext_cxn.close().await;
    if let Some(exporters) = otel_exporters {
        exporters.shutdown();
    }

    Ok(())
}

/// Resolves once the process receives Ctrl+C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
