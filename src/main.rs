use std::sync::Arc;
use news_aggregator::domain::news::{NewsService, NewsServiceApi};
use news_aggregator::infrastructure::config::Config;
use news_aggregator::infrastructure::db::{check_connection, create_pool, run_migrations};
use news_aggregator::infrastructure::http::{build_router, start_http_server};
use news_aggregator::infrastructure::logging::init_logging;
use news_aggregator::infrastructure::repositories::NewsRepository;
use news_aggregator::infrastructure::rss::RssFetcher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration; invalid sources or a zero period stop us here
    let config = Config::load()?;

    init_logging(&config.log_settings());

    tracing::info!(
        app = "news-aggregator",
        sources = config.rss.len(),
        request_period = config.request_period,
        "Starting on {}:{}",
        config.host,
        config.port
    );

    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let pool = Arc::new(pool);
    let store = Arc::new(NewsRepository::new(pool.clone()));
    let news_service = Arc::new(NewsService::start(
        config.sources()?,
        store,
        RssFetcher::new()?,
        config.request_period(),
        config.shutdown_grace(),
    )?);

    let app = build_router(pool, news_service.clone());
    start_http_server(&config, app, shutdown_signal()).await?;

    news_service.shutdown().await;
    tracing::info!("Server loop stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Shutdown signal received: SIGINT"),
        _ = terminate => tracing::info!("Shutdown signal received: SIGTERM"),
    }
}
