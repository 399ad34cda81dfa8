pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use axum::{middleware, routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::controllers::{
    health::{self, HealthState},
    news::NewsController,
};
use crate::domain::news::NewsService;
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// All routes with their middleware
pub fn build_router(pool: Arc<DbPool>, news_service: Arc<NewsService>) -> Router {
    let news_controller = Arc::new(NewsController::new(news_service.clone()));

    let news_routes = Router::new()
        .route("/news/list/:count", get(NewsController::list_news))
        .route("/news/get/:id", get(NewsController::get_news))
        .with_state(news_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(HealthState { pool, news_service })
        .merge(news_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Serve until `shutdown` resolves, then let in-flight requests finish
pub async fn start_http_server<F>(
    config: &Config,
    app: Router,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::debug!("HTTP server graceful shutdown finished");

    Ok(())
}
