use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::news::NewsService;
use crate::infrastructure::db::{check_connection, DbPool};

#[derive(Clone)]
pub struct HealthState {
    pub pool: Arc<DbPool>,
    pub news_service: Arc<NewsService>,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(state): State<HealthState>) -> impl IntoResponse {
    let enrichment = if state.news_service.is_enriching() {
        "running"
    } else {
        "stopped"
    };
    let sources = state.news_service.sources().len();

    match check_connection(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "database": "connected",
                "enrichment": enrichment,
                "sources": sources
            })),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "database": "disconnected",
                "enrichment": enrichment,
                "sources": sources
            })),
        ),
    }
}
