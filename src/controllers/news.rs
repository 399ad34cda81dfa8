use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::domain::news::{NewsListResponse, NewsResponse};
use crate::{
    domain::news::{NewsService, NewsServiceApi},
    error::{AppError, AppResult},
    infrastructure::http::RequestId,
};

pub struct NewsController {
    news_service: Arc<NewsService>,
}

impl NewsController {
    pub fn new(news_service: Arc<NewsService>) -> Self {
        Self { news_service }
    }

    /// GET /news/list/:count - Most recent news, newest first
    pub async fn list_news(
        State(controller): State<Arc<NewsController>>,
        Extension(request_id): Extension<RequestId>,
        Path(count): Path<String>,
    ) -> AppResult<Json<NewsListResponse>> {
        let parsed = parse_count(&count)?;

        let news = controller.news_service.list_recent(parsed).await?;

        tracing::debug!(
            handler = "list_news",
            request_id = %request_id.0,
            count = parsed,
            returned = news.len(),
            "executed"
        );

        Ok(Json(NewsListResponse { news }))
    }

    /// GET /news/get/:id - Single news item
    pub async fn get_news(
        State(controller): State<Arc<NewsController>>,
        Extension(request_id): Extension<RequestId>,
        Path(id): Path<String>,
    ) -> AppResult<Json<NewsResponse>> {
        let parsed = parse_id(&id)?;

        let item = controller.news_service.get_by_id(parsed).await?;

        tracing::debug!(
            handler = "get_news",
            request_id = %request_id.0,
            id = parsed,
            "executed"
        );

        Ok(Json(item))
    }
}

fn parse_count(raw: &str) -> AppResult<u64> {
    raw.parse::<u64>()
        .map_err(|_| AppError::BadRequest(format!("incorrect count: {}", raw)))
}

/// Ids are unsigned on the wire and must fit the `BIGSERIAL` column.
fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse::<u64>()
        .ok()
        .and_then(|id| i64::try_from(id).ok())
        .ok_or_else(|| AppError::BadRequest(format!("incorrect id: {}", raw)))
}
