use crate::domain::news::{NewsItem, NewsStore, RawItem, STORE_DEADLINE};
use crate::error::{AppError, AppResult};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;

pub struct NewsRepository {
    pool: Arc<DbPool>,
}

impl NewsRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

/// Bound a query by the store deadline regardless of what the caller waits for.
async fn with_deadline<T, F>(query: F) -> AppResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    tokio::time::timeout(STORE_DEADLINE, query)
        .await
        .map_err(|_| AppError::DeadlineExceeded(STORE_DEADLINE))?
        .map_err(AppError::from)
}

#[async_trait]
impl NewsStore for NewsRepository {
    async fn insert(&self, item: &RawItem) -> AppResult<bool> {
        let pub_date = item.parsed_pub_date().unwrap_or_else(|err| {
            tracing::warn!(
                link = %item.link,
                pub_date = %item.pub_date,
                error = %err,
                "Incorrect item pubDate, using current time"
            );
            Utc::now()
        });

        let pool = self.pool.as_ref();
        let result = with_deadline(
            sqlx::query(
                r#"
                INSERT INTO news (title, description, pub_date, link)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT ON CONSTRAINT news_link_constraint
                DO NOTHING
                "#,
            )
            .bind(&item.title)
            .bind(&item.description)
            .bind(pub_date)
            .bind(&item.link)
            .execute(pool),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_recent(&self, count: u64) -> AppResult<Vec<NewsItem>> {
        let limit = i64::try_from(count).unwrap_or(i64::MAX);
        let pool = self.pool.as_ref();
        let items = with_deadline(
            sqlx::query_as::<_, NewsItem>(
                r#"
                SELECT id, title, description, pub_date, link
                FROM news
                ORDER BY pub_date DESC
                LIMIT $1
                "#,
            )
            .bind(limit)
            .fetch_all(pool),
        )
        .await?;

        tracing::debug!(count, returned = items.len(), "Listed recent news");

        Ok(items)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<NewsItem>> {
        let pool = self.pool.as_ref();
        let item = with_deadline(
            sqlx::query_as::<_, NewsItem>(
                r#"
                SELECT id, title, description, pub_date, link
                FROM news
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(pool),
        )
        .await?;

        Ok(item)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
