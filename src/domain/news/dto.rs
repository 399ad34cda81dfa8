use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use super::NewsItem;

/// Single news item as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub link: String,
    pub pub_date: String,
}

/// Response for `GET /news/list/:count`
#[derive(Debug, Serialize, Deserialize)]
pub struct NewsListResponse {
    pub news: Vec<NewsResponse>,
}

impl From<NewsItem> for NewsResponse {
    fn from(item: NewsItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            link: item.link,
            pub_date: item.pub_date.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
