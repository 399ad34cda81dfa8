use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use url::Url;

/// A configured feed endpoint. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source(Url);

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{0}")]
    Malformed(#[from] url::ParseError),
    #[error("unsupported scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
}

impl Source {
    pub fn parse(raw: &str) -> Result<Self, SourceError> {
        let url = Url::parse(raw.trim())?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(SourceError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A decoded source document: channel fields plus its items in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub items: Vec<RawItem>,
}

/// An item as published by a source, before any normalisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
    pub categories: Vec<String>,
}

impl RawItem {
    /// Parse the RFC 1123 / RFC 2822 publish date, e.g. `Mon, 02 Jan 2006 15:04:05 GMT`.
    pub fn parsed_pub_date(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc2822(self.pub_date.trim()).map(|dt| dt.with_timezone(&Utc))
    }
}

/// A persisted news item
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub pub_date: DateTime<Utc>,
    pub link: String,
}
