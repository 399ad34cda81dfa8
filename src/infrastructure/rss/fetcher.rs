use reqwest::StatusCode;
use std::time::Duration;

use super::parser::parse_feed;
use crate::domain::news::{Feed, Source};

/// Total time allowed for one source request, body included.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("incorrect status {0}")]
    Status(u16),
    #[error("decode feed failed: {0}")]
    Decode(#[from] ::rss::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err)
        }
    }
}

/// Downloads and decodes RSS documents.
///
/// Sources are treated as untrusted best-effort content: certificates are not
/// verified and responses are requested uncompressed. A fetch is a single
/// attempt, there is no retry here.
#[derive(Clone)]
pub struct RssFetcher {
    http_client: reqwest::Client,
}

impl RssFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .no_gzip()
            .no_brotli()
            .no_deflate()
            .pool_max_idle_per_host(usize::MAX)
            .build()?;

        Ok(Self { http_client })
    }

    /// Fetch one source. Only a `200 OK` with a decodable RSS body succeeds.
    pub async fn fetch(&self, source: &Source) -> Result<Feed, FetchError> {
        let response = self
            .http_client
            .get(source.url().clone())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let feed = parse_feed(&body)?;

        tracing::trace!(
            source = %source,
            channel = %feed.title,
            items = feed.items.len(),
            "Feed decoded"
        );

        Ok(feed)
    }
}
