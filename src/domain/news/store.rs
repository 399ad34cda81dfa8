use async_trait::async_trait;

use super::{NewsItem, RawItem};
use crate::error::AppResult;

/// Durable keyed collection of news items.
///
/// Implementations enforce link uniqueness themselves: inserting an item whose
/// link is already stored succeeds without changing anything. Every call is
/// bounded by [`STORE_DEADLINE`].
#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Store an item unless its link is already known.
    ///
    /// Returns `true` when a new row was written, `false` on a duplicate link.
    /// A publish date that cannot be parsed is replaced by the current time.
    async fn insert(&self, item: &RawItem) -> AppResult<bool>;

    /// Up to `count` items, newest publish date first.
    async fn list_recent(&self, count: u64) -> AppResult<Vec<NewsItem>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<NewsItem>>;

    /// Release the underlying connections. Calling it twice is harmless.
    async fn close(&self);
}

pub const STORE_DEADLINE: std::time::Duration = std::time::Duration::from_secs(3);
