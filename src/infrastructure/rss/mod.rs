pub mod fetcher;
pub mod parser;

pub use fetcher::{FetchError, RssFetcher, FETCH_TIMEOUT};
pub use parser::parse_feed;
