pub mod dto;
pub mod error;
pub mod model;
pub mod service;
pub mod store;

pub use dto::{NewsListResponse, NewsResponse};
pub use error::NewsServiceError;
pub use model::{Feed, NewsItem, RawItem, Source, SourceError};
pub use service::{NewsService, NewsServiceApi};
pub use store::{NewsStore, STORE_DEADLINE};
