pub mod enrichment;
pub mod news;
