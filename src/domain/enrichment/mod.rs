pub mod report;
pub mod scheduler;

pub use report::{CycleReport, IngestStats, SourceOutcome, SourceStatus};
pub use scheduler::EnrichmentScheduler;
