use chrono::{DateTime, Utc};

use crate::domain::news::Source;

/// What happened to the items of one successfully fetched document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub items: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Fetched(IngestStats),
    /// The fetch failed; nothing from this source reached the store.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub source: Source,
    pub status: SourceStatus,
}

impl SourceOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, SourceStatus::Failed(_))
    }

    pub fn stats(&self) -> Option<&IngestStats> {
        match &self.status {
            SourceStatus::Fetched(stats) => Some(stats),
            SourceStatus::Failed(_) => None,
        }
    }
}

/// Result of one enrichment cycle, one outcome per configured source in
/// configuration order.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<SourceOutcome>,
}

impl CycleReport {
    pub fn inserted(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(SourceOutcome::stats)
            .map(|s| s.inserted)
            .sum()
    }

    pub fn failed_sources(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn outcome_for(&self, source: &Source) -> Option<&SourceOutcome> {
        self.outcomes.iter().find(|o| &o.source == source)
    }
}
