use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch, Mutex};
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};

use super::report::{CycleReport, IngestStats, SourceOutcome, SourceStatus};
use crate::domain::news::{NewsStore, Source};
use crate::infrastructure::rss::RssFetcher;

const REPORT_BUFFER: usize = 16;

/// Periodically pulls every configured source and feeds new items into the store.
///
/// Each tick spawns one cycle; a cycle fetches all sources concurrently and
/// does not wait for earlier cycles, so slow sources may make cycles overlap.
/// Failures never leave the scheduler: they are logged and recorded in the
/// cycle's [`CycleReport`].
pub struct EnrichmentScheduler {
    sources: Arc<Vec<Source>>,
    fetcher: RssFetcher,
    store: Arc<dyn NewsStore>,
    period: Duration,
    cycles: AtomicU64,
    stopped: AtomicBool,
    reports: broadcast::Sender<CycleReport>,
    in_flight: InFlight,
}

impl EnrichmentScheduler {
    /// `period` must be non-zero.
    pub fn new(
        sources: Arc<Vec<Source>>,
        fetcher: RssFetcher,
        store: Arc<dyn NewsStore>,
        period: Duration,
    ) -> Self {
        let (reports, _) = broadcast::channel(REPORT_BUFFER);
        Self {
            sources,
            fetcher,
            store,
            period,
            cycles: AtomicU64::new(0),
            stopped: AtomicBool::new(false),
            reports,
            in_flight: InFlight::new(),
        }
    }

    /// Receive the report of every cycle started by [`run`](Self::run).
    pub fn subscribe(&self) -> broadcast::Receiver<CycleReport> {
        self.reports.subscribe()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn cycles_started(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    /// Tick loop. Returns once `shutdown` flips to `true` (or its sender is
    /// dropped). Cycles already spawned keep running; see [`drain`](Self::drain).
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            sources = self.sources.len(),
            period_secs = self.period.as_secs_f64(),
            "Enrichment started"
        );

        if !*shutdown.borrow_and_update() {
            loop {
                tokio::select! {
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow_and_update() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let Some(guard) = self.in_flight.guard().await else {
                            break;
                        };
                        let scheduler = Arc::clone(&self);
                        tokio::spawn(async move {
                            let report = scheduler.run_cycle().await;
                            // No subscribers is fine
                            let _ = scheduler.reports.send(report);
                            drop(guard);
                        });
                    }
                }
            }
        }

        self.stopped.store(true, Ordering::SeqCst);
        tracing::debug!("Enrichment end");
    }

    /// Stop accepting new cycles and wait up to `grace` for running ones.
    ///
    /// Returns `true` when every cycle finished in time.
    pub async fn drain(&self, grace: Duration) -> bool {
        self.in_flight.close().await;
        match tokio::time::timeout(grace, self.in_flight.wait()).await {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(
                    grace_secs = grace.as_secs_f64(),
                    "Enrichment cycles still running after grace period"
                );
                false
            }
        }
    }

    /// Run one cycle now: fetch every source concurrently and store the items.
    pub async fn run_cycle(&self) -> CycleReport {
        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        let started_at = Utc::now();

        let mut tasks = JoinSet::new();
        for (index, source) in self.sources.iter().enumerate() {
            let fetcher = self.fetcher.clone();
            let store = Arc::clone(&self.store);
            let source = source.clone();
            tasks.spawn(async move {
                let outcome = ingest_source(&fetcher, store.as_ref(), &source).await;
                (index, outcome)
            });
        }

        let mut outcomes: Vec<SourceOutcome> = self
            .sources
            .iter()
            .map(|source| SourceOutcome {
                source: source.clone(),
                status: SourceStatus::Failed("task did not complete".to_string()),
            })
            .collect();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = outcome,
                Err(err) => tracing::error!(cycle, error = %err, "Source task aborted"),
            }
        }

        let report = CycleReport {
            cycle,
            started_at,
            outcomes,
        };

        tracing::info!(
            cycle,
            sources = report.outcomes.len(),
            failed_sources = report.failed_sources(),
            inserted = report.inserted(),
            "Enrichment cycle finished"
        );

        report
    }
}

/// Fetch one source and forward its items to the store in document order.
async fn ingest_source(
    fetcher: &RssFetcher,
    store: &dyn NewsStore,
    source: &Source,
) -> SourceOutcome {
    let feed = match fetcher.fetch(source).await {
        Ok(feed) => feed,
        Err(err) => {
            tracing::warn!(source = %source, error = %err, "Fetch failed, source skipped this cycle");
            return SourceOutcome {
                source: source.clone(),
                status: SourceStatus::Failed(err.to_string()),
            };
        }
    };

    let mut stats = IngestStats {
        items: feed.items.len(),
        ..Default::default()
    };

    for item in &feed.items {
        tracing::debug!(
            link = %item.link,
            categories = ?item.categories,
            "Forwarding item"
        );

        match store.insert(item).await {
            Ok(true) => stats.inserted += 1,
            Ok(false) => stats.duplicates += 1,
            Err(err) => {
                stats.failed += 1;
                tracing::error!(source = %source, link = %item.link, error = %err, "Storing news item failed");
            }
        }
    }

    tracing::debug!(
        source = %source,
        items = stats.items,
        inserted = stats.inserted,
        duplicates = stats.duplicates,
        failed = stats.failed,
        "Source ingested"
    );

    SourceOutcome {
        source: source.clone(),
        status: SourceStatus::Fetched(stats),
    }
}

/// Counts spawned cycles through clones of a sender nobody writes to: once
/// the original is dropped, the receiver yields `None` only after every clone
/// held by a running cycle is gone.
struct InFlight {
    guard: Mutex<Option<mpsc::Sender<()>>>,
    drained: Mutex<mpsc::Receiver<()>>,
}

impl InFlight {
    fn new() -> Self {
        let (tx, rx) = mpsc::channel(1);
        Self {
            guard: Mutex::new(Some(tx)),
            drained: Mutex::new(rx),
        }
    }

    /// `None` once closed.
    async fn guard(&self) -> Option<mpsc::Sender<()>> {
        self.guard.lock().await.clone()
    }

    async fn close(&self) {
        self.guard.lock().await.take();
    }

    /// Only terminates after `close`.
    async fn wait(&self) {
        let mut drained = self.drained.lock().await;
        while drained.recv().await.is_some() {}
    }
}
