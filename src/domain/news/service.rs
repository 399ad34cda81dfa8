use super::error::NewsServiceError;
use super::{NewsResponse, NewsStore, Source};
use crate::domain::enrichment::{CycleReport, EnrichmentScheduler};
use crate::infrastructure::rss::RssFetcher;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;

/// Owns the configured sources, the store handle and the enrichment loop.
pub struct NewsService {
    sources: Arc<Vec<Source>>,
    store: Arc<dyn NewsStore>,
    scheduler: Arc<EnrichmentScheduler>,
    shutdown_tx: watch::Sender<bool>,
    scheduler_handle: Mutex<Option<JoinHandle<()>>>,
    shutdown_grace: Duration,
    shut_down: AtomicBool,
}

impl NewsService {
    /// Build the service and start polling in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        sources: Vec<Source>,
        store: Arc<dyn NewsStore>,
        fetcher: RssFetcher,
        request_period: Duration,
        shutdown_grace: Duration,
    ) -> Result<Self, NewsServiceError> {
        if request_period.is_zero() {
            return Err(anyhow::anyhow!("request period must be greater than zero").into());
        }

        let sources = Arc::new(sources);
        let scheduler = Arc::new(EnrichmentScheduler::new(
            sources.clone(),
            fetcher,
            store.clone(),
            request_period,
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(scheduler.clone().run(shutdown_rx));

        Ok(Self {
            sources,
            store,
            scheduler,
            shutdown_tx,
            scheduler_handle: Mutex::new(Some(handle)),
            shutdown_grace,
            shut_down: AtomicBool::new(false),
        })
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn is_enriching(&self) -> bool {
        !self.scheduler.is_stopped()
    }

    pub fn subscribe_cycles(&self) -> broadcast::Receiver<CycleReport> {
        self.scheduler.subscribe()
    }

    /// Run one enrichment cycle outside the timer.
    pub async fn enrich_now(&self) -> CycleReport {
        self.scheduler.run_cycle().await
    }
}

#[async_trait]
pub trait NewsServiceApi: Send + Sync {
    /// The `count` most recently published items, newest first.
    async fn list_recent(&self, count: u64) -> Result<Vec<NewsResponse>, NewsServiceError>;

    async fn get_by_id(&self, id: i64) -> Result<NewsResponse, NewsServiceError>;

    /// Stop polling, wait for running cycles up to the grace period and
    /// release the store. Later calls are no-ops.
    async fn shutdown(&self);
}

#[async_trait]
impl NewsServiceApi for NewsService {
    async fn list_recent(&self, count: u64) -> Result<Vec<NewsResponse>, NewsServiceError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let items = self.store.list_recent(count).await?;
        Ok(items.into_iter().map(NewsResponse::from).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<NewsResponse, NewsServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .map(NewsResponse::from)
            .ok_or(NewsServiceError::NotFound(id))
    }

    async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }

        // Receiver may already be gone if the loop exited on its own
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.scheduler_handle.lock().await.take() {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "Enrichment loop terminated abnormally");
            }
        }

        let drained = self.scheduler.drain(self.shutdown_grace).await;
        self.store.close().await;

        tracing::info!(drained, "News service shut down");
    }
}
