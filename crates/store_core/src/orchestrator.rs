//! Concurrent catalog loading with all-or-nothing aggregation.
//!
//! [`CatalogFetchOrchestrator::load`] issues the four bucket fetches at once
//! and publishes exactly one terminal [`CatalogState`] per load through a
//! `watch` channel. A load whose cancellation token fired, or that was
//! overtaken by a newer load, publishes nothing.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use async_trait::async_trait;
use futures::future::try_join4;
use shared::{
    domain::{BucketKind, Item},
    error::FetchError,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const FETCH_FAILURE_MESSAGE: &str = "Failed to load games. Please try again later.";

/// Read-only, already-authenticated catalog data source.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_carousel(&self) -> Result<Vec<Item>, FetchError>;
    async fn fetch_trending(&self) -> Result<Vec<Item>, FetchError>;
    async fn fetch_upcoming(&self) -> Result<Vec<Item>, FetchError>;
    async fn fetch_latest(&self) -> Result<Vec<Item>, FetchError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogBuckets {
    pub carousel: Vec<Item>,
    pub trending: Vec<Item>,
    pub upcoming: Vec<Item>,
    pub latest: Vec<Item>,
}

impl CatalogBuckets {
    pub fn get(&self, bucket: BucketKind) -> &[Item] {
        match bucket {
            BucketKind::Carousel => &self.carousel,
            BucketKind::Trending => &self.trending,
            BucketKind::Upcoming => &self.upcoming,
            BucketKind::Latest => &self.latest,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogState {
    #[default]
    Loading,
    Ready(Arc<CatalogBuckets>),
    Failed {
        message: String,
    },
}

impl CatalogState {
    pub fn is_loading(&self) -> bool {
        matches!(self, CatalogState::Loading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready,
    Failed,
    /// The load was torn down or overtaken; nothing was published.
    Suppressed,
}

pub struct CatalogFetchOrchestrator {
    source: Arc<dyn CatalogSource>,
    state: watch::Sender<CatalogState>,
    generation: AtomicU64,
}

impl CatalogFetchOrchestrator {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        let (state, _) = watch::channel(CatalogState::Loading);
        Self {
            source,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    /// Discards any prior state and runs all four fetches from scratch.
    ///
    /// The generation bump and every publish happen under the channel's
    /// write lock, so a load that was overtaken cannot publish after the
    /// newer load's `Loading`.
    pub async fn load(&self, cancel: &CancellationToken) -> LoadOutcome {
        let mut generation = 0;
        let started = self.state.send_if_modified(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            if cancel.is_cancelled() {
                return false;
            }
            *state = CatalogState::Loading;
            true
        });
        if !started {
            debug!(generation, "catalog load requested after teardown");
            return LoadOutcome::Suppressed;
        }
        debug!(generation, "catalog load started");

        let source = self.source.as_ref();
        let fetches = try_join4(
            source.fetch_carousel(),
            source.fetch_trending(),
            source.fetch_upcoming(),
            source.fetch_latest(),
        );

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(generation, "catalog load torn down before fetches settled");
                return LoadOutcome::Suppressed;
            }
            result = fetches => result,
        };

        let settled = result.map(|(carousel, trending, upcoming, latest)| {
            Arc::new(CatalogBuckets {
                carousel,
                trending,
                upcoming,
                latest,
            })
        });
        let next = match &settled {
            Ok(buckets) => CatalogState::Ready(Arc::clone(buckets)),
            Err(_) => CatalogState::Failed {
                message: FETCH_FAILURE_MESSAGE.to_string(),
            },
        };

        let published = self.state.send_if_modified(|state| {
            if cancel.is_cancelled() || self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = next;
            true
        });
        if !published {
            warn!(generation, "discarding stale catalog result");
            return LoadOutcome::Suppressed;
        }

        match settled {
            Ok(buckets) => {
                info!(
                    carousel = buckets.carousel.len(),
                    trending = buckets.trending.len(),
                    upcoming = buckets.upcoming.len(),
                    latest = buckets.latest.len(),
                    "catalog loaded"
                );
                LoadOutcome::Ready
            }
            Err(err) => {
                error!(bucket = %err.bucket, kind = ?err.kind, error = %err, "error fetching games");
                LoadOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
