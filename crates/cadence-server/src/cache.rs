//! [`DatasetCache`]: a loaded [`Dataset`] reused until its TTL expires.

use std::{sync::Arc, time::Duration};

use cadence_core::{
  Result,
  source::{Dataset, DeliverySource},
};
use tokio::{sync::RwLock, time::Instant};

struct Loaded {
  dataset:   Arc<Dataset>,
  loaded_at: Instant,
}

pub struct DatasetCache<S> {
  source: S,
  ttl:    Duration,
  slot:   RwLock<Option<Loaded>>,
}

impl<S: DeliverySource> DatasetCache<S> {
  pub fn new(source: S, ttl: Duration) -> Self {
    Self { source, ttl, slot: RwLock::new(None) }
  }

  pub fn source(&self) -> &S { &self.source }

  fn fresh(&self, slot: &Option<Loaded>) -> Option<Arc<Dataset>> {
    slot
      .as_ref()
      .filter(|loaded| loaded.loaded_at.elapsed() < self.ttl)
      .map(|loaded| Arc::clone(&loaded.dataset))
  }

  /// The cached dataset, loading it from the source first if there is none
  /// or it has expired. Failed loads are not cached.
  pub async fn get(&self) -> Result<Arc<Dataset>> {
    if let Some(dataset) = self.fresh(&*self.slot.read().await) {
      return Ok(dataset);
    }

    let mut slot = self.slot.write().await;
    // Another request may have reloaded while we waited for the lock.
    if let Some(dataset) = self.fresh(&slot) {
      return Ok(dataset);
    }

    let started = Instant::now();
    let dataset = match Dataset::load(&self.source).await {
      Ok(dataset) => Arc::new(dataset),
      Err(e) => {
        tracing::warn!(error = %e, "dataset load failed");
        return Err(e);
      }
    };
    tracing::info!(
      programs = dataset.programs.len(),
      elapsed_ms = started.elapsed().as_millis() as u64,
      "dataset loaded"
    );
    *slot = Some(Loaded { dataset: Arc::clone(&dataset), loaded_at: Instant::now() });
    Ok(dataset)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use cadence_core::model::{DeliveryMetric, Escalation, Milestone, Program, RiskItem};
  use cadence_mock::MockSource;

  use super::*;

  /// Counts how often programs are fetched.
  #[derive(Default)]
  struct Counting {
    inner: MockSource,
    loads: AtomicUsize,
  }

  impl DeliverySource for Counting {
    type Error = std::convert::Infallible;

    async fn fetch_programs(&self) -> Result<Vec<Program>, Self::Error> {
      self.loads.fetch_add(1, Ordering::SeqCst);
      self.inner.fetch_programs().await
    }

    async fn fetch_milestones(&self) -> Result<Vec<Milestone>, Self::Error> {
      self.inner.fetch_milestones().await
    }

    async fn fetch_risks(&self) -> Result<Vec<RiskItem>, Self::Error> {
      self.inner.fetch_risks().await
    }

    async fn fetch_escalations(&self) -> Result<Vec<Escalation>, Self::Error> {
      self.inner.fetch_escalations().await
    }

    async fn fetch_metrics(&self) -> Result<Vec<DeliveryMetric>, Self::Error> {
      self.inner.fetch_metrics().await
    }
  }

  #[tokio::test]
  async fn serves_cached_copy_within_ttl() {
    let cache = DatasetCache::new(Counting::default(), Duration::from_secs(600));
    let first = cache.get().await.unwrap();
    let second = cache.get().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.source().loads.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn reloads_after_expiry() {
    let cache = DatasetCache::new(Counting::default(), Duration::ZERO);
    cache.get().await.unwrap();
    cache.get().await.unwrap();
    assert_eq!(cache.source().loads.load(Ordering::SeqCst), 2);
  }
}
