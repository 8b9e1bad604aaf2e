//! Route handlers, grouped by the part of the dashboard they feed.

pub mod collections;
pub mod export;
pub mod metrics;
pub mod milestones;
pub mod risks;
pub mod summary;

use std::sync::Arc;

use cadence_core::source::{Dataset, DeliverySource};

use crate::{AppState, error::ApiError};

/// The current dataset, loading it through the cache if needed.
pub(crate) async fn dataset<S: DeliverySource>(
  state: &AppState<S>,
) -> Result<Arc<Dataset>, ApiError> {
  Ok(state.cache.get().await?)
}
