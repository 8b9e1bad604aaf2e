//! JSON API over the Cadence delivery dataset.
//!
//! Exposes an axum [`Router`] backed by any [`DeliverySource`]. The dataset
//! is loaded through a [`DatasetCache`] and every response is computed from
//! the cached copy.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = AppState::new(MockSource::default(), config);
//! axum::serve(listener, cadence_server::router(state)).await?;
//! ```

pub mod cache;
pub mod error;
pub mod handlers;
pub mod params;
pub mod source;

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use cadence_core::source::DeliverySource;
use cadence_jira::JiraConfig;
use serde::Deserialize;

pub use cache::DatasetCache;
pub use error::ApiError;
pub use source::{AnySource, DataSourceKind};

use handlers::{collections, export, metrics, milestones, risks, summary};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CADENCE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub data_source:    DataSourceKind,
  /// Generator seed, used when `data_source = "mock"`.
  pub seed:           u64,
  /// How long a loaded dataset is served before it is reloaded.
  pub cache_ttl_secs: u64,
  pub jira:           JiraConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:           "127.0.0.1".to_string(),
      port:           8501,
      data_source:    DataSourceKind::Mock,
      seed:           cadence_mock::DEFAULT_SEED,
      cache_ttl_secs: 1800,
      jira:           JiraConfig::default(),
    }
  }
}

impl ServerConfig {
  pub fn cache_ttl(&self) -> Duration { Duration::from_secs(self.cache_ttl_secs) }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub cache:  Arc<DatasetCache<S>>,
  pub config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      cache:  Arc::clone(&self.cache),
      config: Arc::clone(&self.config),
    }
  }
}

impl<S: DeliverySource> AppState<S> {
  pub fn new(source: S, config: ServerConfig) -> Self {
    Self {
      cache:  Arc::new(DatasetCache::new(source, config.cache_ttl())),
      config: Arc::new(config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`. Every route is a `GET`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DeliverySource + 'static,
{
  Router::new()
    // Collections
    .route("/api/programs", get(collections::programs::<S>))
    .route("/api/programs/summary", get(summary::programs::<S>))
    .route("/api/programs/{id}", get(collections::program::<S>))
    .route("/api/milestones", get(collections::milestones::<S>))
    .route("/api/risks", get(collections::risks::<S>))
    .route("/api/escalations", get(collections::escalations::<S>))
    .route("/api/metrics", get(collections::metrics::<S>))
    .route("/api/snapshots", get(collections::snapshots::<S>))
    // Milestone aggregates
    .route("/api/milestones/predictability", get(milestones::predictability::<S>))
    .route("/api/milestones/by-quarter", get(milestones::by_quarter::<S>))
    .route("/api/milestones/timeline", get(milestones::timeline::<S>))
    .route("/api/milestones/upcoming", get(milestones::upcoming::<S>))
    // Risk aggregates
    .route("/api/risks/heatmap", get(risks::heatmap::<S>))
    .route("/api/risks/by-severity", get(risks::by_severity::<S>))
    .route("/api/risks/summary", get(risks::summary::<S>))
    // Metric trends
    .route("/api/metrics/velocity", get(metrics::velocity::<S>))
    .route("/api/metrics/dora", get(metrics::dora::<S>))
    .route("/api/metrics/defects", get(metrics::defects::<S>))
    .route("/api/metrics/latest", get(metrics::latest::<S>))
    // Portfolio
    .route("/api/summary", get(summary::handler::<S>))
    .route("/api/export.csv", get(export::handler::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
