//! [`MockSource`], the generator-backed [`DeliverySource`].

use std::convert::Infallible;

use cadence_core::{
  model::{DeliveryMetric, Escalation, Milestone, Program, RiskItem},
  source::DeliverySource,
};

use crate::{
  catalogue,
  generate::{self, DEFAULT_SEED},
};

/// Serves freshly generated collections. Each fetch reseeds, so repeated
/// fetches return identical records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSource {
  seed: u64,
}

impl MockSource {
  pub fn new(seed: u64) -> Self { Self { seed } }

  pub fn seed(&self) -> u64 { self.seed }
}

impl Default for MockSource {
  fn default() -> Self { Self::new(DEFAULT_SEED) }
}

impl DeliverySource for MockSource {
  type Error = Infallible;

  async fn fetch_programs(&self) -> Result<Vec<Program>, Self::Error> {
    tracing::debug!("serving program catalogue");
    Ok(catalogue::programs())
  }

  async fn fetch_milestones(&self) -> Result<Vec<Milestone>, Self::Error> {
    tracing::debug!(seed = self.seed, "generating milestones");
    Ok(generate::generate_milestones(self.seed))
  }

  async fn fetch_risks(&self) -> Result<Vec<RiskItem>, Self::Error> {
    tracing::debug!(seed = self.seed, "generating risks");
    Ok(generate::generate_risks(self.seed))
  }

  async fn fetch_escalations(&self) -> Result<Vec<Escalation>, Self::Error> {
    tracing::debug!("serving escalation log");
    Ok(catalogue::escalations())
  }

  async fn fetch_metrics(&self) -> Result<Vec<DeliveryMetric>, Self::Error> {
    tracing::debug!(seed = self.seed, "generating metrics");
    Ok(generate::generate_metrics(self.seed))
  }
}
