//! Source selection from configuration.

use std::fmt;

use cadence_core::{
  model::{DeliveryMetric, Escalation, Milestone, Program, RiskItem},
  source::DeliverySource,
};
use cadence_jira::{JiraConfig, JiraSource};
use cadence_mock::MockSource;
use serde::Deserialize;

/// The `data_source` setting. Any other value fails configuration loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
  #[default]
  Mock,
  Jira,
}

impl DataSourceKind {
  pub fn label(self) -> &'static str {
    match self {
      Self::Mock => "mock",
      Self::Jira => "jira",
    }
  }
}

impl fmt::Display for DataSourceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// Either configured source behind one [`DeliverySource`] impl.
///
/// The JIRA variant keeps its raw config and connects on every fetch, so an
/// incomplete `[jira]` section surfaces as a request error rather than a
/// startup failure.
#[derive(Debug, Clone)]
pub enum AnySource {
  Mock(MockSource),
  Jira(JiraConfig),
}

impl AnySource {
  pub fn from_config(config: &crate::ServerConfig) -> Self {
    match config.data_source {
      DataSourceKind::Mock => Self::Mock(MockSource::new(config.seed)),
      DataSourceKind::Jira => Self::Jira(config.jira.clone()),
    }
  }

  pub fn kind(&self) -> DataSourceKind {
    match self {
      Self::Mock(_) => DataSourceKind::Mock,
      Self::Jira(_) => DataSourceKind::Jira,
    }
  }

  /// Connect to JIRA now, reporting what is missing. Always succeeds for
  /// the generator.
  pub fn check(&self) -> Result<(), cadence_jira::Error> {
    if let Self::Jira(config) = self {
      JiraSource::new(config)?;
    }
    Ok(())
  }
}

macro_rules! dispatch {
  ($self:ident, $method:ident) => {
    match $self {
      AnySource::Mock(mock) => match mock.$method().await {
        Ok(records) => Ok(records),
        Err(never) => match never {},
      },
      AnySource::Jira(config) => JiraSource::new(config)?.$method().await,
    }
  };
}

impl DeliverySource for AnySource {
  type Error = cadence_jira::Error;

  async fn fetch_programs(&self) -> Result<Vec<Program>, Self::Error> {
    dispatch!(self, fetch_programs)
  }

  async fn fetch_milestones(&self) -> Result<Vec<Milestone>, Self::Error> {
    dispatch!(self, fetch_milestones)
  }

  async fn fetch_risks(&self) -> Result<Vec<RiskItem>, Self::Error> {
    dispatch!(self, fetch_risks)
  }

  async fn fetch_escalations(&self) -> Result<Vec<Escalation>, Self::Error> {
    dispatch!(self, fetch_escalations)
  }

  async fn fetch_metrics(&self) -> Result<Vec<DeliveryMetric>, Self::Error> {
    dispatch!(self, fetch_metrics)
  }
}
