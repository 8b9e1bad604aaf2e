//! Error type for `cadence-jira`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// One or more credentials are absent. Not retried.
  #[error(
    "JIRA source not configured: missing {}; set data_source = \"mock\" to use generated data",
    .missing.join(", ")
  )]
  NotConfigured { missing: Vec<&'static str> },

  /// The JIRA-to-model mapping for a collection has not been written.
  #[error("JIRA fetch not implemented: {0}")]
  Unmapped(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
