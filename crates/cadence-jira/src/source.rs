//! [`JiraSource`]: the JIRA implementation of [`DeliverySource`].

use std::fmt;

use cadence_core::{
  model::{DeliveryMetric, Escalation, Milestone, Program, RiskItem, WeeklySnapshot},
  source::DeliverySource,
};
use serde::Deserialize;

use crate::{Error, Result};

// ─── Config ──────────────────────────────────────────────────────────────────

/// The `[jira]` configuration section. Every field is required to connect.
#[derive(Clone, Default, Deserialize)]
pub struct JiraConfig {
  pub server:    Option<String>,
  pub email:     Option<String>,
  pub api_token: Option<String>,
}

impl fmt::Debug for JiraConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("JiraConfig")
      .field("server", &self.server)
      .field("email", &self.email)
      .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
      .finish()
  }
}

fn present(value: Option<&String>) -> Option<&str> {
  value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

// ─── Source ──────────────────────────────────────────────────────────────────

/// Authenticated JIRA endpoint.
#[derive(Clone)]
pub struct JiraSource {
  server:    String,
  email:     String,
  api_token: String,
}

impl JiraSource {
  /// Accept `config` only if server, email, and API token are all set.
  pub fn new(config: &JiraConfig) -> Result<Self> {
    let server = present(config.server.as_ref());
    let email = present(config.email.as_ref());
    let api_token = present(config.api_token.as_ref());

    let (Some(server), Some(email), Some(api_token)) = (server, email, api_token) else {
      let missing = [
        ("jira.server", server.is_none()),
        ("jira.email", email.is_none()),
        ("jira.api_token", api_token.is_none()),
      ]
      .into_iter()
      .filter_map(|(name, absent)| absent.then_some(name))
      .collect();
      return Err(Error::NotConfigured { missing });
    };

    tracing::info!(server, email, "JIRA source configured");
    Ok(Self {
      server:    server.to_string(),
      email:     email.to_string(),
      api_token: api_token.to_string(),
    })
  }

  fn unmapped<T>(&self, mapping: &'static str) -> Result<T> {
    tracing::warn!(server = %self.server, mapping, "JIRA fetch requested but not mapped");
    Err(Error::Unmapped(mapping))
  }
}

impl fmt::Debug for JiraSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("JiraSource")
      .field("server", &self.server)
      .field("email", &self.email)
      .field("api_token", &format_args!("<{} chars>", self.api_token.len()))
      .finish()
  }
}

impl DeliverySource for JiraSource {
  type Error = Error;

  async fn fetch_programs(&self) -> Result<Vec<Program>> {
    self.unmapped("map JIRA epics to Program fields")
  }

  async fn fetch_milestones(&self) -> Result<Vec<Milestone>> {
    self.unmapped("map JIRA fix versions to Milestone fields")
  }

  async fn fetch_risks(&self) -> Result<Vec<RiskItem>> {
    self.unmapped("map JIRA risk issues to RiskItem fields")
  }

  async fn fetch_escalations(&self) -> Result<Vec<Escalation>> {
    self.unmapped("map JIRA escalation issues to Escalation fields")
  }

  async fn fetch_metrics(&self) -> Result<Vec<DeliveryMetric>> {
    self.unmapped("map JIRA sprint velocity to DeliveryMetric fields")
  }

  async fn fetch_weekly_snapshots(&self) -> Result<Vec<WeeklySnapshot>> {
    self.unmapped("aggregate JIRA sprint data into WeeklySnapshot fields")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn full() -> JiraConfig {
    JiraConfig {
      server:    Some("https://example.atlassian.net".into()),
      email:     Some("pm@example.com".into()),
      api_token: Some("secret".into()),
    }
  }

  #[test]
  fn missing_fields_are_all_named() {
    let err = JiraSource::new(&JiraConfig::default()).unwrap_err();
    let Error::NotConfigured { missing } = &err else {
      panic!("unexpected error: {err}");
    };
    assert_eq!(missing, &["jira.server", "jira.email", "jira.api_token"]);
    let message = err.to_string();
    assert!(message.contains("jira.api_token"));
    assert!(message.contains("data_source = \"mock\""));
  }

  #[test]
  fn blank_values_count_as_missing() {
    let config = JiraConfig { email: Some("  ".into()), ..full() };
    let err = JiraSource::new(&config).unwrap_err();
    assert!(matches!(err, Error::NotConfigured { ref missing } if missing == &["jira.email"]));
  }

  #[test]
  fn config_deserializes_partially() {
    let config: JiraConfig =
      serde_json::from_str(r#"{ "server": "https://jira.local" }"#).unwrap();
    assert_eq!(config.server.as_deref(), Some("https://jira.local"));
    assert!(config.api_token.is_none());
  }

  #[test]
  fn debug_hides_token() {
    let rendered = format!("{:?} {:?}", full(), JiraSource::new(&full()).unwrap());
    assert!(!rendered.contains("secret"));
  }

  #[tokio::test]
  async fn fetches_report_missing_mapping() {
    let source = JiraSource::new(&full()).unwrap();
    let err = source.fetch_programs().await.unwrap_err();
    assert!(matches!(err, Error::Unmapped(m) if m.contains("Program")));
    assert!(source.fetch_metrics().await.is_err());
    assert!(source.fetch_weekly_snapshots().await.is_err());
  }
}
