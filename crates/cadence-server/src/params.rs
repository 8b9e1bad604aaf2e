//! Query-string parsing shared by the handlers.
//!
//! List parameters are comma separated (`?status=On Track,At Risk`). An
//! absent or blank parameter places no restriction.

use axum::{
  extract::{FromRequestParts, Query},
  http::request::Parts,
};
use cadence_core::{
  QuarterError,
  query::{EscalationFilter, MetricFilter, MilestoneFilter, ProgramFilter, RiskFilter},
  quarter::Quarter,
  status::{MilestoneStatus, ProgramStatus, RiskSeverity},
};
use serde::{Deserialize, de::DeserializeOwned};

use crate::error::ApiError;

/// [`Query`] that rejects a malformed query string with
/// [`ApiError::BadRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Query(value) = Query::<T>::from_request_parts(parts, state)
      .await
      .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(ApiQuery(value))
  }
}

/// Split `raw` on commas and parse every non-blank item.
pub fn parse_list<T>(
  name: &str,
  raw: Option<&str>,
  parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<Vec<T>>, ApiError> {
  let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
    return Ok(None);
  };
  raw
    .split(',')
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(|item| {
      parse(item).ok_or_else(|| ApiError::BadRequest(format!("invalid {name}: {item:?}")))
    })
    .collect::<Result<Vec<_>, _>>()
    .map(Some)
}

fn ids(raw: Option<&str>) -> Result<Option<Vec<String>>, ApiError> {
  parse_list("program_id", raw, |s| Some(s.to_string()))
}

fn quarters(raw: Option<&str>) -> Result<Option<Vec<Quarter>>, ApiError> {
  let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
    return Ok(None);
  };
  raw
    .split(',')
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(|item| item.parse().map_err(|e: QuarterError| ApiError::BadRequest(e.to_string())))
    .collect::<Result<Vec<_>, _>>()
    .map(Some)
}

// ─── Programs ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ProgramParams {
  pub program_id: Option<String>,
  pub status:     Option<String>,
}

impl ProgramParams {
  pub fn filter(&self) -> Result<ProgramFilter, ApiError> {
    Ok(ProgramFilter {
      program_ids: ids(self.program_id.as_deref())?,
      statuses:    parse_list("status", self.status.as_deref(), ProgramStatus::from_label)?,
    })
  }
}

// ─── Milestones ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct MilestoneParams {
  pub program_id: Option<String>,
  pub quarter:    Option<String>,
  pub status:     Option<String>,
  #[serde(default)]
  pub key_only:   bool,
}

impl MilestoneParams {
  pub fn filter(&self) -> Result<MilestoneFilter, ApiError> {
    Ok(MilestoneFilter {
      program_ids: ids(self.program_id.as_deref())?,
      quarters:    quarters(self.quarter.as_deref())?,
      statuses:    parse_list("status", self.status.as_deref(), MilestoneStatus::from_label)?,
      key_only:    self.key_only,
    })
  }
}

// ─── Risks ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RiskParams {
  pub program_id: Option<String>,
  pub severity:   Option<String>,
  #[serde(default)]
  pub open_only:  bool,
}

impl RiskParams {
  pub fn filter(&self) -> Result<RiskFilter, ApiError> {
    Ok(RiskFilter {
      program_ids: ids(self.program_id.as_deref())?,
      severities:  parse_list("severity", self.severity.as_deref(), RiskSeverity::from_label)?,
      open_only:   self.open_only,
    })
  }

  /// Escalations on the same programs, open or not.
  pub fn escalation_filter(&self) -> Result<EscalationFilter, ApiError> {
    Ok(EscalationFilter {
      program_ids: ids(self.program_id.as_deref())?,
      open_only:   false,
    })
  }
}

// ─── Escalations ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct EscalationParams {
  pub program_id: Option<String>,
  #[serde(default)]
  pub open_only:  bool,
}

impl EscalationParams {
  pub fn filter(&self) -> Result<EscalationFilter, ApiError> {
    Ok(EscalationFilter {
      program_ids: ids(self.program_id.as_deref())?,
      open_only:   self.open_only,
    })
  }
}

// ─── Metrics ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct MetricParams {
  pub program_id: Option<String>,
}

impl MetricParams {
  pub fn filter(&self) -> Result<MetricFilter, ApiError> {
    Ok(MetricFilter { program_ids: ids(self.program_id.as_deref())? })
  }
}
