//! Entity records: programs and the milestones, risks, escalations, and
//! weekly delivery metrics that reference them by program id.
//!
//! Records are plain data. [`Validate`] enforces each entity's declared
//! constraints; [`crate::source::Dataset`] refuses to hold a record that
//! fails it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  error::ValidationError,
  quarter::Quarter,
  status::{
    EscalationLevel, MilestoneStatus, ProgramStatus, RiskLikelihood,
    RiskSeverity,
  },
};

// ─── Validation ──────────────────────────────────────────────────────────────

pub trait Validate: Sized {
  fn validate(&self) -> Result<(), ValidationError>;

  /// Return `self` only if it passes [`Validate::validate`].
  fn validated(self) -> Result<Self, ValidationError> {
    self.validate()?;
    Ok(self)
  }
}

fn require_non_empty(
  entity: &'static str,
  field: &'static str,
  value: &str,
) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Err(ValidationError::EmptyField { entity, field });
  }
  Ok(())
}

fn require_non_negative(
  entity: &'static str,
  id: &str,
  field: &'static str,
  value: f64,
) -> Result<(), ValidationError> {
  if !value.is_finite() || value < 0.0 {
    return Err(ValidationError::Negative {
      entity,
      id: id.to_string(),
      field,
      value,
    });
  }
  Ok(())
}

// ─── Program ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
  pub id:               String,
  pub name:             String,
  pub department:       String,
  pub status:           ProgramStatus,
  /// In `[0, 100]`; exactly 100 when `status` is completed.
  pub percent_complete: f64,
  pub start_date:       NaiveDate,
  pub target_end_date:  NaiveDate,
  pub owner:            String,
  #[serde(default)]
  pub description:      String,
  #[serde(default)]
  pub budget_millions:  f64,
}

impl Validate for Program {
  fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("program", "id", &self.id)?;
    require_non_empty("program", "name", &self.name)?;
    if !(0.0..=100.0).contains(&self.percent_complete) {
      return Err(ValidationError::PercentOutOfRange {
        id:    self.id.clone(),
        value: self.percent_complete,
      });
    }
    if self.status == ProgramStatus::Completed && self.percent_complete != 100.0 {
      return Err(ValidationError::CompletedBelowFull {
        id:    self.id.clone(),
        value: self.percent_complete,
      });
    }
    if self.start_date > self.target_end_date {
      return Err(ValidationError::StartAfterEnd {
        id:    self.id.clone(),
        start: self.start_date,
        end:   self.target_end_date,
      });
    }
    require_non_negative("program", &self.id, "budget_millions", self.budget_millions)
  }
}

// ─── Milestone ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
  pub id:               String,
  pub program_id:       String,
  pub name:             String,
  pub status:           MilestoneStatus,
  pub due_date:         NaiveDate,
  /// Present whenever `status` is completed.
  pub completed_date:   Option<NaiveDate>,
  pub quarter:          Quarter,
  #[serde(default)]
  pub owner:            String,
  #[serde(default)]
  pub is_key_milestone: bool,
}

impl Milestone {
  /// `Some(true)` when delivered on or before the due date, `None` while the
  /// milestone has no completion date.
  pub fn is_on_time(&self) -> Option<bool> {
    self.completed_date.map(|done| done <= self.due_date)
  }
}

impl Validate for Milestone {
  fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("milestone", "id", &self.id)?;
    require_non_empty("milestone", "program_id", &self.program_id)?;
    if self.status == MilestoneStatus::Completed && self.completed_date.is_none() {
      return Err(ValidationError::CompletedWithoutDate { id: self.id.clone() });
    }
    Ok(())
  }
}

// ─── Risk ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskItem {
  pub id:          String,
  pub program_id:  String,
  pub title:       String,
  #[serde(default)]
  pub description: String,
  pub severity:    RiskSeverity,
  pub likelihood:  RiskLikelihood,
  #[serde(default)]
  pub mitigation:  String,
  #[serde(default)]
  pub owner:       String,
  pub raised_date: NaiveDate,
  pub is_open:     bool,
}

impl RiskItem {
  pub fn score(&self) -> u8 { crate::derive::risk_score(self.severity, self.likelihood) }
}

impl Validate for RiskItem {
  fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("risk", "id", &self.id)?;
    require_non_empty("risk", "program_id", &self.program_id)?;
    require_non_empty("risk", "title", &self.title)
  }
}

// ─── Escalation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Escalation {
  pub id:            String,
  pub program_id:    String,
  pub risk_id:       Option<String>,
  pub title:         String,
  pub level:         EscalationLevel,
  pub raised_date:   NaiveDate,
  /// Absent while the escalation is open.
  pub resolved_date: Option<NaiveDate>,
  #[serde(default)]
  pub resolution:    String,
}

impl Escalation {
  pub fn is_open(&self) -> bool { self.resolved_date.is_none() }
}

impl Validate for Escalation {
  fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("escalation", "id", &self.id)?;
    require_non_empty("escalation", "program_id", &self.program_id)?;
    if let Some(resolved) = self.resolved_date
      && resolved < self.raised_date
    {
      return Err(ValidationError::ResolvedBeforeRaised {
        id: self.id.clone(),
        raised: self.raised_date,
        resolved,
      });
    }
    Ok(())
  }
}

// ─── Delivery metrics ────────────────────────────────────────────────────────

/// One program's delivery figures for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryMetric {
  pub program_id:           String,
  /// Monday of the measured week.
  pub week_start:           NaiveDate,
  pub velocity:             f64,
  pub planned_points:       f64,
  pub delivered_points:     f64,
  pub defect_count:         u32,
  pub incident_count:       u32,
  /// Mean time to recover, in hours.
  pub mttr_hours:           f64,
  /// Deploys per week.
  pub deployment_frequency: f64,
  /// Commit to deploy, in days.
  pub lead_time_days:       f64,
  /// Percentage of deploys causing a failure.
  pub change_failure_rate:  f64,
}

impl Validate for DeliveryMetric {
  fn validate(&self) -> Result<(), ValidationError> {
    require_non_empty("metric", "program_id", &self.program_id)?;
    let id = format!("{}@{}", self.program_id, self.week_start);
    for (field, value) in [
      ("velocity", self.velocity),
      ("planned_points", self.planned_points),
      ("delivered_points", self.delivered_points),
      ("mttr_hours", self.mttr_hours),
      ("deployment_frequency", self.deployment_frequency),
      ("lead_time_days", self.lead_time_days),
      ("change_failure_rate", self.change_failure_rate),
    ] {
      require_non_negative("metric", &id, field, value)?;
    }
    Ok(())
  }
}

// ─── Weekly snapshot ─────────────────────────────────────────────────────────

/// Portfolio-wide aggregate of every [`DeliveryMetric`] for one week.
/// Derived by [`crate::aggregate::weekly_snapshots`]; never authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySnapshot {
  pub week_start:               NaiveDate,
  pub total_velocity:           f64,
  pub total_defects:            u32,
  pub total_incidents:          u32,
  pub avg_mttr_hours:           f64,
  pub avg_deployment_frequency: f64,
  pub avg_lead_time_days:       f64,
  pub avg_change_failure_rate:  f64,
  pub programs_on_track:        u32,
  pub programs_at_risk:         u32,
  pub programs_off_track:       u32,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn program() -> Program {
    Program {
      id:               "PRG-100".into(),
      name:             "Edge Caching".into(),
      department:       "Platform".into(),
      status:           ProgramStatus::OnTrack,
      percent_complete: 40.0,
      start_date:       date(2025, 1, 1),
      target_end_date:  date(2025, 12, 31),
      owner:            "Ana".into(),
      description:      String::new(),
      budget_millions:  1.0,
    }
  }

  #[test]
  fn valid_program_passes() {
    assert!(program().validated().is_ok());
  }

  #[test]
  fn percent_outside_range_is_rejected() {
    let mut p = program();
    p.percent_complete = 101.0;
    assert!(matches!(
      p.validate(),
      Err(ValidationError::PercentOutOfRange { .. })
    ));
    p.percent_complete = -1.0;
    assert!(p.validate().is_err());
  }

  #[test]
  fn completed_program_must_be_full() {
    let mut p = program();
    p.status = ProgramStatus::Completed;
    assert!(matches!(
      p.validate(),
      Err(ValidationError::CompletedBelowFull { .. })
    ));
    p.percent_complete = 100.0;
    assert!(p.validate().is_ok());
  }

  #[test]
  fn start_after_end_is_rejected() {
    let mut p = program();
    p.start_date = date(2026, 1, 1);
    assert!(matches!(p.validate(), Err(ValidationError::StartAfterEnd { .. })));
  }

  #[test]
  fn completed_milestone_needs_date() {
    let mut m = Milestone {
      id:               "MS-900".into(),
      program_id:       "PRG-100".into(),
      name:             "Cutover".into(),
      status:           MilestoneStatus::Completed,
      due_date:         date(2025, 5, 1),
      completed_date:   None,
      quarter:          "Q2 2025".parse().unwrap(),
      owner:            String::new(),
      is_key_milestone: true,
    };
    assert!(matches!(
      m.validate(),
      Err(ValidationError::CompletedWithoutDate { .. })
    ));

    m.completed_date = Some(date(2025, 4, 28));
    assert!(m.validate().is_ok());
    assert_eq!(m.is_on_time(), Some(true));
    m.completed_date = Some(date(2025, 5, 2));
    assert_eq!(m.is_on_time(), Some(false));
  }

  #[test]
  fn escalation_cannot_resolve_before_raised() {
    let e = Escalation {
      id:            "ESC-900".into(),
      program_id:    "PRG-100".into(),
      risk_id:       None,
      title:         "Vendor slip".into(),
      level:         EscalationLevel::Director,
      raised_date:   date(2025, 6, 1),
      resolved_date: Some(date(2025, 5, 1)),
      resolution:    String::new(),
    };
    assert!(!e.is_open());
    assert!(matches!(
      e.validate(),
      Err(ValidationError::ResolvedBeforeRaised { .. })
    ));
  }

  #[test]
  fn metric_rejects_negative_and_nan() {
    let mut m = DeliveryMetric {
      program_id:           "PRG-100".into(),
      week_start:           date(2025, 7, 7),
      velocity:             10.0,
      planned_points:       11.0,
      delivered_points:     9.0,
      defect_count:         1,
      incident_count:       0,
      mttr_hours:           1.5,
      deployment_frequency: 3.0,
      lead_time_days:       2.0,
      change_failure_rate:  5.0,
    };
    assert!(m.validate().is_ok());
    m.lead_time_days = -0.1;
    assert!(matches!(
      m.validate(),
      Err(ValidationError::Negative { field: "lead_time_days", .. })
    ));
    m.lead_time_days = f64::NAN;
    assert!(m.validate().is_err());
  }
}
