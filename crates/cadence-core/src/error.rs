//! Error types for `cadence-core`.

use chrono::NaiveDate;
use thiserror::Error;

/// A quarter string that does not have the form `Q<1-4> <year>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuarterError {
  #[error("malformed quarter {0:?}: expected \"Q<1-4> <year>\"")]
  Malformed(String),

  #[error("quarter number {0} is outside 1..=4")]
  NumberOutOfRange(u8),

  #[error("year {0} is outside the supported calendar range")]
  YearOutOfRange(i32),
}

/// A record that violates one of its declared field constraints. The record
/// is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
  #[error("{entity} has an empty `{field}`")]
  EmptyField {
    entity: &'static str,
    field:  &'static str,
  },

  #[error("program {id}: percent_complete {value} is outside [0, 100]")]
  PercentOutOfRange { id: String, value: f64 },

  #[error("program {id}: completed but only {value}% complete")]
  CompletedBelowFull { id: String, value: f64 },

  #[error("program {id}: start date {start} is after target end date {end}")]
  StartAfterEnd {
    id:    String,
    start: NaiveDate,
    end:   NaiveDate,
  },

  #[error("milestone {id}: completed without a completed_date")]
  CompletedWithoutDate { id: String },

  #[error("escalation {id}: resolved on {resolved} before it was raised on {raised}")]
  ResolvedBeforeRaised {
    id:       String,
    raised:   NaiveDate,
    resolved: NaiveDate,
  },

  #[error("{entity} {id}: `{field}` must be a non-negative number, got {value}")]
  Negative {
    entity: &'static str,
    id:     String,
    field:  &'static str,
    value:  f64,
  },
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid record: {0}")]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Quarter(#[from] QuarterError),

  #[error("{kind} {id} references unknown program {program_id}")]
  DanglingProgram {
    kind:       &'static str,
    id:         String,
    program_id: String,
  },

  #[error("escalation {id} references unknown risk {risk_id}")]
  DanglingRisk { id: String, risk_id: String },

  #[error("duplicate {kind} id {id}")]
  DuplicateId { kind: &'static str, id: String },

  #[error("program {program_id} has more than one metric for the week of {week_start}")]
  DuplicateMetric {
    program_id: String,
    week_start: NaiveDate,
  },

  #[error("metric week {week_start} is not a whole number of weeks after {first}")]
  OffCycleWeek {
    week_start: NaiveDate,
    first:      NaiveDate,
  },

  #[error("source error: {0}")]
  Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
