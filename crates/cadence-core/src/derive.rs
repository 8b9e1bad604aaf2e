//! Pure derived-metric functions: RAG classification, risk scoring, quarter
//! arithmetic, day deltas, and percent change.

use chrono::{Local, NaiveDate};

use crate::{
  error::QuarterError,
  quarter::Quarter,
  status::{ProgramStatus, RiskLikelihood, RiskSeverity},
};

/// Gap (in percentage points) up to which a program is still on track.
pub const ON_TRACK_MAX_GAP: f64 = 10.0;
/// Gap up to which a program is at risk; anything wider is off track.
pub const AT_RISK_MAX_GAP: f64 = 25.0;

/// Classify progress against a target completion percentage.
///
/// Boundaries are inclusive on the healthier side: a gap of exactly 10 is on
/// track and exactly 25 is at risk.
pub fn rag_status(percent_complete: f64, target_percent: f64) -> ProgramStatus {
  if percent_complete >= 100.0 {
    return ProgramStatus::Completed;
  }
  let gap = target_percent - percent_complete;
  if gap <= ON_TRACK_MAX_GAP {
    ProgramStatus::OnTrack
  } else if gap <= AT_RISK_MAX_GAP {
    ProgramStatus::AtRisk
  } else {
    ProgramStatus::OffTrack
  }
}

/// Severity weight × likelihood weight; always in `1..=16`.
pub fn risk_score(severity: RiskSeverity, likelihood: RiskLikelihood) -> u8 {
  severity.weight() * likelihood.weight()
}

/// `(first day, last day)` of a quarter written as `"Q<n> <year>"`.
pub fn quarter_date_range(
  quarter: &str,
) -> Result<(NaiveDate, NaiveDate), QuarterError> {
  Ok(quarter.parse::<Quarter>()?.date_range())
}

/// The quarter containing `today`.
pub fn current_quarter(today: NaiveDate) -> Quarter { Quarter::containing(today) }

/// Signed whole days from `today` to `target`; negative when `target` is past.
pub fn days_until(target: NaiveDate, today: NaiveDate) -> i64 {
  (target - today).num_days()
}

/// [`days_until`] evaluated against the local calendar date.
pub fn days_until_today(target: NaiveDate) -> i64 {
  days_until(target, Local::now().date_naive())
}

/// Human-readable form of a day delta.
pub fn format_delta(days: i64) -> String {
  match days {
    0 => "Today".to_string(),
    d if d > 0 => format!("In {d} days"),
    d => format!("{} days ago", d.unsigned_abs()),
  }
}

/// Relative change from `previous` to `current` in percent, or `None` when
/// `previous` is zero.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
  if previous == 0.0 {
    return None;
  }
  Some((current - previous) / previous * 100.0)
}

/// Round to one decimal place, halves away from zero.
pub fn round1(value: f64) -> f64 { (value * 10.0).round() / 10.0 }

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn rag_boundaries() {
    assert_eq!(rag_status(70.0, 75.0), ProgramStatus::OnTrack);
    assert_eq!(rag_status(65.0, 75.0), ProgramStatus::OnTrack);
    assert_eq!(rag_status(64.0, 75.0), ProgramStatus::AtRisk);
    assert_eq!(rag_status(55.0, 75.0), ProgramStatus::AtRisk);
    assert_eq!(rag_status(50.0, 75.0), ProgramStatus::AtRisk);
    assert_eq!(rag_status(49.0, 75.0), ProgramStatus::OffTrack);
    assert_eq!(rag_status(40.0, 75.0), ProgramStatus::OffTrack);
    assert_eq!(rag_status(100.0, 100.0), ProgramStatus::Completed);
  }

  #[test]
  fn ahead_of_target_is_on_track() {
    assert_eq!(rag_status(90.0, 60.0), ProgramStatus::OnTrack);
  }

  #[test]
  fn risk_scores_stay_in_range() {
    for severity in RiskSeverity::iter() {
      for likelihood in RiskLikelihood::iter() {
        let score = risk_score(severity, likelihood);
        assert!((1..=16).contains(&score), "{severity}/{likelihood} → {score}");
      }
    }
    assert_eq!(risk_score(RiskSeverity::Low, RiskLikelihood::Low), 1);
    assert_eq!(risk_score(RiskSeverity::Medium, RiskLikelihood::Medium), 4);
    assert_eq!(risk_score(RiskSeverity::Critical, RiskLikelihood::High), 12);
  }

  #[test]
  fn quarter_ranges() {
    assert_eq!(
      quarter_date_range("Q1 2026").unwrap(),
      (date(2026, 1, 1), date(2026, 3, 31))
    );
    assert_eq!(
      quarter_date_range("Q4 2025").unwrap(),
      (date(2025, 10, 1), date(2025, 12, 31))
    );
    assert!(quarter_date_range("first quarter").is_err());
  }

  #[test]
  fn current_quarter_of_date() {
    assert_eq!(current_quarter(date(2026, 10, 19)).to_string(), "Q4 2026");
    assert_eq!(current_quarter(date(2026, 1, 1)).to_string(), "Q1 2026");
  }

  #[test]
  fn day_deltas() {
    let today = date(2026, 3, 1);
    assert_eq!(days_until(date(2026, 3, 11), today), 10);
    assert_eq!(days_until(date(2026, 2, 27), today), -2);
    assert_eq!(days_until(today, today), 0);
    assert!(days_until_today(date(2099, 12, 31)) > 0);
    assert!(days_until_today(date(2020, 1, 1)) < 0);
  }

  #[test]
  fn delta_text() {
    assert_eq!(format_delta(0), "Today");
    assert_eq!(format_delta(5), "In 5 days");
    assert_eq!(format_delta(-3), "3 days ago");
  }

  #[test]
  fn percent_change_cases() {
    assert_eq!(percent_change(110.0, 100.0), Some(10.0));
    assert_eq!(percent_change(90.0, 100.0), Some(-10.0));
    assert_eq!(percent_change(100.0, 0.0), None);
    assert_eq!(percent_change(0.0, 0.0), None);
  }

  #[test]
  fn rounding_to_one_decimal() {
    assert_eq!(round1(12.34), 12.3);
    assert_eq!(round1(12.36), 12.4);
    assert_eq!(round1(-0.04), 0.0);
  }
}
