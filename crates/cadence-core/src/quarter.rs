//! Calendar quarters written as `"Q<1-4> <year>"`.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::QuarterError;

/// A calendar quarter. Orders chronologically (year first, then number).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Quarter {
  year:   i32,
  number: u8,
}

impl Quarter {
  pub fn new(number: u8, year: i32) -> Result<Self, QuarterError> {
    if !(1..=4).contains(&number) {
      return Err(QuarterError::NumberOutOfRange(number));
    }
    // Reject years chrono cannot represent so `date_range` never fails later.
    if NaiveDate::from_ymd_opt(year, 1, 1).is_none()
      || NaiveDate::from_ymd_opt(year, 12, 31).is_none()
    {
      return Err(QuarterError::YearOutOfRange(year));
    }
    Ok(Self { year, number })
  }

  /// Build a quarter in a `const` context, e.g. for authored catalogues.
  ///
  /// # Panics
  ///
  /// If `number` is not in `1..=4`; in a `const` item this is a compile
  /// error.
  pub const fn from_parts(number: u8, year: i32) -> Self {
    assert!(number >= 1 && number <= 4, "quarter number must be 1..=4");
    Self { year, number }
  }

  /// The quarter a date falls in.
  pub fn containing(date: NaiveDate) -> Self {
    Self {
      year:   date.year(),
      number: (date.month0() / 3 + 1) as u8,
    }
  }

  pub fn number(self) -> u8 { self.number }

  pub fn year(self) -> i32 { self.year }

  /// First month of the quarter, `(n - 1) * 3 + 1`.
  pub fn start_month(self) -> u32 { (u32::from(self.number) - 1) * 3 + 1 }

  /// First day of the quarter.
  pub fn start(self) -> NaiveDate {
    NaiveDate::from_ymd_opt(self.year, self.start_month(), 1)
      .unwrap_or(NaiveDate::MIN)
  }

  /// Last day of the quarter. Q4 is pinned to December 31 so no year
  /// rollover is involved.
  pub fn end(self) -> NaiveDate {
    if self.number == 4 {
      return NaiveDate::from_ymd_opt(self.year, 12, 31).unwrap_or(NaiveDate::MAX);
    }
    NaiveDate::from_ymd_opt(self.year, self.start_month() + 3, 1)
      .and_then(|next| next.checked_sub_days(Days::new(1)))
      .unwrap_or(NaiveDate::MAX)
  }

  /// `(first day, last day)`, both inclusive.
  pub fn date_range(self) -> (NaiveDate, NaiveDate) { (self.start(), self.end()) }

  pub fn contains(self, date: NaiveDate) -> bool {
    let (start, end) = self.date_range();
    start <= date && date <= end
  }
}

impl FromStr for Quarter {
  type Err = QuarterError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let malformed = || QuarterError::Malformed(s.to_string());
    let mut parts = s.split_whitespace();
    let (Some(q), Some(year), None) = (parts.next(), parts.next(), parts.next())
    else {
      return Err(malformed());
    };
    let number: u8 = q
      .strip_prefix('Q')
      .and_then(|n| n.parse().ok())
      .ok_or_else(malformed)?;
    let year: i32 = year.parse().map_err(|_| malformed())?;
    Self::new(number, year)
  }
}

impl TryFrom<String> for Quarter {
  type Error = QuarterError;

  fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<Quarter> for String {
  fn from(q: Quarter) -> Self { q.to_string() }
}

impl fmt::Display for Quarter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Q{} {}", self.number, self.year)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn parses_and_displays() {
    let q: Quarter = "Q3 2025".parse().unwrap();
    assert_eq!(q.number(), 3);
    assert_eq!(q.year(), 2025);
    assert_eq!(q.start_month(), 7);
    assert_eq!(q.to_string(), "Q3 2025");
  }

  #[test]
  fn rejects_malformed_input() {
    assert!(matches!("2025 Q1".parse::<Quarter>(), Err(QuarterError::Malformed(_))));
    assert!(matches!("Q1".parse::<Quarter>(), Err(QuarterError::Malformed(_))));
    assert!(matches!("Q1 2025 x".parse::<Quarter>(), Err(QuarterError::Malformed(_))));
    assert_eq!("Q5 2025".parse::<Quarter>(), Err(QuarterError::NumberOutOfRange(5)));
    assert_eq!("Q0 2025".parse::<Quarter>(), Err(QuarterError::NumberOutOfRange(0)));
  }

  #[test]
  fn ranges_cover_whole_quarter() {
    let q2: Quarter = "Q2 2024".parse().unwrap();
    assert_eq!(q2.date_range(), (date(2024, 4, 1), date(2024, 6, 30)));
    let q1: Quarter = "Q1 2024".parse().unwrap();
    assert_eq!(q1.end(), date(2024, 3, 31));
    let q4: Quarter = "Q4 2025".parse().unwrap();
    assert_eq!(q4.date_range(), (date(2025, 10, 1), date(2025, 12, 31)));
  }

  #[test]
  fn containing_and_contains_agree() {
    let d = date(2026, 2, 14);
    let q = Quarter::containing(d);
    assert_eq!(q.to_string(), "Q1 2026");
    assert!(q.contains(d));
    assert!(!q.contains(date(2026, 4, 1)));
  }

  #[test]
  fn orders_chronologically() {
    let mut qs: Vec<Quarter> = ["Q1 2026", "Q4 2025", "Q2 2025"]
      .iter()
      .map(|s| s.parse().unwrap())
      .collect();
    qs.sort();
    let labels: Vec<String> = qs.iter().map(ToString::to_string).collect();
    assert_eq!(labels, vec!["Q2 2025", "Q4 2025", "Q1 2026"]);
  }

  #[test]
  fn serde_as_text() {
    let q: Quarter = serde_json::from_str("\"Q1 2026\"").unwrap();
    assert_eq!(serde_json::to_string(&q).unwrap(), "\"Q1 2026\"");
    assert!(serde_json::from_str::<Quarter>("\"Q9 2026\"").is_err());
  }
}
