//! Closed enumerations for status, severity, likelihood, and escalation level.
//!
//! Every variant carries a display label defined alongside it but separate
//! from the variant itself. Logic compares variants; the label is the wire
//! and display form, and consumers match on it, so it is also what serde
//! reads and writes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::EnumIter;

macro_rules! labelled_enum {
  (
    $(#[$meta:meta])*
    pub enum $name:ident {
      $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
    pub enum $name {
      $( $(#[$vmeta])* $variant ),+
    }

    impl $name {
      /// The display label for this variant.
      pub fn label(self) -> &'static str {
        match self {
          $( Self::$variant => $label ),+
        }
      }

      /// Look a variant up by its exact display label.
      pub fn from_label(label: &str) -> Option<Self> {
        match label {
          $( $label => Some(Self::$variant), )+
          _ => None,
        }
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
      }
    }

    impl Serialize for $name {
      fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
      }
    }

    impl<'de> Deserialize<'de> for $name {
      fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_label(&raw).ok_or_else(|| {
          serde::de::Error::custom(format!(
            "unknown {} label: {raw:?}",
            stringify!($name)
          ))
        })
      }
    }
  };
}

labelled_enum! {
  /// Portfolio health of a program (RAG plus completed).
  pub enum ProgramStatus {
    OnTrack => "On Track",
    AtRisk => "At Risk",
    OffTrack => "Off Track",
    Completed => "Completed",
  }
}

impl ProgramStatus {
  /// At risk or off track.
  pub fn needs_attention(self) -> bool {
    matches!(self, Self::AtRisk | Self::OffTrack)
  }
}

labelled_enum! {
  pub enum MilestoneStatus {
    NotStarted => "Not Started",
    InProgress => "In Progress",
    Completed => "Completed",
    Delayed => "Delayed",
    Blocked => "Blocked",
  }
}

impl MilestoneStatus {
  /// Not yet delivered and not stuck: the milestone is still on the plan.
  pub fn is_upcoming(self) -> bool {
    matches!(self, Self::NotStarted | Self::InProgress)
  }
}

labelled_enum! {
  /// Impact of a risk, in increasing order.
  pub enum RiskSeverity {
    Low => "Low",
    Medium => "Medium",
    High => "High",
    Critical => "Critical",
  }
}

impl RiskSeverity {
  /// Multiplicative weight used by [`crate::derive::risk_score`].
  pub fn weight(self) -> u8 {
    match self {
      Self::Low => 1,
      Self::Medium => 2,
      Self::High => 3,
      Self::Critical => 4,
    }
  }

  /// Zero-based row index in the risk heatmap.
  pub fn ordinal(self) -> usize { usize::from(self.weight()) - 1 }
}

labelled_enum! {
  /// Probability of a risk materialising, in increasing order.
  pub enum RiskLikelihood {
    Low => "Low",
    Medium => "Medium",
    High => "High",
  }
}

impl RiskLikelihood {
  pub fn weight(self) -> u8 {
    match self {
      Self::Low => 1,
      Self::Medium => 2,
      Self::High => 3,
    }
  }

  /// Zero-based column index in the risk heatmap.
  pub fn ordinal(self) -> usize { usize::from(self.weight()) - 1 }
}

labelled_enum! {
  pub enum EscalationLevel {
    TeamLead => "Team Lead",
    Director => "Director",
    VP => "VP",
    CSuite => "C-Suite",
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn labels_round_trip_through_from_label() {
    for status in ProgramStatus::iter() {
      assert_eq!(ProgramStatus::from_label(status.label()), Some(status));
    }
    for status in MilestoneStatus::iter() {
      assert_eq!(MilestoneStatus::from_label(status.label()), Some(status));
    }
    for level in EscalationLevel::iter() {
      assert_eq!(EscalationLevel::from_label(level.label()), Some(level));
    }
  }

  #[test]
  fn serde_uses_display_labels() {
    let json = serde_json::to_string(&ProgramStatus::OnTrack).unwrap();
    assert_eq!(json, "\"On Track\"");
    let level: EscalationLevel = serde_json::from_str("\"C-Suite\"").unwrap();
    assert_eq!(level, EscalationLevel::CSuite);
  }

  #[test]
  fn unknown_label_is_rejected() {
    assert!(serde_json::from_str::<RiskSeverity>("\"Severe\"").is_err());
    assert_eq!(MilestoneStatus::from_label("in progress"), None);
  }

  #[test]
  fn ordinals_follow_declaration_order() {
    let severities: Vec<_> = RiskSeverity::iter().map(RiskSeverity::ordinal).collect();
    assert_eq!(severities, vec![0, 1, 2, 3]);
    let likelihoods: Vec<_> =
      RiskLikelihood::iter().map(RiskLikelihood::ordinal).collect();
    assert_eq!(likelihoods, vec![0, 1, 2]);
    assert!(RiskSeverity::Critical > RiskSeverity::High);
  }
}
