//! Relational selections over entity collections.
//!
//! Each filter dimension is an optional membership set: `None` places no
//! restriction, `Some(set)` keeps only records whose value is in `set` (an
//! empty set therefore keeps nothing). Dimensions combine with logical AND.

use crate::{
  model::{DeliveryMetric, Escalation, Milestone, Program, RiskItem},
  quarter::Quarter,
  status::{MilestoneStatus, ProgramStatus, RiskSeverity},
};

pub trait Filter<T> {
  fn matches(&self, item: &T) -> bool;

  /// Clone out every item that [`Filter::matches`].
  fn apply(&self, items: &[T]) -> Vec<T>
  where
    T: Clone,
  {
    items.iter().filter(|item| self.matches(item)).cloned().collect()
  }
}

fn member<T: PartialEq>(set: Option<&Vec<T>>, value: &T) -> bool {
  set.is_none_or(|set| set.contains(value))
}

fn member_str(set: Option<&Vec<String>>, value: &str) -> bool {
  set.is_none_or(|set| set.iter().any(|s| s == value))
}

// ─── Programs ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ProgramFilter {
  pub program_ids: Option<Vec<String>>,
  pub statuses:    Option<Vec<ProgramStatus>>,
}

impl Filter<Program> for ProgramFilter {
  fn matches(&self, p: &Program) -> bool {
    member_str(self.program_ids.as_ref(), &p.id)
      && member(self.statuses.as_ref(), &p.status)
  }
}

// ─── Milestones ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MilestoneFilter {
  pub program_ids: Option<Vec<String>>,
  pub quarters:    Option<Vec<Quarter>>,
  pub statuses:    Option<Vec<MilestoneStatus>>,
  /// Keep only key milestones.
  pub key_only:    bool,
}

impl Filter<Milestone> for MilestoneFilter {
  fn matches(&self, m: &Milestone) -> bool {
    member_str(self.program_ids.as_ref(), &m.program_id)
      && member(self.quarters.as_ref(), &m.quarter)
      && member(self.statuses.as_ref(), &m.status)
      && (!self.key_only || m.is_key_milestone)
  }
}

// ─── Risks ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RiskFilter {
  pub program_ids: Option<Vec<String>>,
  pub severities:  Option<Vec<RiskSeverity>>,
  pub open_only:   bool,
}

impl Filter<RiskItem> for RiskFilter {
  fn matches(&self, r: &RiskItem) -> bool {
    member_str(self.program_ids.as_ref(), &r.program_id)
      && member(self.severities.as_ref(), &r.severity)
      && (!self.open_only || r.is_open)
  }
}

// ─── Escalations ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct EscalationFilter {
  pub program_ids: Option<Vec<String>>,
  pub open_only:   bool,
}

impl Filter<Escalation> for EscalationFilter {
  fn matches(&self, e: &Escalation) -> bool {
    member_str(self.program_ids.as_ref(), &e.program_id) && (!self.open_only || e.is_open())
  }
}

// ─── Metrics ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MetricFilter {
  pub program_ids: Option<Vec<String>>,
}

impl Filter<DeliveryMetric> for MetricFilter {
  fn matches(&self, m: &DeliveryMetric) -> bool {
    member_str(self.program_ids.as_ref(), &m.program_id)
  }
}
