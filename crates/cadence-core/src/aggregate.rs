//! Portfolio aggregates built from entity collections.
//!
//! Every aggregate groups explicitly into an ordered map from group key to
//! the matching records, then reduces each group. Empty input yields an empty
//! (or zeroed) result, never an error.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::{
  derive::round1,
  model::{DeliveryMetric, Escalation, Milestone, Program, RiskItem, WeeklySnapshot},
  quarter::Quarter,
  status::{MilestoneStatus, ProgramStatus, RiskLikelihood, RiskSeverity},
};

// ─── Grouping helpers ────────────────────────────────────────────────────────

/// Metric rows keyed by `week_start`, ascending, preserving input order
/// within a week.
pub fn group_by_week<'a, I>(metrics: I) -> BTreeMap<NaiveDate, Vec<&'a DeliveryMetric>>
where
  I: IntoIterator<Item = &'a DeliveryMetric>,
{
  let mut weeks: BTreeMap<NaiveDate, Vec<&DeliveryMetric>> = BTreeMap::new();
  for metric in metrics {
    weeks.entry(metric.week_start).or_default().push(metric);
  }
  weeks
}

fn sum(rows: &[&DeliveryMetric], field: impl Fn(&DeliveryMetric) -> f64) -> f64 {
  rows.iter().map(|m| field(m)).sum()
}

fn mean(rows: &[&DeliveryMetric], field: impl Fn(&DeliveryMetric) -> f64) -> f64 {
  if rows.is_empty() {
    return 0.0;
  }
  sum(rows, field) / rows.len() as f64
}

// ─── Status counts ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
  pub on_track:  u32,
  pub at_risk:   u32,
  pub off_track: u32,
  pub completed: u32,
}

impl StatusCounts {
  pub fn get(&self, status: ProgramStatus) -> u32 {
    match status {
      ProgramStatus::OnTrack => self.on_track,
      ProgramStatus::AtRisk => self.at_risk,
      ProgramStatus::OffTrack => self.off_track,
      ProgramStatus::Completed => self.completed,
    }
  }

  pub fn total(&self) -> u32 {
    self.on_track + self.at_risk + self.off_track + self.completed
  }
}

pub fn status_counts(programs: &[Program]) -> StatusCounts {
  let mut counts = StatusCounts::default();
  for program in programs {
    let slot = match program.status {
      ProgramStatus::OnTrack => &mut counts.on_track,
      ProgramStatus::AtRisk => &mut counts.at_risk,
      ProgramStatus::OffTrack => &mut counts.off_track,
      ProgramStatus::Completed => &mut counts.completed,
    };
    *slot += 1;
  }
  counts
}

// ─── Weekly snapshots ────────────────────────────────────────────────────────

/// One [`WeeklySnapshot`] per distinct `week_start`, ascending.
///
/// Program status is not time-varying in the model, so the portfolio status
/// counts are computed once and attached unchanged to every week.
pub fn weekly_snapshots(
  metrics: &[DeliveryMetric],
  programs: &[Program],
) -> Vec<WeeklySnapshot> {
  let counts = status_counts(programs);
  group_by_week(metrics)
    .into_iter()
    .map(|(week_start, rows)| WeeklySnapshot {
      week_start,
      total_velocity: round1(sum(&rows, |m| m.velocity)),
      total_defects: rows.iter().map(|m| m.defect_count).sum(),
      total_incidents: rows.iter().map(|m| m.incident_count).sum(),
      avg_mttr_hours: round1(mean(&rows, |m| m.mttr_hours)),
      avg_deployment_frequency: round1(mean(&rows, |m| m.deployment_frequency)),
      avg_lead_time_days: round1(mean(&rows, |m| m.lead_time_days)),
      avg_change_failure_rate: round1(mean(&rows, |m| m.change_failure_rate)),
      programs_on_track: counts.on_track,
      programs_at_risk: counts.at_risk,
      programs_off_track: counts.off_track,
    })
    .collect()
}

// ─── Metric trends ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocityPoint {
  pub week_start:       NaiveDate,
  pub velocity:         f64,
  pub planned_points:   f64,
  pub delivered_points: f64,
}

/// Weekly velocity, planned, and delivered points summed across programs, or
/// for a single program when `program_id` is given.
pub fn velocity_trend(
  metrics: &[DeliveryMetric],
  program_id: Option<&str>,
) -> Vec<VelocityPoint> {
  let selected = metrics
    .iter()
    .filter(|m| program_id.is_none_or(|id| m.program_id == id));
  group_by_week(selected)
    .into_iter()
    .map(|(week_start, rows)| VelocityPoint {
      week_start,
      velocity: round1(sum(&rows, |m| m.velocity)),
      planned_points: round1(sum(&rows, |m| m.planned_points)),
      delivered_points: round1(sum(&rows, |m| m.delivered_points)),
    })
    .collect()
}

/// Weekly means of the four DORA indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoraPoint {
  pub week_start:           NaiveDate,
  pub deployment_frequency: f64,
  pub lead_time_days:       f64,
  pub change_failure_rate:  f64,
  pub mttr_hours:           f64,
}

pub fn dora_trend(metrics: &[DeliveryMetric]) -> Vec<DoraPoint> {
  group_by_week(metrics)
    .into_iter()
    .map(|(week_start, rows)| DoraPoint {
      week_start,
      deployment_frequency: round1(mean(&rows, |m| m.deployment_frequency)),
      lead_time_days: round1(mean(&rows, |m| m.lead_time_days)),
      change_failure_rate: round1(mean(&rows, |m| m.change_failure_rate)),
      mttr_hours: round1(mean(&rows, |m| m.mttr_hours)),
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefectPoint {
  pub week_start:     NaiveDate,
  pub defect_count:   u32,
  pub incident_count: u32,
}

pub fn defect_trend(metrics: &[DeliveryMetric]) -> Vec<DefectPoint> {
  group_by_week(metrics)
    .into_iter()
    .map(|(week_start, rows)| DefectPoint {
      week_start,
      defect_count: rows.iter().map(|m| m.defect_count).sum(),
      incident_count: rows.iter().map(|m| m.incident_count).sum(),
    })
    .collect()
}

/// Headline figures for the most recent week present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestWeek {
  pub week_start:               NaiveDate,
  pub avg_deployment_frequency: f64,
  pub avg_lead_time_days:       f64,
  pub avg_change_failure_rate:  f64,
  pub avg_mttr_hours:           f64,
  pub total_velocity:           f64,
  pub total_incidents:          u32,
}

pub fn latest_week(metrics: &[DeliveryMetric]) -> Option<LatestWeek> {
  let (week_start, rows) = group_by_week(metrics).pop_last()?;
  Some(LatestWeek {
    week_start,
    avg_deployment_frequency: round1(mean(&rows, |m| m.deployment_frequency)),
    avg_lead_time_days: round1(mean(&rows, |m| m.lead_time_days)),
    avg_change_failure_rate: round1(mean(&rows, |m| m.change_failure_rate)),
    avg_mttr_hours: round1(mean(&rows, |m| m.mttr_hours)),
    total_velocity: round1(sum(&rows, |m| m.velocity)),
    total_incidents: rows.iter().map(|m| m.incident_count).sum(),
  })
}

// ─── Milestones ──────────────────────────────────────────────────────────────

/// On-time versus late delivery of completed milestones in one quarter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterPredictability {
  pub quarter: Quarter,
  pub on_time: u32,
  pub late:    u32,
  pub total:   u32,
}

/// Completed milestones bucketed by quarter, chronologically. A milestone is
/// on time when `completed_date <= due_date`.
pub fn delivery_predictability(milestones: &[Milestone]) -> Vec<QuarterPredictability> {
  let mut buckets: BTreeMap<Quarter, Vec<bool>> = BTreeMap::new();
  for milestone in milestones {
    if milestone.status != MilestoneStatus::Completed {
      continue;
    }
    if let Some(on_time) = milestone.is_on_time() {
      buckets.entry(milestone.quarter).or_default().push(on_time);
    }
  }
  buckets
    .into_iter()
    .map(|(quarter, outcomes)| {
      let total = outcomes.len() as u32;
      let on_time = outcomes.iter().filter(|&&hit| hit).count() as u32;
      QuarterPredictability { quarter, on_time, late: total - on_time, total }
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterStatusCount {
  pub quarter: Quarter,
  pub status:  MilestoneStatus,
  pub count:   u32,
}

/// Milestone counts per `(quarter, status)`; only non-zero pairs, ordered by
/// quarter then status.
pub fn milestone_status_by_quarter(milestones: &[Milestone]) -> Vec<QuarterStatusCount> {
  let mut counts: BTreeMap<(Quarter, MilestoneStatus), u32> = BTreeMap::new();
  for milestone in milestones {
    *counts.entry((milestone.quarter, milestone.status)).or_default() += 1;
  }
  counts
    .into_iter()
    .map(|((quarter, status), count)| QuarterStatusCount { quarter, status, count })
    .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MilestoneSummary {
  pub total:          u32,
  pub completed:      u32,
  pub in_progress:    u32,
  pub delayed:        u32,
  pub blocked:        u32,
  pub key_milestones: u32,
}

pub fn milestone_summary(milestones: &[Milestone]) -> MilestoneSummary {
  let mut summary = MilestoneSummary::default();
  for milestone in milestones {
    summary.total += 1;
    match milestone.status {
      MilestoneStatus::Completed => summary.completed += 1,
      MilestoneStatus::InProgress => summary.in_progress += 1,
      MilestoneStatus::Delayed => summary.delayed += 1,
      MilestoneStatus::Blocked => summary.blocked += 1,
      MilestoneStatus::NotStarted => {}
    }
    if milestone.is_key_milestone {
      summary.key_milestones += 1;
    }
  }
  summary
}

/// Key milestones that are not started or in progress, soonest first.
pub fn upcoming_key_milestones(milestones: &[Milestone], limit: usize) -> Vec<Milestone> {
  let mut upcoming: Vec<&Milestone> = milestones
    .iter()
    .filter(|m| m.is_key_milestone && m.status.is_upcoming())
    .collect();
  upcoming.sort_by_key(|m| m.due_date);
  upcoming.into_iter().take(limit).cloned().collect()
}

/// A milestone placed in its owning program's swim lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
  pub program_id:       String,
  pub program_name:     String,
  pub milestone_id:     String,
  pub name:             String,
  pub status:           MilestoneStatus,
  pub due_date:         NaiveDate,
  pub is_key_milestone: bool,
}

/// Milestones joined to their program name, ordered by program name then due
/// date. Milestones whose program is unknown are skipped.
pub fn milestone_timeline(milestones: &[Milestone], programs: &[Program]) -> Vec<TimelineEntry> {
  let names: BTreeMap<&str, &str> = programs
    .iter()
    .map(|p| (p.id.as_str(), p.name.as_str()))
    .collect();
  let mut entries: Vec<TimelineEntry> = milestones
    .iter()
    .filter_map(|m| {
      let program_name = names.get(m.program_id.as_str())?;
      Some(TimelineEntry {
        program_id:       m.program_id.clone(),
        program_name:     (*program_name).to_string(),
        milestone_id:     m.id.clone(),
        name:             m.name.clone(),
        status:           m.status,
        due_date:         m.due_date,
        is_key_milestone: m.is_key_milestone,
      })
    })
    .collect();
  entries.sort_by(|a, b| {
    a.program_name
      .cmp(&b.program_name)
      .then(a.due_date.cmp(&b.due_date))
  });
  entries
}

// ─── Risks ───────────────────────────────────────────────────────────────────

/// Open-risk counts indexed by `[severity ordinal][likelihood ordinal]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskHeatmap {
  pub severities:  Vec<RiskSeverity>,
  pub likelihoods: Vec<RiskLikelihood>,
  pub cells:       [[u32; 3]; 4],
}

impl RiskHeatmap {
  pub fn count(&self, severity: RiskSeverity, likelihood: RiskLikelihood) -> u32 {
    self.cells[severity.ordinal()][likelihood.ordinal()]
  }

  pub fn total(&self) -> u32 { self.cells.iter().flatten().sum() }
}

/// Count open risks per severity × likelihood cell; closed risks are ignored.
pub fn risk_heatmap(risks: &[RiskItem]) -> RiskHeatmap {
  let mut cells = [[0u32; 3]; 4];
  for risk in risks.iter().filter(|r| r.is_open) {
    cells[risk.severity.ordinal()][risk.likelihood.ordinal()] += 1;
  }
  RiskHeatmap {
    severities: RiskSeverity::iter().collect(),
    likelihoods: RiskLikelihood::iter().collect(),
    cells,
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityCount {
  pub severity: RiskSeverity,
  pub count:    u32,
}

/// Open risks per severity, in severity order; severities with no open risk
/// are omitted.
pub fn open_risks_by_severity(risks: &[RiskItem]) -> Vec<SeverityCount> {
  let mut counts: BTreeMap<RiskSeverity, u32> = BTreeMap::new();
  for risk in risks.iter().filter(|r| r.is_open) {
    *counts.entry(risk.severity).or_default() += 1;
  }
  counts
    .into_iter()
    .map(|(severity, count)| SeverityCount { severity, count })
    .collect()
}

/// Open risks rated high or critical.
pub fn critical_open_risks(risks: &[RiskItem]) -> Vec<RiskItem> {
  risks
    .iter()
    .filter(|r| r.is_open && r.severity >= RiskSeverity::High)
    .cloned()
    .collect()
}

pub fn open_escalations(escalations: &[Escalation]) -> Vec<Escalation> {
  escalations.iter().filter(|e| e.is_open()).cloned().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskSummary {
  pub open_risks:       u32,
  pub critical:         u32,
  pub high:             u32,
  pub open_escalations: u32,
}

pub fn risk_summary(risks: &[RiskItem], escalations: &[Escalation]) -> RiskSummary {
  let open = || risks.iter().filter(|r| r.is_open);
  RiskSummary {
    open_risks:       open().count() as u32,
    critical:         open().filter(|r| r.severity == RiskSeverity::Critical).count() as u32,
    high:             open().filter(|r| r.severity == RiskSeverity::High).count() as u32,
    open_escalations: escalations.iter().filter(|e| e.is_open()).count() as u32,
  }
}

// ─── Portfolio ───────────────────────────────────────────────────────────────

/// Programs at risk or off track.
pub fn attention_programs(programs: &[Program]) -> Vec<Program> {
  programs
    .iter()
    .filter(|p| p.status.needs_attention())
    .cloned()
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
  pub total_programs:   u32,
  pub status:           StatusCounts,
  /// Mean `percent_complete`, or 0 with no programs.
  pub avg_completion:   f64,
  pub open_risks:       u32,
  pub open_escalations: u32,
}

pub fn portfolio_summary(
  programs: &[Program],
  risks: &[RiskItem],
  escalations: &[Escalation],
) -> PortfolioSummary {
  let total = programs.len();
  let avg_completion = if total == 0 {
    0.0
  } else {
    round1(programs.iter().map(|p| p.percent_complete).sum::<f64>() / total as f64)
  };
  PortfolioSummary {
    total_programs: total as u32,
    status: status_counts(programs),
    avg_completion,
    open_risks: risks.iter().filter(|r| r.is_open).count() as u32,
    open_escalations: escalations.iter().filter(|e| e.is_open()).count() as u32,
  }
}
