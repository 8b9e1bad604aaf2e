//! The `DeliverySource` trait and the validated [`Dataset`] it loads into.
//!
//! The trait is implemented by the deterministic generator
//! (`cadence-mock`) and the live adapter (`cadence-jira`). Higher layers
//! depend on this abstraction and pick an implementation from configuration.

use std::{collections::HashSet, future::Future};

use crate::{
  Error, Result,
  aggregate::weekly_snapshots,
  model::{
    DeliveryMetric, Escalation, Milestone, Program, RiskItem, Validate,
    WeeklySnapshot,
  },
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Producer of the raw entity collections.
///
/// Each method returns one whole collection. Implementations must return the
/// same records for the same configuration; the generator guarantees this
/// byte-for-byte.
pub trait DeliverySource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch_programs(
    &self,
  ) -> impl Future<Output = Result<Vec<Program>, Self::Error>> + Send + '_;

  fn fetch_milestones(
    &self,
  ) -> impl Future<Output = Result<Vec<Milestone>, Self::Error>> + Send + '_;

  fn fetch_risks(
    &self,
  ) -> impl Future<Output = Result<Vec<RiskItem>, Self::Error>> + Send + '_;

  fn fetch_escalations(
    &self,
  ) -> impl Future<Output = Result<Vec<Escalation>, Self::Error>> + Send + '_;

  fn fetch_metrics(
    &self,
  ) -> impl Future<Output = Result<Vec<DeliveryMetric>, Self::Error>> + Send + '_;

  /// Weekly portfolio snapshots. Defaults to aggregating
  /// [`DeliverySource::fetch_metrics`] against
  /// [`DeliverySource::fetch_programs`].
  fn fetch_weekly_snapshots(
    &self,
  ) -> impl Future<Output = Result<Vec<WeeklySnapshot>, Self::Error>> + Send + '_ {
    async move {
      let programs = self.fetch_programs().await?;
      let metrics = self.fetch_metrics().await?;
      Ok(weekly_snapshots(&metrics, &programs))
    }
  }
}

// ─── Dataset ─────────────────────────────────────────────────────────────────

/// Every raw collection, validated record by record and checked for dangling
/// references. Snapshots are not stored; derive them with
/// [`Dataset::weekly_snapshots`].
#[derive(Debug, Clone, Default)]
pub struct Dataset {
  pub programs:    Vec<Program>,
  pub milestones:  Vec<Milestone>,
  pub risks:       Vec<RiskItem>,
  pub escalations: Vec<Escalation>,
  pub metrics:     Vec<DeliveryMetric>,
}

impl Dataset {
  /// Assemble a dataset, rejecting it if any record is invalid, an id is
  /// repeated, a metric week is off cycle, or a record refers to an unknown
  /// program or risk.
  pub fn new(
    programs: Vec<Program>,
    milestones: Vec<Milestone>,
    risks: Vec<RiskItem>,
    escalations: Vec<Escalation>,
    metrics: Vec<DeliveryMetric>,
  ) -> Result<Self> {
    let dataset = Self { programs, milestones, risks, escalations, metrics };
    dataset.validate()?;
    Ok(dataset)
  }

  /// Fetch every collection from `source` and assemble a dataset.
  pub async fn load<S: DeliverySource>(source: &S) -> Result<Self> {
    let boxed = |e: S::Error| Error::Source(Box::new(e));
    let programs = source.fetch_programs().await.map_err(boxed)?;
    let milestones = source.fetch_milestones().await.map_err(boxed)?;
    let risks = source.fetch_risks().await.map_err(boxed)?;
    let escalations = source.fetch_escalations().await.map_err(boxed)?;
    let metrics = source.fetch_metrics().await.map_err(boxed)?;
    tracing::debug!(
      programs = programs.len(),
      milestones = milestones.len(),
      risks = risks.len(),
      escalations = escalations.len(),
      metrics = metrics.len(),
      "fetched collections"
    );
    Self::new(programs, milestones, risks, escalations, metrics)
  }

  fn validate(&self) -> Result<()> {
    validate_all(&self.programs)?;
    validate_all(&self.milestones)?;
    validate_all(&self.risks)?;
    validate_all(&self.escalations)?;
    validate_all(&self.metrics)?;
    self.check_unique()?;
    self.check_weeks()?;
    self.check_references()
  }

  /// Entity ids are unique within their collection, and each program has at
  /// most one metric per week.
  pub fn check_unique(&self) -> Result<()> {
    unique_ids("program", self.programs.iter().map(|p| p.id.as_str()))?;
    unique_ids("milestone", self.milestones.iter().map(|m| m.id.as_str()))?;
    unique_ids("risk", self.risks.iter().map(|r| r.id.as_str()))?;
    unique_ids("escalation", self.escalations.iter().map(|e| e.id.as_str()))?;

    let mut seen = HashSet::new();
    for metric in &self.metrics {
      if !seen.insert((metric.program_id.as_str(), metric.week_start)) {
        return Err(Error::DuplicateMetric {
          program_id: metric.program_id.clone(),
          week_start: metric.week_start,
        });
      }
    }
    Ok(())
  }

  /// Every metric week starts a whole number of weeks after the earliest one.
  pub fn check_weeks(&self) -> Result<()> {
    let Some(first) = self.metrics.iter().map(|m| m.week_start).min() else {
      return Ok(());
    };
    match self
      .metrics
      .iter()
      .find(|m| (m.week_start - first).num_days() % 7 != 0)
    {
      Some(m) => Err(Error::OffCycleWeek { week_start: m.week_start, first }),
      None => Ok(()),
    }
  }

  /// Every program id referenced by a milestone, risk, escalation, or metric
  /// must belong to a program; every escalation risk id to a risk.
  pub fn check_references(&self) -> Result<()> {
    let programs: HashSet<&str> = self.programs.iter().map(|p| p.id.as_str()).collect();
    let dangling = |kind: &'static str, id: &str, program_id: &str| {
      (!programs.contains(program_id)).then(|| Error::DanglingProgram {
        kind,
        id: id.to_string(),
        program_id: program_id.to_string(),
      })
    };

    let found = self
      .milestones
      .iter()
      .find_map(|m| dangling("milestone", &m.id, &m.program_id))
      .or_else(|| {
        self
          .risks
          .iter()
          .find_map(|r| dangling("risk", &r.id, &r.program_id))
      })
      .or_else(|| {
        self
          .escalations
          .iter()
          .find_map(|e| dangling("escalation", &e.id, &e.program_id))
      })
      .or_else(|| {
        self.metrics.iter().find_map(|m| {
          dangling("metric", &format!("{}@{}", m.program_id, m.week_start), &m.program_id)
        })
      });
    if let Some(err) = found {
      return Err(err);
    }

    let risks: HashSet<&str> = self.risks.iter().map(|r| r.id.as_str()).collect();
    for escalation in &self.escalations {
      if let Some(risk_id) = &escalation.risk_id
        && !risks.contains(risk_id.as_str())
      {
        return Err(Error::DanglingRisk {
          id:      escalation.id.clone(),
          risk_id: risk_id.clone(),
        });
      }
    }
    Ok(())
  }

  pub fn weekly_snapshots(&self) -> Vec<WeeklySnapshot> {
    weekly_snapshots(&self.metrics, &self.programs)
  }

  pub fn program(&self, id: &str) -> Option<&Program> {
    self.programs.iter().find(|p| p.id == id)
  }
}

fn unique_ids<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
  let mut seen = HashSet::new();
  for id in ids {
    if !seen.insert(id) {
      return Err(Error::DuplicateId { kind, id: id.to_string() });
    }
  }
  Ok(())
}

fn validate_all<T: Validate>(records: &[T]) -> Result<()> {
  for record in records {
    record.validate()?;
  }
  Ok(())
}
