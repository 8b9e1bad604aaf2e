//! Seeded expansion of the catalogue into milestones, risks, and weekly
//! metrics.
//!
//! Every entry point owns its own [`StdRng`] seeded from the argument, so
//! calls never share state and the same seed always yields the same records
//! in the same order. Draws happen in a fixed order per record; changing
//! that order changes every record after it.

use cadence_core::{
  derive::round1,
  model::{DeliveryMetric, Milestone, RiskItem},
  status::MilestoneStatus,
};
use chrono::{Days, TimeDelta};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::catalogue::{
  METRIC_PROFILES, METRIC_WEEKS, METRICS_START, MILESTONE_OWNERS,
  MILESTONE_PLANS, RISK_EPOCH, RISK_OWNERS, RISK_REGISTER,
};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

fn pick<'a>(rng: &mut StdRng, pool: &[&'a str]) -> &'a str {
  pool[rng.gen_range(0..pool.len())]
}

// ─── Milestones ──────────────────────────────────────────────────────────────

/// Expand the milestone plans. Ids run `MS-001`, `MS-002`, ... across all
/// programs in plan order.
pub fn generate_milestones(seed: u64) -> Vec<Milestone> {
  let mut rng = StdRng::seed_from_u64(seed);
  let mut milestones = Vec::new();

  for (program_id, plan) in MILESTONE_PLANS {
    for &(name, quarter, is_key, status) in plan.iter() {
      let due_date = quarter.start() + Days::new(rng.gen_range(15..=75));
      // Negative offsets land after the due date, i.e. late.
      let completed_date = (status == MilestoneStatus::Completed)
        .then(|| due_date - TimeDelta::days(rng.gen_range(-5..=10)));
      let owner = pick(&mut rng, &MILESTONE_OWNERS);

      milestones.push(Milestone {
        id: format!("MS-{:03}", milestones.len() + 1),
        program_id: program_id.to_string(),
        name: name.to_string(),
        status,
        due_date,
        completed_date,
        quarter,
        owner: owner.to_string(),
        is_key_milestone: is_key,
      });
    }
  }

  tracing::trace!(seed, count = milestones.len(), "generated milestones");
  milestones
}

// ─── Risks ───────────────────────────────────────────────────────────────────

/// Expand the risk register into `RSK-001`..`RSK-014`.
pub fn generate_risks(seed: u64) -> Vec<RiskItem> {
  let mut rng = StdRng::seed_from_u64(seed);

  let risks: Vec<RiskItem> = RISK_REGISTER
    .iter()
    .enumerate()
    .map(|(i, &(program_id, title, severity, likelihood, is_open))| {
      let owner = pick(&mut rng, &RISK_OWNERS);
      let raised_date = RISK_EPOCH + Days::new(rng.gen_range(0..=300));
      RiskItem {
        id: format!("RSK-{:03}", i + 1),
        program_id: program_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        severity,
        likelihood,
        mitigation: format!(
          "Mitigation plan documented in confluence for {}.",
          title.to_lowercase()
        ),
        owner: owner.to_string(),
        raised_date,
        is_open,
      }
    })
    .collect();

  tracing::trace!(seed, count = risks.len(), "generated risks");
  risks
}

// ─── Metrics ─────────────────────────────────────────────────────────────────

/// One metric row per program per week, programs in catalogue order and
/// weeks ascending within each program.
pub fn generate_metrics(seed: u64) -> Vec<DeliveryMetric> {
  let mut rng = StdRng::seed_from_u64(seed);
  let mut metrics = Vec::with_capacity(METRIC_PROFILES.len() * METRIC_WEEKS as usize);

  for profile in &METRIC_PROFILES {
    for w in 0..METRIC_WEEKS {
      let week_start = METRICS_START + Days::new(u64::from(w) * 7);
      let noise: f64 = rng.gen_range(0.8..1.2);
      let trend = 1.0 + f64::from(w) * 0.005;

      let velocity = round1(profile.velocity_base * noise * trend);
      let planned_points = round1(velocity * rng.gen_range(0.9..1.15));
      let delivered_points = round1(velocity * rng.gen_range(0.85..1.05));
      let jitter: i32 = rng.gen_range(-2..=2);
      let defect_count = (profile.defect_base * noise + f64::from(jitter))
        .trunc()
        .max(0.0) as u32;
      let incident_count = rng.gen_range(0..=(defect_count / 2).max(1));
      let mttr_hours = round1(rng.gen_range(0.5..4.0));
      let deployment_frequency = round1(profile.deploy_freq * noise);
      let lead_time_days = round1(profile.lead_time * rng.gen_range(0.7..1.3));
      let change_failure_rate = round1(rng.gen_range(2.0..18.0));

      metrics.push(DeliveryMetric {
        program_id: profile.program_id.to_string(),
        week_start,
        velocity,
        planned_points,
        delivered_points,
        defect_count,
        incident_count,
        mttr_hours,
        deployment_frequency,
        lead_time_days,
        change_failure_rate,
      });
    }
  }

  tracing::trace!(seed, count = metrics.len(), "generated metrics");
  metrics
}
