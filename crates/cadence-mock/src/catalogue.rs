//! Authored anchor data: the six programs and the fixed plans, registers,
//! and profiles the generator expands into full entity sets.

use cadence_core::{
  model::{Escalation, Program},
  quarter::Quarter,
  status::{
    EscalationLevel, MilestoneStatus, ProgramStatus, RiskLikelihood,
    RiskSeverity,
  },
};
use chrono::NaiveDate;

const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
  match NaiveDate::from_ymd_opt(year, month, day) {
    Some(date) => date,
    None => panic!("invalid catalogue date"),
  }
}

const fn q(number: u8, year: i32) -> Quarter { Quarter::from_parts(number, year) }

// ─── Programs ────────────────────────────────────────────────────────────────

struct ProgramSeed {
  id:              &'static str,
  name:            &'static str,
  department:      &'static str,
  status:          ProgramStatus,
  percent:         f64,
  start_date:      NaiveDate,
  target_end_date: NaiveDate,
  owner:           &'static str,
  description:     &'static str,
  budget_millions: f64,
}

const PROGRAMS: [ProgramSeed; 6] = [
  ProgramSeed {
    id:              "PRG-001",
    name:            "Cloud Platform Migration",
    department:      "Cloud Engineering",
    status:          ProgramStatus::OnTrack,
    percent:         72.0,
    start_date:      ymd(2025, 4, 1),
    target_end_date: ymd(2026, 6, 30),
    owner:           "Priya Sharma",
    description:     "Migrate legacy on-prem services to AWS/GCP hybrid cloud.",
    budget_millions: 4.2,
  },
  ProgramSeed {
    id:              "PRG-002",
    name:            "SRE Observability Rollout",
    department:      "SRE",
    status:          ProgramStatus::OnTrack,
    percent:         85.0,
    start_date:      ymd(2025, 1, 15),
    target_end_date: ymd(2026, 3, 31),
    owner:           "James Chen",
    description:     "Deploy unified observability stack (metrics, logs, traces) across all services.",
    budget_millions: 2.1,
  },
  ProgramSeed {
    id:              "PRG-003",
    name:            "Zero Trust Security",
    department:      "Security",
    status:          ProgramStatus::AtRisk,
    percent:         45.0,
    start_date:      ymd(2025, 3, 1),
    target_end_date: ymd(2026, 5, 31),
    owner:           "Maria Lopez",
    description:     "Implement zero-trust architecture with mTLS, IAM overhaul, and microsegmentation.",
    budget_millions: 3.5,
  },
  ProgramSeed {
    id:              "PRG-004",
    name:            "API Gateway Modernization",
    department:      "Platform",
    status:          ProgramStatus::OnTrack,
    percent:         60.0,
    start_date:      ymd(2025, 6, 1),
    target_end_date: ymd(2026, 8, 31),
    owner:           "Alex Kim",
    description:     "Replace legacy API gateway with Kong/Envoy-based solution.",
    budget_millions: 1.8,
  },
  ProgramSeed {
    id:              "PRG-005",
    name:            "Disaster Recovery Automation",
    department:      "SRE",
    status:          ProgramStatus::OffTrack,
    percent:         30.0,
    start_date:      ymd(2025, 5, 1),
    target_end_date: ymd(2026, 4, 30),
    owner:           "David Okonkwo",
    description:     "Automate DR runbooks and achieve <4hr RTO for Tier-1 services.",
    budget_millions: 2.8,
  },
  ProgramSeed {
    id:              "PRG-006",
    name:            "Data Platform Consolidation",
    department:      "Data Engineering",
    status:          ProgramStatus::Completed,
    percent:         100.0,
    start_date:      ymd(2025, 1, 1),
    target_end_date: ymd(2025, 12, 31),
    owner:           "Sarah Tanaka",
    description:     "Consolidate Redshift, BigQuery, and Snowflake into unified lakehouse.",
    budget_millions: 3.0,
  },
];

/// The fixed program catalogue, in id order.
pub fn programs() -> Vec<Program> {
  PROGRAMS
    .iter()
    .map(|seed| Program {
      id:               seed.id.to_string(),
      name:             seed.name.to_string(),
      department:       seed.department.to_string(),
      status:           seed.status,
      percent_complete: seed.percent,
      start_date:       seed.start_date,
      target_end_date:  seed.target_end_date,
      owner:            seed.owner.to_string(),
      description:      seed.description.to_string(),
      budget_millions:  seed.budget_millions,
    })
    .collect()
}

// ─── Milestone plans ─────────────────────────────────────────────────────────

/// `(name, quarter, is_key, status)`.
pub(crate) type PlannedMilestone = (&'static str, Quarter, bool, MilestoneStatus);

/// Ordered per program; ids are assigned in this order.
pub(crate) const MILESTONE_PLANS: &[(&str, &[PlannedMilestone])] = {
  use MilestoneStatus::{Blocked, Completed, Delayed, InProgress, NotStarted};
  &[
    ("PRG-001", &[
      ("Network architecture design", q(2, 2025), true, Completed),
      ("VPC peering setup", q(2, 2025), false, Completed),
      ("Dev environment migration", q(3, 2025), true, Completed),
      ("Staging environment migration", q(4, 2025), true, Completed),
      ("Database replication cutover", q(4, 2025), false, Completed),
      ("Production Tier-2 migration", q(1, 2026), true, InProgress),
      ("Production Tier-1 migration", q(2, 2026), true, NotStarted),
      ("Decommission legacy infra", q(2, 2026), false, NotStarted),
    ]),
    ("PRG-002", &[
      ("Metrics pipeline MVP", q(1, 2025), true, Completed),
      ("Log aggregation rollout", q(2, 2025), true, Completed),
      ("Distributed tracing integration", q(3, 2025), true, Completed),
      ("Alerting rules migration", q(3, 2025), false, Completed),
      ("SLO dashboards for Tier-1", q(4, 2025), true, Completed),
      ("On-call runbook automation", q(1, 2026), false, Completed),
      ("Full observability coverage", q(1, 2026), true, InProgress),
    ]),
    ("PRG-003", &[
      ("IAM audit & gap analysis", q(1, 2025), true, Completed),
      ("mTLS for internal services", q(2, 2025), true, Completed),
      ("Identity provider migration", q(3, 2025), true, Delayed),
      ("Microsegmentation Phase 1", q(4, 2025), true, InProgress),
      ("Endpoint detection rollout", q(1, 2026), false, NotStarted),
      ("Microsegmentation Phase 2", q(1, 2026), true, NotStarted),
      ("Compliance certification", q(2, 2026), true, NotStarted),
    ]),
    ("PRG-004", &[
      ("API inventory & mapping", q(3, 2025), true, Completed),
      ("Kong gateway POC", q(3, 2025), false, Completed),
      ("Internal API migration", q(4, 2025), true, Completed),
      ("Partner API migration", q(1, 2026), true, InProgress),
      ("Rate limiting & throttling", q(1, 2026), false, InProgress),
      ("Public API migration", q(2, 2026), true, NotStarted),
      ("Legacy gateway decommission", q(3, 2026), false, NotStarted),
    ]),
    ("PRG-005", &[
      ("DR runbook audit", q(2, 2025), true, Completed),
      ("Automated failover POC", q(3, 2025), true, Delayed),
      ("Tier-1 DR automation", q(4, 2025), true, Blocked),
      ("DR testing framework", q(1, 2026), false, NotStarted),
      ("Cross-region replication", q(1, 2026), true, NotStarted),
      ("Full DR drill execution", q(2, 2026), true, NotStarted),
    ]),
    ("PRG-006", &[
      ("Data source inventory", q(1, 2025), true, Completed),
      ("Lakehouse architecture", q(1, 2025), true, Completed),
      ("ETL pipeline migration", q(2, 2025), true, Completed),
      ("Data quality framework", q(3, 2025), true, Completed),
      ("Self-service analytics", q(3, 2025), false, Completed),
      ("Legacy warehouse decommission", q(4, 2025), true, Completed),
      ("Cost optimization review", q(4, 2025), false, Completed),
    ]),
  ]
};

pub(crate) const MILESTONE_OWNERS: [&str; 8] =
  ["Priya", "James", "Maria", "Alex", "David", "Sarah", "Li", "Kumar"];

// ─── Risk register ───────────────────────────────────────────────────────────

/// `(program_id, title, severity, likelihood, is_open)`.
pub(crate) type RegisteredRisk =
  (&'static str, &'static str, RiskSeverity, RiskLikelihood, bool);

pub(crate) const RISK_REGISTER: [RegisteredRisk; 14] = {
  use RiskLikelihood as L;
  use RiskSeverity as S;
  [
    ("PRG-001", "Cloud vendor lock-in", S::High, L::Medium, true),
    ("PRG-001", "Data transfer costs exceed budget", S::Medium, L::High, true),
    ("PRG-001", "Skill gap in cloud-native tooling", S::Medium, L::Low, false),
    ("PRG-002", "Alert fatigue from noisy rules", S::Medium, L::High, true),
    ("PRG-002", "Tracing overhead on latency-sensitive services", S::Low, L::Medium, false),
    ("PRG-003", "mTLS certificate rotation failures", S::Critical, L::Medium, true),
    ("PRG-003", "Legacy apps incompatible with zero-trust", S::High, L::High, true),
    ("PRG-003", "Vendor delay on IdP integration", S::High, L::Medium, true),
    ("PRG-004", "Breaking changes to partner APIs", S::High, L::Medium, true),
    ("PRG-004", "Rate limiting misconfiguration", S::Medium, L::Low, false),
    ("PRG-005", "Cross-region latency exceeds RTO", S::Critical, L::High, true),
    ("PRG-005", "DR testing impacts production", S::High, L::Medium, true),
    ("PRG-005", "Incomplete runbook documentation", S::Medium, L::High, true),
    ("PRG-006", "Data loss during migration", S::Critical, L::Low, false),
  ]
};

pub(crate) const RISK_OWNERS: [&str; 6] =
  ["Priya", "James", "Maria", "Alex", "David", "Sarah"];

/// Risks are raised a random number of days after this date.
pub(crate) const RISK_EPOCH: NaiveDate = ymd(2025, 1, 1);

// ─── Escalations ─────────────────────────────────────────────────────────────

struct EscalationSeed {
  id:            &'static str,
  program_id:    &'static str,
  risk_id:       &'static str,
  title:         &'static str,
  level:         EscalationLevel,
  raised_date:   NaiveDate,
  resolved_date: Option<NaiveDate>,
  resolution:    &'static str,
}

const ESCALATIONS: [EscalationSeed; 5] = [
  EscalationSeed {
    id:            "ESC-001",
    program_id:    "PRG-003",
    risk_id:       "RSK-007",
    title:         "Legacy app compatibility blocking zero-trust rollout",
    level:         EscalationLevel::VP,
    raised_date:   ymd(2025, 9, 15),
    resolved_date: None,
    resolution:    "",
  },
  EscalationSeed {
    id:            "ESC-002",
    program_id:    "PRG-005",
    risk_id:       "RSK-011",
    title:         "DR automation blocked by cross-region infra gaps",
    level:         EscalationLevel::Director,
    raised_date:   ymd(2025, 10, 1),
    resolved_date: None,
    resolution:    "",
  },
  EscalationSeed {
    id:            "ESC-003",
    program_id:    "PRG-003",
    risk_id:       "RSK-008",
    title:         "IdP vendor missing contractual delivery date",
    level:         EscalationLevel::Director,
    raised_date:   ymd(2025, 11, 10),
    resolved_date: Some(ymd(2025, 12, 20)),
    resolution:    "Vendor allocated dedicated engineering team; revised timeline accepted.",
  },
  EscalationSeed {
    id:            "ESC-004",
    program_id:    "PRG-001",
    risk_id:       "RSK-002",
    title:         "Cloud data transfer costs 40% over budget",
    level:         EscalationLevel::Director,
    raised_date:   ymd(2026, 1, 5),
    resolved_date: Some(ymd(2026, 1, 25)),
    resolution:    "Negotiated committed use discounts; revised budget approved.",
  },
  EscalationSeed {
    id:            "ESC-005",
    program_id:    "PRG-005",
    risk_id:       "RSK-011",
    title:         "RTO target unachievable with current architecture",
    level:         EscalationLevel::VP,
    raised_date:   ymd(2026, 2, 1),
    resolved_date: None,
    resolution:    "",
  },
];

/// The fixed escalation log, in id order.
pub fn escalations() -> Vec<Escalation> {
  ESCALATIONS
    .iter()
    .map(|seed| Escalation {
      id:            seed.id.to_string(),
      program_id:    seed.program_id.to_string(),
      risk_id:       Some(seed.risk_id.to_string()),
      title:         seed.title.to_string(),
      level:         seed.level,
      raised_date:   seed.raised_date,
      resolved_date: seed.resolved_date,
      resolution:    seed.resolution.to_string(),
    })
    .collect()
}

// ─── Metric profiles ─────────────────────────────────────────────────────────

/// Baselines the weekly metric series is drawn around.
pub(crate) struct MetricProfile {
  pub program_id:    &'static str,
  pub velocity_base: f64,
  pub defect_base:   f64,
  pub deploy_freq:   f64,
  pub lead_time:     f64,
}

pub(crate) const METRIC_PROFILES: [MetricProfile; 6] = [
  MetricProfile { program_id: "PRG-001", velocity_base: 45.0, defect_base: 3.0, deploy_freq: 4.0, lead_time: 2.5 },
  MetricProfile { program_id: "PRG-002", velocity_base: 38.0, defect_base: 2.0, deploy_freq: 8.0, lead_time: 1.0 },
  MetricProfile { program_id: "PRG-003", velocity_base: 25.0, defect_base: 5.0, deploy_freq: 2.0, lead_time: 5.0 },
  MetricProfile { program_id: "PRG-004", velocity_base: 32.0, defect_base: 3.0, deploy_freq: 5.0, lead_time: 2.0 },
  MetricProfile { program_id: "PRG-005", velocity_base: 18.0, defect_base: 4.0, deploy_freq: 1.5, lead_time: 7.0 },
  MetricProfile { program_id: "PRG-006", velocity_base: 40.0, defect_base: 1.0, deploy_freq: 6.0, lead_time: 1.5 },
];

/// Monday of the first tracked week (start of Q3 2025).
pub(crate) const METRICS_START: NaiveDate = ymd(2025, 7, 7);

/// Length of every program's weekly series.
pub(crate) const METRIC_WEEKS: u32 = 34;
