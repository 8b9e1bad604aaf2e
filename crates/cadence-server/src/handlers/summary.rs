//! Portfolio summaries: `GET /api/summary`, the leadership view in one
//! response, and `GET /api/programs/summary` over a program selection.

use axum::{Json, extract::State};
use cadence_core::{
  aggregate::{
    LatestWeek, PortfolioSummary, RiskSummary, attention_programs, critical_open_risks,
    latest_week, open_escalations, portfolio_summary, risk_summary, upcoming_key_milestones,
  },
  derive::{current_quarter, percent_change},
  model::{Escalation, Milestone, Program, RiskItem},
  quarter::Quarter,
  query::{EscalationFilter, Filter, RiskFilter},
  source::DeliverySource,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::dataset;
use crate::{
  AppState,
  error::ApiError,
  params::{ApiQuery, ProgramParams},
};

/// Key milestones listed in the summary.
const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
  pub report_date:      NaiveDate,
  pub current_quarter:  Quarter,
  pub data_source:      &'static str,
  pub portfolio:        PortfolioSummary,
  pub risks:            RiskSummary,
  pub attention:        Vec<Program>,
  pub critical_risks:   Vec<RiskItem>,
  pub upcoming:         Vec<Milestone>,
  pub open_escalations: Vec<Escalation>,
  pub latest_week:      Option<LatestWeek>,
  /// Portfolio velocity change from the previous week, in percent. `null`
  /// with fewer than two weeks or a zero baseline.
  pub velocity_change:  Option<f64>,
}

pub async fn handler<S: DeliverySource>(
  State(state): State<AppState<S>>,
) -> Result<Json<SummaryResponse>, ApiError> {
  let data = dataset(&state).await?;
  let today = Local::now().date_naive();

  let snapshots = data.weekly_snapshots();
  let velocity_change = match snapshots.as_slice() {
    [.., previous, current] => percent_change(current.total_velocity, previous.total_velocity),
    _ => None,
  };

  Ok(Json(SummaryResponse {
    report_date: today,
    current_quarter: current_quarter(today),
    data_source: state.config.data_source.label(),
    portfolio: portfolio_summary(&data.programs, &data.risks, &data.escalations),
    risks: risk_summary(&data.risks, &data.escalations),
    attention: attention_programs(&data.programs),
    critical_risks: critical_open_risks(&data.risks),
    upcoming: upcoming_key_milestones(&data.milestones, UPCOMING_LIMIT),
    open_escalations: open_escalations(&data.escalations),
    latest_week: latest_week(&data.metrics),
    velocity_change,
  }))
}

// ─── Program selection ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProgramSummaryResponse {
  /// Counts and average completion over the selected programs; open risks
  /// and escalations are those raised against them.
  pub portfolio: PortfolioSummary,
  pub attention: Vec<Program>,
}

/// `GET /api/programs/summary[?program_id=..&status=..]`
pub async fn programs<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<ProgramParams>,
) -> Result<Json<ProgramSummaryResponse>, ApiError> {
  let filter = params.filter()?;
  let data = dataset(&state).await?;
  let programs = filter.apply(&data.programs);

  let selected: Vec<String> = programs.iter().map(|p| p.id.clone()).collect();
  let risks = RiskFilter { program_ids: Some(selected.clone()), ..Default::default() };
  let escalations = EscalationFilter { program_ids: Some(selected), ..Default::default() };

  Ok(Json(ProgramSummaryResponse {
    portfolio: portfolio_summary(
      &programs,
      &risks.apply(&data.risks),
      &escalations.apply(&data.escalations),
    ),
    attention: attention_programs(&programs),
  }))
}
