//! Milestone aggregates. Each accepts the `/api/milestones` filters and
//! aggregates only the matching milestones.

use axum::{Json, extract::State};
use cadence_core::{
  aggregate::{
    MilestoneSummary, QuarterPredictability, QuarterStatusCount, TimelineEntry,
    delivery_predictability, milestone_status_by_quarter, milestone_summary,
    milestone_timeline, upcoming_key_milestones,
  },
  derive::{days_until_today, format_delta},
  model::Milestone,
  query::Filter,
  source::DeliverySource,
};
use serde::{Deserialize, Serialize};

use super::dataset;
use crate::{
  AppState,
  error::ApiError,
  params::{ApiQuery, MilestoneParams},
};

async fn filtered<S: DeliverySource>(
  state: &AppState<S>,
  params: &MilestoneParams,
) -> Result<Vec<Milestone>, ApiError> {
  let filter = params.filter()?;
  Ok(filter.apply(&dataset(state).await?.milestones))
}

#[derive(Debug, Serialize)]
pub struct PredictabilityResponse {
  pub quarters: Vec<QuarterPredictability>,
  pub summary:  MilestoneSummary,
}

/// `GET /api/milestones/predictability`
pub async fn predictability<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<MilestoneParams>,
) -> Result<Json<PredictabilityResponse>, ApiError> {
  let milestones = filtered(&state, &params).await?;
  Ok(Json(PredictabilityResponse {
    quarters: delivery_predictability(&milestones),
    summary:  milestone_summary(&milestones),
  }))
}

/// `GET /api/milestones/by-quarter`
pub async fn by_quarter<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<MilestoneParams>,
) -> Result<Json<Vec<QuarterStatusCount>>, ApiError> {
  let milestones = filtered(&state, &params).await?;
  Ok(Json(milestone_status_by_quarter(&milestones)))
}

/// `GET /api/milestones/timeline`
pub async fn timeline<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<MilestoneParams>,
) -> Result<Json<Vec<TimelineEntry>>, ApiError> {
  let filter = params.filter()?;
  let data = dataset(&state).await?;
  Ok(Json(milestone_timeline(&filter.apply(&data.milestones), &data.programs)))
}

// ─── Upcoming ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpcomingParams {
  #[serde(default = "default_limit")]
  pub limit: usize,
}

fn default_limit() -> usize { 10 }

#[derive(Debug, Serialize)]
pub struct UpcomingMilestone {
  #[serde(flatten)]
  pub milestone:  Milestone,
  /// Negative once the due date has passed.
  pub days_until: i64,
  /// `"Today"`, `"In N days"`, or `"N days ago"`.
  pub due_in:     String,
}

/// `GET /api/milestones/upcoming[?limit=10]`
pub async fn upcoming<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<UpcomingParams>,
) -> Result<Json<Vec<UpcomingMilestone>>, ApiError> {
  let data = dataset(&state).await?;
  let rows = upcoming_key_milestones(&data.milestones, params.limit)
    .into_iter()
    .map(|milestone| {
      let days_until = days_until_today(milestone.due_date);
      UpcomingMilestone { milestone, days_until, due_in: format_delta(days_until) }
    })
    .collect();
  Ok(Json(rows))
}
