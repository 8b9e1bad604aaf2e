//! Handlers for the raw collections.
//!
//! | Path | Query |
//! |------|-------|
//! | `/api/programs` | `program_id`, `status` |
//! | `/api/programs/{id}` | |
//! | `/api/milestones` | `program_id`, `quarter`, `status`, `key_only` |
//! | `/api/risks` | `program_id`, `severity`, `open_only` |
//! | `/api/escalations` | `program_id`, `open_only` |
//! | `/api/metrics` | `program_id` |
//! | `/api/snapshots` | |

use axum::{
  Json,
  extract::{Path, State},
};
use cadence_core::{
  model::{DeliveryMetric, Escalation, Milestone, Program, RiskItem, WeeklySnapshot},
  query::Filter,
  source::DeliverySource,
};

use super::dataset;
use crate::{
  AppState,
  error::ApiError,
  params::{
    ApiQuery, EscalationParams, MetricParams, MilestoneParams, ProgramParams, RiskParams,
  },
};

/// `GET /api/programs`
pub async fn programs<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<ProgramParams>,
) -> Result<Json<Vec<Program>>, ApiError> {
  let filter = params.filter()?;
  let data = dataset(&state).await?;
  Ok(Json(filter.apply(&data.programs)))
}

/// `GET /api/programs/{id}`
pub async fn program<S: DeliverySource>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Program>, ApiError> {
  let data = dataset(&state).await?;
  data
    .program(&id)
    .cloned()
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("program {id}")))
}

/// `GET /api/milestones`
pub async fn milestones<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<MilestoneParams>,
) -> Result<Json<Vec<Milestone>>, ApiError> {
  let filter = params.filter()?;
  let data = dataset(&state).await?;
  Ok(Json(filter.apply(&data.milestones)))
}

/// `GET /api/risks`
pub async fn risks<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<RiskParams>,
) -> Result<Json<Vec<RiskItem>>, ApiError> {
  let filter = params.filter()?;
  let data = dataset(&state).await?;
  Ok(Json(filter.apply(&data.risks)))
}

/// `GET /api/escalations`
pub async fn escalations<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<EscalationParams>,
) -> Result<Json<Vec<Escalation>>, ApiError> {
  let filter = params.filter()?;
  let data = dataset(&state).await?;
  Ok(Json(filter.apply(&data.escalations)))
}

/// `GET /api/metrics`
pub async fn metrics<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<MetricParams>,
) -> Result<Json<Vec<DeliveryMetric>>, ApiError> {
  let filter = params.filter()?;
  let data = dataset(&state).await?;
  Ok(Json(filter.apply(&data.metrics)))
}

/// `GET /api/snapshots`
pub async fn snapshots<S: DeliverySource>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<WeeklySnapshot>>, ApiError> {
  Ok(Json(dataset(&state).await?.weekly_snapshots()))
}
