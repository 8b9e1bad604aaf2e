//! Weekly metric trends. All but velocity accept the `/api/metrics`
//! `program_id` list.

use axum::{Json, extract::State};
use cadence_core::{
  aggregate::{
    DefectPoint, DoraPoint, LatestWeek, VelocityPoint, defect_trend, dora_trend,
    latest_week, velocity_trend,
  },
  model::DeliveryMetric,
  query::Filter,
  source::DeliverySource,
};
use serde::Deserialize;

use super::dataset;
use crate::{
  AppState,
  error::ApiError,
  params::{ApiQuery, MetricParams},
};

async fn filtered<S: DeliverySource>(
  state: &AppState<S>,
  params: &MetricParams,
) -> Result<Vec<DeliveryMetric>, ApiError> {
  let filter = params.filter()?;
  Ok(filter.apply(&dataset(state).await?.metrics))
}

#[derive(Debug, Deserialize)]
pub struct VelocityParams {
  /// A single program; absent sums the whole portfolio.
  pub program_id: Option<String>,
}

/// `GET /api/metrics/velocity[?program_id=PRG-001]`
pub async fn velocity<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<VelocityParams>,
) -> Result<Json<Vec<VelocityPoint>>, ApiError> {
  let data = dataset(&state).await?;
  let program_id = params.program_id.as_deref().map(str::trim).filter(|id| !id.is_empty());
  if let Some(id) = program_id
    && data.program(id).is_none()
  {
    return Err(ApiError::NotFound(format!("program {id}")));
  }
  Ok(Json(velocity_trend(&data.metrics, program_id)))
}

/// `GET /api/metrics/dora`
pub async fn dora<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<MetricParams>,
) -> Result<Json<Vec<DoraPoint>>, ApiError> {
  Ok(Json(dora_trend(&filtered(&state, &params).await?)))
}

/// `GET /api/metrics/defects`
pub async fn defects<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<MetricParams>,
) -> Result<Json<Vec<DefectPoint>>, ApiError> {
  Ok(Json(defect_trend(&filtered(&state, &params).await?)))
}

/// `GET /api/metrics/latest`: `null` when no metrics match.
pub async fn latest<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<MetricParams>,
) -> Result<Json<Option<LatestWeek>>, ApiError> {
  Ok(Json(latest_week(&filtered(&state, &params).await?)))
}
