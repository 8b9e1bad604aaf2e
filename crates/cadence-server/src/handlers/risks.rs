//! Risk aggregates. Each accepts the `/api/risks` filters and aggregates only
//! the matching risks.

use axum::{Json, extract::State};
use cadence_core::{
  aggregate::{
    RiskHeatmap, RiskSummary, SeverityCount, open_risks_by_severity, risk_heatmap,
    risk_summary,
  },
  model::RiskItem,
  query::Filter,
  source::DeliverySource,
};

use super::dataset;
use crate::{
  AppState,
  error::ApiError,
  params::{ApiQuery, RiskParams},
};

async fn filtered<S: DeliverySource>(
  state: &AppState<S>,
  params: &RiskParams,
) -> Result<Vec<RiskItem>, ApiError> {
  let filter = params.filter()?;
  Ok(filter.apply(&dataset(state).await?.risks))
}

/// `GET /api/risks/heatmap`: open risks per severity × likelihood.
pub async fn heatmap<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<RiskParams>,
) -> Result<Json<RiskHeatmap>, ApiError> {
  Ok(Json(risk_heatmap(&filtered(&state, &params).await?)))
}

/// `GET /api/risks/by-severity`
pub async fn by_severity<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<RiskParams>,
) -> Result<Json<Vec<SeverityCount>>, ApiError> {
  Ok(Json(open_risks_by_severity(&filtered(&state, &params).await?)))
}

/// `GET /api/risks/summary`
///
/// Escalations follow the `program_id` filter only.
pub async fn summary<S: DeliverySource>(
  State(state): State<AppState<S>>,
  ApiQuery(params): ApiQuery<RiskParams>,
) -> Result<Json<RiskSummary>, ApiError> {
  let risk_filter = params.filter()?;
  let escalation_filter = params.escalation_filter()?;
  let data = dataset(&state).await?;
  Ok(Json(risk_summary(
    &risk_filter.apply(&data.risks),
    &escalation_filter.apply(&data.escalations),
  )))
}
