//! `GET /slots/` - slots of one day with their remaining capacity

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::SlotView;

use crate::state::AppState;
use crate::validation::parse_date;

pub fn router() -> Router<AppState> {
    Router::new().route("/slots/", get(list))
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<SlotsQuery>, QueryRejection>,
) -> AppResult<Json<Vec<SlotView>>> {
    let Query(query) = query
        .map_err(|rejection| AppError::with_message(ErrorCode::InvalidRequest, rejection.body_text()))?;
    let date = parse_date(query.date.as_deref())?;
    let slots = state.service.list_slots_with_quota(date).await?;
    Ok(Json(slots))
}
