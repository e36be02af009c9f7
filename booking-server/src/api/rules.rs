//! `GET /rules/` - weekly opening hours, one entry per configured weekday

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use shared::error::AppResult;
use shared::models::OpeningRuleView;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/rules/", get(list))
}

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<OpeningRuleView>>> {
    let rules = state.service.list_rules().await?;
    Ok(Json(rules.iter().map(OpeningRuleView::from).collect()))
}
