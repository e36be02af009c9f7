//! `POST /book/` - reserve a slot and create the lead

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{BookingRequest, Lead};

use crate::state::AppState;
use crate::validation::BookingInput;

pub fn router() -> Router<AppState> {
    Router::new().route("/book/", post(create))
}

/// 201 with the created lead. Input is validated before any storage call.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Lead>)> {
    let Json(req) = payload
        .map_err(|rejection| AppError::with_message(ErrorCode::InvalidRequest, rejection.body_text()))?;
    let input = BookingInput::from_request(&req)?;
    let start_at = state.service.resolve_start(input.date, input.time).await?;

    let lead = state.service.book(&input.contact, start_at).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}
