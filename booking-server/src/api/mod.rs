//! HTTP API
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /slots/?date=YYYY-MM-DD` | slots of a day with remaining capacity |
//! | `POST /book/` | reserve a slot and create the lead |
//! | `GET /rules/` | weekly opening hours |
//! | `GET /health` | liveness + storage ping |

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue, StatusCode};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use shared::error::AppError;

use crate::config::Config;
use crate::middleware;
use crate::state::AppState;

pub mod book;
pub mod health;
pub mod rules;
pub mod slots;

/// Booking payloads are a handful of short strings
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, no middleware, no state
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(slots::router())
        .merge(book::router())
        .merge(rules::router())
        .merge(health::router())
        .fallback(not_found)
}

async fn not_found(uri: http::Uri) -> AppError {
    AppError::not_found(format!("Route {}", uri.path()))
}

/// Routes with the middleware stack and state applied
///
/// Used by the HTTP server and by oneshot tests.
pub fn build_app(state: AppState, config: &Config) -> Router {
    build_router()
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_millis(config.request_timeout_ms),
        ))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        // echo the id on the response; runs inside the layer that assigns it
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .with_state(state)
}
