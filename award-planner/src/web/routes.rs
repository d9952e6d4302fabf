//! HTTP route handlers.
//!
//! The API is stateless: each call carries the segments, combinations or
//! selection it operates on, and gets back the recomputed result.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::availability::{AvailabilityCalendar, AvailabilityError};
use crate::planner::{
    FlightSource, Generation, PlanError, SegmentRequest, compute_combinations, compute_segments,
    displayed_legs, toggle_selection,
};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/calendar", get(calendar))
        .route("/api/segments", post(segments))
        .route("/api/combinations", post(combinations))
        .route("/api/selection/toggle", post(toggle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Per-date availability for every hop of a route.
async fn calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let route = parse_route(&query.route)?;
    let from = query.from_date()?;

    let entries = state.source.fetch_availability(&route, from).await?;
    let calendar = AvailabilityCalendar::from_entries(&route, &entries);

    Ok(Json(CalendarResponse::from_calendar(&route, &calendar)))
}

/// Fetch and normalize every segment of a route over a date range.
async fn segments(
    State(state): State<AppState>,
    Json(req): Json<SegmentsRequest>,
) -> Result<Json<SegmentsResponse>, AppError> {
    let range = req.range()?;
    let mut request = SegmentRequest::new(req.route()?, range);
    request.stopover = req.stopover()?;

    let segments = compute_segments(
        state.source.as_ref(),
        &request,
        &state.config,
        &Generation::detached(),
    )
    .await?;

    Ok(Json(SegmentsResponse::from_segments(&segments, range.start())))
}

/// Enumerate feasible combinations over the given segments.
async fn combinations(
    State(state): State<AppState>,
    Json(req): Json<CombinationsRequest>,
) -> Result<Json<CombinationsResponse>, AppError> {
    let segments = req.segments()?;
    let stopover = req.stopover()?;

    let combinations = compute_combinations(&segments, stopover.as_ref(), &state.config);
    let shown = displayed_legs(&segments, &combinations);

    // Label relative to the first segment's window when there is one.
    let base = segments.first().map(|s| s.window.start.date());

    Ok(Json(CombinationsResponse::new(&combinations, &shown, base)))
}

/// Pin or unpin a leg and recompute visibility.
async fn toggle(Json(req): Json<ToggleRequest>) -> Result<Json<ToggleResponse>, AppError> {
    let shown = req.shown()?;
    let combinations = req.combinations()?;
    let selection = req.selection()?;
    let leg = req.leg()?;

    let update = toggle_selection(&shown, &combinations, &selection, &leg, req.segment_index);

    Ok(Json(ToggleResponse::from_update(&update)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl From<InvalidInput> for AppError {
    fn from(e: InvalidInput) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<AvailabilityError> for AppError {
    fn from(e: AvailabilityError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidRequest(message) => AppError::BadRequest { message },
            PlanError::NoFlights(_) => AppError::NotFound {
                message: e.to_string(),
            },
            PlanError::Availability(e) => e.into(),
            PlanError::Superseded => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
