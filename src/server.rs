//! HTTP API around the planetary-hours computation.
//!
//! `POST /sun-times` resolves a location, builds the timeline on the blocking
//! pool and answers with the report; `GET /health` is a liveness check.

// Request and response bodies
mod dto;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::directory::LocationDirectory;
use crate::ephemeris::EphemerisProvider;
use crate::error::AppError;
use crate::planetary::Window;
use crate::report::{PlanetaryHoursReport, planetary_hours, reference_instant};

use dto::{ErrorResponse, HealthResponse, SunTimesRequest};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<LocationDirectory>,
    pub provider: Arc<dyn EphemerisProvider>,
    pub window: Window,
}

impl AppState {
    pub fn new(
        directory: Arc<LocationDirectory>,
        provider: Arc<dyn EphemerisProvider>,
        window: Window,
    ) -> Self {
        Self {
            directory,
            provider,
            window,
        }
    }
}

/// An error ready to be sent as `{ "error": message }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = if err.is_not_found() {
            StatusCode::NOT_FOUND
        } else if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {}", self.message);
        } else {
            warn!("Request rejected: {}", self.message);
        }
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Builds the router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    // the browser frontend is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/sun-times", post(sun_times))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        countries: state.directory.countries().count(),
    })
}

async fn sun_times(
    State(state): State<AppState>,
    payload: Result<Json<SunTimesRequest>, JsonRejection>,
) -> Result<Json<PlanetaryHoursReport>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text()))?;
    info!(
        "Planetary hours requested for {}, {}",
        request.state, request.country
    );

    let report = tokio::task::spawn_blocking(move || -> Result<_, AppError> {
        let location = state.directory.lookup(&request.country, &request.state)?;
        let now = reference_instant(request.at.as_deref(), location.tz()?)?;
        planetary_hours(state.provider.as_ref(), location, &now, state.window)
    })
    .await
    .map_err(|err| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))??;

    Ok(Json(report))
}
