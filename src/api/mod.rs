//! JSON API for itinerary requests

use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::TravelPlanError;
use crate::models::{ItineraryDocument, TripRequest};
use crate::planner::ItineraryAssembler;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Shared handler state
pub type AppState = Arc<ItineraryAssembler>;

#[derive(Serialize, Deserialize)]
pub struct ApiHealth {
    pub status: String,
    pub version: String,
    pub model: String,
}

#[derive(Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub code: String,
}

/// Error response carrying a status code and a JSON body
#[derive(Debug)]
pub struct ApiError(TravelPlanError);

impl From<TravelPlanError> for ApiError {
    fn from(err: TravelPlanError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            TravelPlanError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            TravelPlanError::ModelUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            TravelPlanError::WeatherService { .. }
            | TravelPlanError::EmptyCompletion { .. }
            | TravelPlanError::DayCountMismatch { .. } => StatusCode::BAD_GATEWAY,
            TravelPlanError::Configuration { .. }
            | TravelPlanError::Io { .. }
            | TravelPlanError::General { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Itinerary request failed: {}", self.0);
        } else {
            warn!("Rejected itinerary request: {}", self.0);
        }

        let body = ApiErrorBody {
            error: self.0.user_message(),
            code: self.0.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(assembler: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/itinerary", post(create_itinerary))
        .with_state(assembler)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health(State(assembler): State<AppState>) -> Json<ApiHealth> {
    Json(ApiHealth {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        model: assembler.model().to_string(),
    })
}

async fn create_itinerary(
    State(assembler): State<AppState>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Result<Json<ItineraryDocument>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| TravelPlanError::invalid_input(rejection.body_text()))?;
    let document = assembler.assemble_itinerary(&request).await?;
    Ok(Json(document))
}
