use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{error::ApiError, service::WeatherService, weather::WeatherReading};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Current wind speed and temperature for the configured city.
pub async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherQuery>,
) -> Result<Json<WeatherReading>, ApiError> {
    let subject = state.weather_service.subject();
    let requested = params.city.as_deref().map(str::trim).unwrap_or_default();

    if !requested.eq_ignore_ascii_case(subject) {
        return Err(ApiError::bad_request(format!(
            "query param 'city' must have value '{}'",
            subject.to_lowercase()
        )));
    }

    let reading = state.weather_service.retrieve().await?;
    Ok(Json(reading))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/weather", get(get_weather))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
