//! HTTP route definitions

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::app::AppState;
use crate::game::catalog::{TurnCurve, VehicleType, WeaponSpec};
use crate::util::time::uptime_secs;
use crate::ws::handler::ws_handler;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/vehicles", get(vehicles_handler))
        .route("/vehicles/:id", get(vehicle_handler))
        .route("/ws", get(ws_handler));

    router
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.client_origin))
        .with_state(state)
}

/// CORS from CLIENT_ORIGIN (comma-separated, `*` for any)
fn cors_layer(client_origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if client_origin.split(',').any(|s| s.trim() == "*") {
        return cors.allow_origin(Any);
    }

    let allowed_origins: Vec<HeaderValue> = client_origin
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();
    cors.allow_origin(allowed_origins)
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    active_rooms: usize,
    active_players: usize,
    vehicles: usize,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        active_rooms: state.rooms.active_rooms(),
        active_players: state.rooms.total_players(),
        vehicles: state.catalog.len(),
    })
}

// ============================================================================
// Vehicle catalog endpoints
// ============================================================================

/// Summary for the vehicle-selection screen
#[derive(Serialize)]
struct VehicleSummary {
    id: String,
    name: String,
    category: String,
    max_health: u32,
    max_speed: f32,
    acceleration: f32,
    turn_rate: f32,
    turn_curve: TurnCurve,
    weapon: WeaponSummary,
}

#[derive(Serialize)]
struct WeaponSummary {
    name: &'static str,
    damage: u32,
    cooldown_ms: u64,
    range: f32,
    emitters: usize,
    splash_radius: Option<f32>,
}

impl From<&WeaponSpec> for WeaponSummary {
    fn from(weapon: &WeaponSpec) -> Self {
        Self {
            name: weapon.kind.display_name(),
            damage: weapon.damage,
            cooldown_ms: weapon.cooldown_ms,
            range: weapon.range,
            emitters: weapon.emitter_count(),
            splash_radius: weapon.splash_radius,
        }
    }
}

impl From<&VehicleType> for VehicleSummary {
    fn from(vehicle: &VehicleType) -> Self {
        Self {
            id: vehicle.id.clone(),
            name: vehicle.name.clone(),
            category: vehicle.category.clone(),
            max_health: vehicle.max_health,
            max_speed: vehicle.max_speed,
            acceleration: vehicle.acceleration,
            turn_rate: vehicle.turn_rate,
            turn_curve: vehicle.turn_curve,
            weapon: WeaponSummary::from(&vehicle.weapon),
        }
    }
}

#[derive(Serialize)]
struct VehiclesResponse {
    vehicles: Vec<VehicleSummary>,
}

async fn vehicles_handler(State(state): State<AppState>) -> Json<VehiclesResponse> {
    let vehicles = state
        .catalog
        .iter()
        .map(|v| VehicleSummary::from(v.as_ref()))
        .collect();
    Json(VehiclesResponse { vehicles })
}

async fn vehicle_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VehicleType>, AppError> {
    let vehicle = state
        .catalog
        .get(&id)
        .map_err(|e| AppError::NotFound(e.to_string()))?;
    Ok(Json(vehicle.as_ref().clone()))
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
