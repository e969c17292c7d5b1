use std::collections::BTreeMap;
use std::path::Path as FsPath;

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sim_core::dispatch::DispatchMode;
use sim_core::ecs::{DriverId, RideRequestId, RiderId};
use sim_core::metrics::SimMetrics;
use sim_core::spatial::Location;
use sim_core::telemetry::{DriverSnapshot, RideRequestSnapshot, RiderSnapshot, SimSnapshot};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub fn create_router(state: AppState, static_dir: impl AsRef<FsPath>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/drivers", get(list_drivers).post(create_driver))
        .route("/drivers/{driver_id}", delete(delete_driver))
        .route("/riders", get(list_riders).post(create_rider))
        .route("/riders/{rider_id}", delete(delete_rider))
        .route(
            "/ride-requests",
            get(list_ride_requests).post(create_ride_request),
        )
        .route(
            "/ride-requests/{request_id}/reject",
            post(reject_ride_request),
        )
        .route("/tick", post(advance_tick))
        .route("/state", get(get_state))
        .route(
            "/dispatch-algorithm",
            get(get_dispatch_algorithm).post(set_dispatch_algorithm),
        )
        .route("/metrics", get(get_metrics))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRiderBody {
    pub pickup_location: Location,
    pub dropoff_location: Location,
}

#[derive(Debug, Deserialize)]
pub struct CreateRideRequestBody {
    pub rider_id: RiderId,
}

#[derive(Debug, Deserialize)]
pub struct RejectParams {
    pub driver_id: DriverId,
}

#[derive(Debug, Deserialize)]
pub struct AlgorithmParams {
    pub algorithm: String,
}

#[derive(Debug, Serialize)]
pub struct TickResponse {
    pub tick: u64,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DispatchAlgorithmChanged {
    pub current_algorithm: DispatchMode,
    pub available_algorithms: Vec<&'static str>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DispatchAlgorithmInfo {
    pub current_algorithm: DispatchMode,
    pub available_algorithms: Vec<&'static str>,
    pub description: BTreeMap<&'static str, &'static str>,
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": "Ride Dispatch System API",
        "version": env!("CARGO_PKG_VERSION"),
        "frontend": "/static/index.html",
        "endpoints": {
            "drivers": "/drivers",
            "riders": "/riders",
            "ride_requests": "/ride-requests",
            "tick": "/tick",
            "state": "/state",
            "dispatch_algorithm": "/dispatch-algorithm",
            "metrics": "/metrics",
        },
    }))
}

async fn create_driver(
    State(state): State<AppState>,
    Json(location): Json<Location>,
) -> Result<Json<DriverSnapshot>, ApiError> {
    let mut sim = state.sim.lock().await;
    let driver = sim.create_driver(DriverId(new_id()), location)?;
    info!(driver = %driver.id, %location, "driver created");
    Ok(Json(driver))
}

async fn delete_driver(
    State(state): State<AppState>,
    Path(driver_id): Path<DriverId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.sim.lock().await.delete_driver(&driver_id)?;
    info!(driver = %driver_id, "driver deleted");
    Ok(Json(MessageResponse {
        message: "Driver deleted".to_string(),
    }))
}

async fn list_drivers(State(state): State<AppState>) -> Json<Vec<DriverSnapshot>> {
    Json(state.sim.lock().await.drivers())
}

async fn create_rider(
    State(state): State<AppState>,
    Json(body): Json<CreateRiderBody>,
) -> Result<Json<RiderSnapshot>, ApiError> {
    let mut sim = state.sim.lock().await;
    let rider = sim.create_rider(
        RiderId(new_id()),
        body.pickup_location,
        body.dropoff_location,
    )?;
    info!(rider = %rider.id, "rider created");
    Ok(Json(rider))
}

async fn delete_rider(
    State(state): State<AppState>,
    Path(rider_id): Path<RiderId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.sim.lock().await.delete_rider(&rider_id)?;
    info!(rider = %rider_id, "rider deleted");
    Ok(Json(MessageResponse {
        message: "Rider deleted".to_string(),
    }))
}

async fn list_riders(State(state): State<AppState>) -> Json<Vec<RiderSnapshot>> {
    Json(state.sim.lock().await.riders())
}

async fn create_ride_request(
    State(state): State<AppState>,
    Json(body): Json<CreateRideRequestBody>,
) -> Result<Json<RideRequestSnapshot>, ApiError> {
    let mut sim = state.sim.lock().await;
    let request = sim.request_ride(RideRequestId(new_id()), &body.rider_id)?;
    info!(
        request = %request.id,
        rider = %request.rider_id,
        status = ?request.status,
        driver = ?request.assigned_driver_id,
        "ride requested"
    );
    Ok(Json(request))
}

async fn list_ride_requests(State(state): State<AppState>) -> Json<Vec<RideRequestSnapshot>> {
    Json(state.sim.lock().await.ride_requests())
}

async fn reject_ride_request(
    State(state): State<AppState>,
    Path(request_id): Path<RideRequestId>,
    Query(params): Query<RejectParams>,
) -> Result<Json<RideRequestSnapshot>, ApiError> {
    let mut sim = state.sim.lock().await;
    let request = sim.reject_assignment(&request_id, &params.driver_id)?;
    info!(
        request = %request.id,
        rejected_by = %params.driver_id,
        status = ?request.status,
        driver = ?request.assigned_driver_id,
        "assignment rejected"
    );
    Ok(Json(request))
}

async fn advance_tick(State(state): State<AppState>) -> Json<TickResponse> {
    let tick = state.sim.lock().await.advance();
    Json(TickResponse {
        tick,
        message: "Time advanced",
    })
}

async fn get_state(State(state): State<AppState>) -> Json<SimSnapshot> {
    Json(state.sim.lock().await.state())
}

async fn set_dispatch_algorithm(
    State(state): State<AppState>,
    Query(params): Query<AlgorithmParams>,
) -> Result<Json<DispatchAlgorithmChanged>, ApiError> {
    let mode: DispatchMode = params.algorithm.parse()?;
    state.sim.lock().await.set_dispatch_mode(mode);
    info!(%mode, "dispatch algorithm set");
    Ok(Json(DispatchAlgorithmChanged {
        current_algorithm: mode,
        available_algorithms: DispatchMode::names(),
        message: format!("Dispatch algorithm changed to {mode}"),
    }))
}

async fn get_dispatch_algorithm(State(state): State<AppState>) -> Json<DispatchAlgorithmInfo> {
    let current_algorithm = state.sim.lock().await.dispatch_mode();
    Json(DispatchAlgorithmInfo {
        current_algorithm,
        available_algorithms: DispatchMode::names(),
        description: DispatchMode::ALL
            .into_iter()
            .map(|mode| (mode.as_str(), mode.description()))
            .collect(),
    })
}

async fn get_metrics(State(state): State<AppState>) -> Json<SimMetrics> {
    Json(state.sim.lock().await.metrics())
}
