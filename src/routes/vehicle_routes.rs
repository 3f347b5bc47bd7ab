use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::{
    EntryResponse, ExitResponse, RegisterEntryRequest, VehicleFilters, VehicleResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/entry", post(register_entry))
        .route("/", get(list_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id/exit", post(process_exit))
}

async fn register_entry(
    State(state): State<AppState>,
    Json(request): Json<RegisterEntryRequest>,
) -> Result<Json<ApiResponse<EntryResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.register_entry(request).await?;
    Ok(Json(response))
}

async fn process_exit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ExitResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.process_exit(id).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(filters): Query<VehicleFilters>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}
