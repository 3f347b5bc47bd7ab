use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::dashboard_dto::{
    DashboardStatsResponse, HistoryEntryResponse, HistoryFilters, SpotResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

pub fn create_spot_router() -> Router<AppState> {
    Router::new().route("/", get(get_spot_map))
}

pub fn create_history_router() -> Router<AppState> {
    Router::new().route("/", get(get_history))
}

async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStatsResponse>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    let response = controller.stats().await?;
    Ok(Json(response))
}

async fn get_spot_map(
    State(state): State<AppState>,
) -> Result<Json<Vec<SpotResponse>>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    let response = controller.spot_map().await?;
    Ok(Json(response))
}

async fn get_history(
    State(state): State<AppState>,
    Query(filters): Query<HistoryFilters>,
) -> Result<Json<Vec<HistoryEntryResponse>>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    let response = controller.history(filters).await?;
    Ok(Json(response))
}
