use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::reservation_controller::ReservationController;
use crate::dto::common::ApiResponse;
use crate::dto::payment_dto::{
    ConfirmPaymentRequest, CreateCardPaymentRequest, CreatePixPaymentRequest, PaymentResponse,
};
use crate::dto::reservation_dto::{CreateReservationRequest, ReservationResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reservation_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_reservation))
        .route("/", get(list_reservations))
        .route("/:id", get(get_reservation))
        .route("/:id", delete(cancel_reservation))
        .route("/:id/payment/pix", post(create_pix_payment))
        .route("/:id/payment/card", post(create_card_payment))
        .route("/:id/payment/confirm", post(confirm_payment))
}

async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<Json<ApiResponse<ReservationResponse>>, AppError> {
    let controller = ReservationController::new(state.pool.clone(), state.gateway());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_reservations(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let controller = ReservationController::new(state.pool.clone(), state.gateway());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationResponse>, AppError> {
    let controller = ReservationController::new(state.pool.clone(), state.gateway());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReservationResponse>>, AppError> {
    let controller = ReservationController::new(state.pool.clone(), state.gateway());
    let response = controller.cancel(id).await?;
    Ok(Json(response))
}

async fn create_pix_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreatePixPaymentRequest>,
) -> Result<Json<ApiResponse<PaymentResponse>>, AppError> {
    let controller = ReservationController::new(state.pool.clone(), state.gateway());
    let response = controller.create_pix_payment(id, request).await?;
    Ok(Json(response))
}

async fn create_card_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateCardPaymentRequest>,
) -> Result<Json<ApiResponse<PaymentResponse>>, AppError> {
    let controller = ReservationController::new(state.pool.clone(), state.gateway());
    let response = controller.create_card_payment(id, request).await?;
    Ok(Json(response))
}

async fn confirm_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<Json<ApiResponse<ReservationResponse>>, AppError> {
    let controller = ReservationController::new(state.pool.clone(), state.gateway());
    let response = controller.confirm_payment(id, request).await?;
    Ok(Json(response))
}
