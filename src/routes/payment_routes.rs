use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::payment_controller::PaymentController;
use crate::dto::payment_dto::PaymentStatusResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_payment_router() -> Router<AppState> {
    Router::new().route("/:id/status", get(check_payment_status))
}

/// Consulta puntual del estado del pago. El polling (cadencia y tope)
/// es responsabilidad del caller - este endpoint hace una sola consulta.
async fn check_payment_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentStatusResponse>, AppError> {
    let controller = PaymentController::new(state.pool.clone(), state.gateway());
    let response = controller.check_status(id).await?;
    Ok(Json(response))
}
