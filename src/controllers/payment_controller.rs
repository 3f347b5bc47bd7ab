use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::payment_dto::{PaymentResponse, PaymentStatusResponse};
use crate::services::mercado_pago_service::PaymentGateway;
use crate::services::reservation_service::ReservationService;
use crate::utils::errors::AppError;

pub struct PaymentController {
    service: ReservationService,
}

impl PaymentController {
    pub fn new(pool: PgPool, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            service: ReservationService::new(pool, gateway),
        }
    }

    /// Consulta puntual de estado: una llamada al gateway, avanza el
    /// estado local si cambió. El caller decide la cadencia de reintento.
    pub async fn check_status(&self, payment_id: Uuid) -> Result<PaymentStatusResponse, AppError> {
        let (payment, gateway_status) = self.service.check_payment(payment_id).await?;

        Ok(PaymentStatusResponse {
            payment: PaymentResponse::from_parts(payment, None),
            gateway_status: gateway_status.as_api_str().to_string(),
        })
    }
}
