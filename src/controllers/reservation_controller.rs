use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::payment_dto::{
    ConfirmPaymentRequest, CreateCardPaymentRequest, CreatePixPaymentRequest, PaymentResponse,
};
use crate::dto::reservation_dto::{CreateReservationRequest, ReservationResponse};
use crate::services::mercado_pago_service::PaymentGateway;
use crate::services::reservation_service::{CreateReservationInput, ReservationService};
use crate::utils::errors::AppError;

pub struct ReservationController {
    service: ReservationService,
}

impl ReservationController {
    pub fn new(pool: PgPool, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            service: ReservationService::new(pool, gateway),
        }
    }

    pub async fn create(
        &self,
        request: CreateReservationRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        request.validate()?;

        let reservation = self
            .service
            .create(CreateReservationInput {
                vehicle_type: request.vehicle_type,
                plate: request.plate,
                owner_name: request.owner_name,
                owner_phone: request.owner_phone,
                reservation_time: request.reservation_time,
                duration_hours: request.duration_hours,
            })
            .await?;

        Ok(ApiResponse::success_with_message(
            reservation.into(),
            "Reserva creada exitosamente".to_string(),
        ))
    }

    pub async fn list(&self) -> Result<Vec<ReservationResponse>, AppError> {
        let reservations = self.service.list().await?;
        Ok(reservations.into_iter().map(Into::into).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ReservationResponse, AppError> {
        let reservation = self.service.get(id).await?;
        Ok(reservation.into())
    }

    pub async fn cancel(&self, id: Uuid) -> Result<ApiResponse<ReservationResponse>, AppError> {
        let reservation = self.service.cancel(id).await?;

        Ok(ApiResponse::success_with_message(
            reservation.into(),
            "Reserva cancelada exitosamente".to_string(),
        ))
    }

    pub async fn create_pix_payment(
        &self,
        id: Uuid,
        request: CreatePixPaymentRequest,
    ) -> Result<ApiResponse<PaymentResponse>, AppError> {
        request.validate()?;

        let (payment, created) = self
            .service
            .create_pix_payment(id, request.payer.into())
            .await?;

        Ok(ApiResponse::success_with_message(
            PaymentResponse::from_parts(payment, Some(created)),
            "Pago PIX creado exitosamente".to_string(),
        ))
    }

    pub async fn create_card_payment(
        &self,
        id: Uuid,
        request: CreateCardPaymentRequest,
    ) -> Result<ApiResponse<PaymentResponse>, AppError> {
        request.validate()?;

        let (payment, created) = self
            .service
            .create_card_payment(
                id,
                &request.card_token,
                request.installments,
                request.payer.into(),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            PaymentResponse::from_parts(payment, Some(created)),
            "Cobro con tarjeta creado exitosamente".to_string(),
        ))
    }

    pub async fn confirm_payment(
        &self,
        id: Uuid,
        request: ConfirmPaymentRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        let reservation = self.service.confirm_payment(id, request.payment_id).await?;

        Ok(ApiResponse::success_with_message(
            reservation.into(),
            "Pago confirmado exitosamente".to_string(),
        ))
    }
}
