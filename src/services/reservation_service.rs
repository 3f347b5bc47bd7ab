//! Ciclo de vida de reservas
//!
//! pending_payment -> confirmed -> active -> (expired | cancelled)
//!
//! La expiración es perezosa: no hay job de barrido, cualquier lectura
//! de reservas expira primero las pendientes con plazo vencido. La
//! activación ocurre en la entrada del vehículo (ParkingService).

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::history::OperationKind;
use crate::models::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::models::reservation::{Reservation, ReservationStatus, PAYMENT_DEADLINE_MINUTES};
use crate::models::vehicle::VehicleType;
use crate::repositories::history_repository::HistoryRepository;
use crate::repositories::payment_repository::PaymentRepository;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::repositories::spot_repository::SpotRepository;
use crate::services::fee_calculator;
use crate::services::mercado_pago_service::{
    CreatedPayment, GatewayPaymentStatus, PayerIdentity, PaymentGateway,
};
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};
use crate::utils::validation::{is_valid_plate, normalize_plate};

/// Datos ya validados para crear una reserva
#[derive(Debug, Clone)]
pub struct CreateReservationInput {
    pub vehicle_type: VehicleType,
    pub plate: String,
    pub owner_name: String,
    pub owner_phone: Option<String>,
    pub reservation_time: chrono::DateTime<Utc>,
    pub duration_hours: i32,
}

/// Validar los datos de una reserva nueva contra el instante dado.
/// Devuelve la placa normalizada.
pub fn validate_reservation_input(
    input: &CreateReservationInput,
    now: chrono::DateTime<Utc>,
) -> AppResult<String> {
    let plate = normalize_plate(&input.plate);
    if !is_valid_plate(&plate) {
        return Err(validation_error("plate", "invalid Brazilian plate format"));
    }

    if input.reservation_time <= now {
        return Err(validation_error(
            "reservation_time",
            "reservation must be strictly in the future",
        ));
    }

    if !(1..=12).contains(&input.duration_hours) {
        return Err(validation_error(
            "duration_hours",
            "duration must be between 1 and 12 hours",
        ));
    }

    Ok(plate)
}

pub struct ReservationService {
    reservations: ReservationRepository,
    payments: PaymentRepository,
    spots: SpotRepository,
    history: HistoryRepository,
    gateway: Arc<dyn PaymentGateway>,
}

impl ReservationService {
    pub fn new(pool: PgPool, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            reservations: ReservationRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool.clone()),
            spots: SpotRepository::new(pool.clone()),
            history: HistoryRepository::new(pool),
            gateway,
        }
    }

    /// Crear una reserva en pending_payment con plazo de pago de 30
    /// minutos. La fecha tiene que ser estrictamente futura.
    pub async fn create(&self, input: CreateReservationInput) -> AppResult<Reservation> {
        let now = Utc::now();
        let plate = validate_reservation_input(&input, now)?;

        let reservation = Reservation {
            id: Uuid::new_v4(),
            vehicle_type: input.vehicle_type,
            plate: plate.clone(),
            owner_name: input.owner_name,
            owner_phone: input.owner_phone,
            reservation_time: input.reservation_time,
            duration_hours: input.duration_hours,
            fee: fee_calculator::reservation_fee(input.vehicle_type, input.duration_hours),
            status: ReservationStatus::PendingPayment,
            created_at: now,
            payment_deadline: now + Duration::minutes(PAYMENT_DEADLINE_MINUTES),
            payment_id: None,
            vehicle_id: None,
            spot_id: None,
        };

        self.reservations.insert(&reservation).await?;

        self.history
            .append(
                OperationKind::ReservationCreated,
                Some(&plate),
                None,
                Some(reservation.fee),
                json!({
                    "reservation_id": reservation.id,
                    "vehicle_type": reservation.vehicle_type.as_str(),
                    "reservation_time": reservation.reservation_time,
                    "duration_hours": reservation.duration_hours,
                }),
            )
            .await?;

        tracing::info!(
            "📅 Reserva {} creada para placa {} (R$ {})",
            reservation.id,
            plate,
            reservation.fee
        );

        Ok(reservation)
    }

    /// Expirar reservas pendientes con plazo vencido y registrar cada
    /// una en el histórico. Corre antes de cualquier lectura de reservas.
    pub async fn expire_overdue(&self) -> AppResult<usize> {
        let expired = self.reservations.expire_overdue(Utc::now()).await?;

        for reservation in &expired {
            self.spots.clear_reservation(reservation.id).await?;
            self.history
                .append(
                    OperationKind::ReservationExpired,
                    Some(&reservation.plate),
                    reservation.spot_id.as_deref(),
                    None,
                    json!({ "reservation_id": reservation.id, "cause": "payment_deadline" }),
                )
                .await?;
        }

        if !expired.is_empty() {
            tracing::info!("⏰ {} reservas expiradas por plazo de pago vencido", expired.len());
        }

        Ok(expired.len())
    }

    pub async fn list(&self) -> AppResult<Vec<Reservation>> {
        self.expire_overdue().await?;
        self.reservations.list_all().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Reservation> {
        self.expire_overdue().await?;
        self.reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Reservation", &id.to_string()))
    }

    /// Crear un pago PIX para una reserva pendiente
    pub async fn create_pix_payment(
        &self,
        reservation_id: Uuid,
        payer: PayerIdentity,
    ) -> AppResult<(Payment, CreatedPayment)> {
        let reservation = self.get(reservation_id).await?;
        if !reservation.status.can_pay() {
            return Err(AppError::InvalidState(format!(
                "Reservation '{}' is {} - payment is only allowed while pending",
                reservation_id,
                reservation.status.as_str()
            )));
        }

        let created = self
            .gateway
            .create_pix_payment(reservation.fee, &payer, &reservation_id.to_string())
            .await?;

        let payment = self
            .persist_payment(&reservation, &created, PaymentMethod::Pix, &payer)
            .await?;

        Ok((payment, created))
    }

    /// Crear un cobro con tarjeta para una reserva pendiente
    pub async fn create_card_payment(
        &self,
        reservation_id: Uuid,
        card_token: &str,
        installments: i32,
        payer: PayerIdentity,
    ) -> AppResult<(Payment, CreatedPayment)> {
        let reservation = self.get(reservation_id).await?;
        if !reservation.status.can_pay() {
            return Err(AppError::InvalidState(format!(
                "Reservation '{}' is {} - payment is only allowed while pending",
                reservation_id,
                reservation.status.as_str()
            )));
        }

        let created = self
            .gateway
            .create_card_payment(
                reservation.fee,
                card_token,
                installments,
                &payer,
                &reservation_id.to_string(),
            )
            .await?;

        let payment = self
            .persist_payment(&reservation, &created, PaymentMethod::Card, &payer)
            .await?;

        Ok((payment, created))
    }

    async fn persist_payment(
        &self,
        reservation: &Reservation,
        created: &CreatedPayment,
        method: PaymentMethod,
        payer: &PayerIdentity,
    ) -> AppResult<Payment> {
        let payment = Payment {
            id: Uuid::new_v4(),
            gateway_payment_id: created.gateway_payment_id.clone(),
            reservation_id: Some(reservation.id),
            vehicle_id: None,
            amount: reservation.fee,
            status: PaymentStatus::Pending,
            payment_method: method,
            payer_email: payer.email.clone(),
            payer_name: payer.first_name.clone(),
            payer_document: payer.document.clone(),
            created_at: Utc::now(),
            expires_at: created.expires_at,
            completed_at: None,
        };

        self.payments.insert(&payment).await?;
        self.reservations
            .set_payment(reservation.id, payment.id)
            .await?;

        Ok(payment)
    }

    /// Confirmar el pago de una reserva: solo si el gateway lo reporta
    /// aprobado. pending_payment -> confirmed.
    pub async fn confirm_payment(
        &self,
        reservation_id: Uuid,
        payment_id: Uuid,
    ) -> AppResult<Reservation> {
        let reservation = self.get(reservation_id).await?;
        if !reservation.status.can_pay() {
            return Err(AppError::InvalidState(format!(
                "Reservation '{}' is {} - cannot confirm payment",
                reservation_id,
                reservation.status.as_str()
            )));
        }

        let payment = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| not_found_error("Payment", &payment_id.to_string()))?;

        if payment.reservation_id != Some(reservation_id) {
            return Err(AppError::NotFound(format!(
                "Payment '{}' does not belong to reservation '{}'",
                payment_id, reservation_id
            )));
        }

        let gateway_payment = self.gateway.get_payment(&payment.gateway_payment_id).await?;
        if gateway_payment.status != GatewayPaymentStatus::Approved {
            return Err(AppError::PaymentNotApproved(format!(
                "Gateway reports payment '{}' as {:?}",
                payment.gateway_payment_id, gateway_payment.status
            )));
        }

        let completed_at = gateway_payment.approved_at.unwrap_or_else(Utc::now);
        self.payments
            .update_status(payment.id, PaymentStatus::Completed, Some(completed_at))
            .await?;
        self.reservations
            .update_status(reservation_id, ReservationStatus::Confirmed)
            .await?;

        // La confirmación pre-reserva la vaga libre de menor ordinal;
        // sin vaga libre la reserva queda confirmada igual y la entrada
        // asigna normalmente
        let reserved_spot = self
            .spots
            .reserve_first_free(reservation.vehicle_type, reservation_id)
            .await?;
        if let Some(spot_id) = &reserved_spot {
            self.reservations.set_spot(reservation_id, spot_id).await?;
        }

        self.history
            .append(
                OperationKind::ReservationPaymentConfirmed,
                Some(&reservation.plate),
                reserved_spot.as_deref(),
                Some(payment.amount),
                json!({
                    "reservation_id": reservation_id,
                    "payment_id": payment.id,
                    "gateway_payment_id": payment.gateway_payment_id,
                    "reserved_spot": reserved_spot,
                }),
            )
            .await?;

        tracing::info!("✅ Pago confirmado: reserva {} confirmada", reservation_id);

        self.get(reservation_id).await
    }

    /// Cancelar una reserva (iniciado por el usuario). Legal solo desde
    /// pending_payment o confirmed; una reserva activa corre hasta el
    /// final y las terminales ya no cambian.
    pub async fn cancel(&self, reservation_id: Uuid) -> AppResult<Reservation> {
        let reservation = self.get(reservation_id).await?;
        if !reservation.status.can_cancel() {
            return Err(AppError::InvalidState(format!(
                "Reservation '{}' is {} - cancellation is not allowed",
                reservation_id,
                reservation.status.as_str()
            )));
        }

        self.reservations
            .update_status(reservation_id, ReservationStatus::Cancelled)
            .await?;
        self.spots.clear_reservation(reservation_id).await?;

        self.history
            .append(
                OperationKind::ReservationCancelled,
                Some(&reservation.plate),
                reservation.spot_id.as_deref(),
                None,
                json!({ "reservation_id": reservation_id, "cause": "user" }),
            )
            .await?;

        tracing::info!("🚫 Reserva {} cancelada por el usuario", reservation_id);

        self.get(reservation_id).await
    }

    /// Consulta puntual "check and advance": consulta el gateway una
    /// sola vez y avanza el estado local del pago (y de la reserva, si
    /// el pago quedó aprobado). La cadencia de reintentos es del caller.
    pub async fn check_payment(&self, payment_id: Uuid) -> AppResult<(Payment, GatewayPaymentStatus)> {
        let payment = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| not_found_error("Payment", &payment_id.to_string()))?;

        let gateway_payment = self.gateway.get_payment(&payment.gateway_payment_id).await?;

        let new_status = match gateway_payment.status {
            GatewayPaymentStatus::Approved => Some(PaymentStatus::Completed),
            GatewayPaymentStatus::Rejected => Some(PaymentStatus::Failed),
            GatewayPaymentStatus::Cancelled => Some(PaymentStatus::Cancelled),
            _ => None,
        };

        if let Some(new_status) = new_status {
            if payment.status != new_status {
                let completed_at = (new_status == PaymentStatus::Completed)
                    .then(|| gateway_payment.approved_at.unwrap_or_else(Utc::now));
                self.payments
                    .update_status(payment.id, new_status, completed_at)
                    .await?;

                // Un pago aprobado confirma su reserva pendiente
                if new_status == PaymentStatus::Completed {
                    if let Some(reservation_id) = payment.reservation_id {
                        if let Some(reservation) =
                            self.reservations.find_by_id(reservation_id).await?
                        {
                            if reservation.status.can_pay() {
                                self.confirm_payment(reservation_id, payment.id).await?;
                            }
                        }
                    }
                }
            }
        }

        let refreshed = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| not_found_error("Payment", &payment_id.to_string()))?;

        Ok((refreshed, gateway_payment.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn input(reservation_time: chrono::DateTime<Utc>, duration_hours: i32) -> CreateReservationInput {
        CreateReservationInput {
            vehicle_type: VehicleType::Car,
            plate: "abc-1234".to_string(),
            owner_name: "Maria Silva".to_string(),
            owner_phone: None,
            reservation_time,
            duration_hours,
        }
    }

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_valid_input_normalizes_plate() {
        let plate = validate_reservation_input(&input(now() + Duration::hours(2), 3), now())
            .unwrap();
        assert_eq!(plate, "ABC1234");
    }

    #[test]
    fn test_rejects_past_reservation_time() {
        let result = validate_reservation_input(&input(now() - Duration::minutes(1), 3), now());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_reservation_time_equal_to_now() {
        // La fecha tiene que ser estrictamente futura
        let result = validate_reservation_input(&input(now(), 3), now());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_duration_out_of_range() {
        let future = now() + Duration::hours(2);
        assert!(validate_reservation_input(&input(future, 0), now()).is_err());
        assert!(validate_reservation_input(&input(future, 13), now()).is_err());
        assert!(validate_reservation_input(&input(future, -1), now()).is_err());
    }

    #[test]
    fn test_accepts_duration_bounds() {
        let future = now() + Duration::hours(2);
        assert!(validate_reservation_input(&input(future, 1), now()).is_ok());
        assert!(validate_reservation_input(&input(future, 12), now()).is_ok());
    }

    #[test]
    fn test_rejects_invalid_plate() {
        let mut bad = input(now() + Duration::hours(2), 3);
        bad.plate = "1234567".to_string();
        let result = validate_reservation_input(&bad, now());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
