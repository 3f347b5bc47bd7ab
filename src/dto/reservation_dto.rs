//! DTOs de reservas

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::reservation::{Reservation, ReservationStatus};
use crate::models::vehicle::VehicleType;

/// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    pub vehicle_type: VehicleType,

    #[validate(custom = "crate::utils::validation::validate_plate")]
    pub plate: String,

    #[validate(length(min = 2, max = 100))]
    pub owner_name: String,

    #[validate(length(min = 8, max = 20))]
    pub owner_phone: Option<String>,

    /// Fecha/hora reservada - tiene que ser estrictamente futura
    pub reservation_time: DateTime<Utc>,

    #[validate(range(min = 1, max = 12))]
    pub duration_hours: i32,
}

/// Response de reserva para la API
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub vehicle_type: VehicleType,
    pub plate: String,
    pub owner_name: String,
    pub owner_phone: Option<String>,
    pub reservation_time: DateTime<Utc>,
    pub duration_hours: i32,
    pub fee: Decimal,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    /// Plazo para pagar antes de que la reserva expire
    pub expires_at: DateTime<Utc>,
    pub payment_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub spot: Option<String>,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            vehicle_type: reservation.vehicle_type,
            plate: reservation.plate,
            owner_name: reservation.owner_name,
            owner_phone: reservation.owner_phone,
            reservation_time: reservation.reservation_time,
            duration_hours: reservation.duration_hours,
            fee: reservation.fee,
            status: reservation.status,
            created_at: reservation.created_at,
            expires_at: reservation.payment_deadline,
            payment_id: reservation.payment_id,
            vehicle_id: reservation.vehicle_id,
            spot: reservation.spot_id,
        }
    }
}
