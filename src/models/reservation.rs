//! Modelo de Reservation
//!
//! Este módulo contiene la reserva y su máquina de estados:
//! pending_payment -> confirmed -> active -> (expired | cancelled).
//! Las transiciones legales viven acá para que un estado ilegal sea
//! un error de construcción y no una comparación de strings en runtime.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::vehicle::VehicleType;

/// Ventana de gracia para pagar una reserva recién creada
pub const PAYMENT_DEADLINE_MINUTES: i64 = 30;

/// Estado de una reserva
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    PendingPayment,
    Confirmed,
    Active,
    Expired,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::PendingPayment => "pending_payment",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Active => "active",
            ReservationStatus::Expired => "expired",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Una reserva solo se puede cancelar antes de activarse.
    /// Desde cancelled/expired es terminal, y una reserva activa
    /// corre hasta el final - no se cancela.
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            ReservationStatus::PendingPayment | ReservationStatus::Confirmed
        )
    }

    /// El pago solo se crea/confirma mientras la reserva espera pago
    pub fn can_pay(&self) -> bool {
        matches!(self, ReservationStatus::PendingPayment)
    }

    pub fn can_activate(&self) -> bool {
        matches!(self, ReservationStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Expired | ReservationStatus::Cancelled
        )
    }
}

impl TryFrom<String> for ReservationStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending_payment" => Ok(ReservationStatus::PendingPayment),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "active" => Ok(ReservationStatus::Active),
            "expired" => Ok(ReservationStatus::Expired),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("unknown reservation status '{}'", other)),
        }
    }
}

/// Reservation principal - mapea exactamente a la tabla reservations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    #[sqlx(try_from = "String")]
    pub vehicle_type: VehicleType,
    pub plate: String,
    pub owner_name: String,
    pub owner_phone: Option<String>,
    pub reservation_time: DateTime<Utc>,
    pub duration_hours: i32,
    pub fee: Decimal,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    /// Pasado este instante una reserva sin pagar se considera abandonada
    pub payment_deadline: DateTime<Utc>,
    pub payment_id: Option<Uuid>,
    /// Poblado recién cuando la reserva se convierte en un vehículo estacionado
    pub vehicle_id: Option<Uuid>,
    pub spot_id: Option<String>,
}

impl Reservation {
    /// Fin de la ventana reservada
    pub fn window_end(&self) -> DateTime<Utc> {
        self.reservation_time + Duration::hours(self.duration_hours as i64)
    }

    /// La ventana reservada cubre el instante dado
    pub fn window_covers(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.reservation_time && instant <= self.window_end()
    }

    /// Una reserva pendiente cuyo plazo de pago venció debe expirar
    pub fn is_payment_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::PendingPayment && now > self.payment_deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_allowed_from_pending_and_confirmed() {
        assert!(ReservationStatus::PendingPayment.can_cancel());
        assert!(ReservationStatus::Confirmed.can_cancel());
    }

    #[test]
    fn test_cancel_rejected_from_active_and_terminal() {
        assert!(!ReservationStatus::Active.can_cancel());
        assert!(!ReservationStatus::Cancelled.can_cancel());
        assert!(!ReservationStatus::Expired.can_cancel());
    }

    #[test]
    fn test_payment_only_from_pending() {
        assert!(ReservationStatus::PendingPayment.can_pay());
        assert!(!ReservationStatus::Confirmed.can_pay());
        assert!(!ReservationStatus::Active.can_pay());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ReservationStatus::PendingPayment,
            ReservationStatus::Confirmed,
            ReservationStatus::Active,
            ReservationStatus::Expired,
            ReservationStatus::Cancelled,
        ] {
            let parsed = ReservationStatus::try_from(status.as_str().to_string()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_payment_overdue() {
        let now = Utc::now();
        let reservation = Reservation {
            id: Uuid::new_v4(),
            vehicle_type: crate::models::vehicle::VehicleType::Car,
            plate: "ABC1234".to_string(),
            owner_name: "Test".to_string(),
            owner_phone: None,
            reservation_time: now + Duration::hours(5),
            duration_hours: 2,
            fee: Decimal::new(2000, 2),
            status: ReservationStatus::PendingPayment,
            created_at: now - Duration::minutes(45),
            payment_deadline: now - Duration::minutes(15),
            payment_id: None,
            vehicle_id: None,
            spot_id: None,
        };

        assert!(reservation.is_payment_overdue(now));

        let mut confirmed = reservation.clone();
        confirmed.status = ReservationStatus::Confirmed;
        assert!(!confirmed.is_payment_overdue(now));
    }
}
