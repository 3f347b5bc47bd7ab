//! Modelo de OperationHistory
//!
//! Registro de auditoría append-only de cada acción que cambia estado.
//! El core solo escribe; los reportes leen. La sincronización de vagas
//! NO genera entrada (es una corrección interna, no una operación).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de operación registrada
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Entry,
    Exit,
    ReservationCreated,
    ReservationCancelled,
    ReservationPaymentConfirmed,
    ReservationActivated,
    ReservationExpired,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Entry => "entry",
            OperationKind::Exit => "exit",
            OperationKind::ReservationCreated => "reservation_created",
            OperationKind::ReservationCancelled => "reservation_cancelled",
            OperationKind::ReservationPaymentConfirmed => "reservation_payment_confirmed",
            OperationKind::ReservationActivated => "reservation_activated",
            OperationKind::ReservationExpired => "reservation_expired",
        }
    }
}

impl TryFrom<String> for OperationKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "entry" => Ok(OperationKind::Entry),
            "exit" => Ok(OperationKind::Exit),
            "reservation_created" => Ok(OperationKind::ReservationCreated),
            "reservation_cancelled" => Ok(OperationKind::ReservationCancelled),
            "reservation_payment_confirmed" => Ok(OperationKind::ReservationPaymentConfirmed),
            "reservation_activated" => Ok(OperationKind::ReservationActivated),
            "reservation_expired" => Ok(OperationKind::ReservationExpired),
            other => Err(format!("unknown operation kind '{}'", other)),
        }
    }
}

/// Entrada de histórico - mapea exactamente a la tabla operation_history
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OperationHistoryEntry {
    pub id: Uuid,
    #[sqlx(try_from = "String")]
    pub operation: OperationKind,
    pub occurred_at: DateTime<Utc>,
    pub plate: Option<String>,
    pub spot_id: Option<String>,
    pub amount: Option<Decimal>,
    /// Snapshot de los datos relevantes de la operación
    pub details: serde_json::Value,
}
