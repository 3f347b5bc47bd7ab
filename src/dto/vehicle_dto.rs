//! DTOs de vehículos (entrada/salida)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::{Vehicle, VehicleStatus, VehicleType};
use crate::services::parking_service::{EntryResult, ExitResult};

/// Request para registrar la entrada de un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterEntryRequest {
    #[validate(custom = "crate::utils::validation::validate_plate")]
    pub plate: String,

    pub vehicle_type: VehicleType,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(length(min = 1, max = 50))]
    pub color: String,

    #[validate(length(min = 2, max = 100))]
    pub owner_name: String,

    #[validate(length(min = 8, max = 20))]
    pub owner_phone: Option<String>,
}

/// Response de entrada registrada
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub vehicle_id: Uuid,
    pub plate: String,
    pub spot: String,
    pub entry_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activated_reservation_id: Option<Uuid>,
}

impl From<EntryResult> for EntryResponse {
    fn from(result: EntryResult) -> Self {
        Self {
            vehicle_id: result.vehicle_id,
            plate: result.plate,
            spot: result.spot_id,
            entry_time: result.entry_time,
            activated_reservation_id: result.activated_reservation_id,
        }
    }
}

/// Response de salida procesada
#[derive(Debug, Serialize)]
pub struct ExitResponse {
    pub plate: String,
    pub spot: String,
    pub duration_minutes: i64,
    pub fee: Decimal,
}

impl From<ExitResult> for ExitResponse {
    fn from(result: ExitResult) -> Self {
        Self {
            plate: result.plate,
            spot: result.spot_id,
            duration_minutes: result.duration_minutes,
            fee: result.fee,
        }
    }
}

/// Filtro de listado
#[derive(Debug, Deserialize)]
pub struct VehicleFilters {
    pub status: Option<VehicleStatus>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub plate: String,
    pub vehicle_type: VehicleType,
    pub model: String,
    pub color: String,
    pub owner_name: String,
    pub owner_phone: Option<String>,
    pub status: VehicleStatus,
    pub spot: String,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub fee: Option<Decimal>,
    /// Tarifa estimada contra el instante actual - solo mientras está
    /// estacionado, nunca se persiste
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_fee: Option<Decimal>,
}

impl VehicleResponse {
    pub fn from_vehicle(vehicle: Vehicle, estimated_fee: Option<Decimal>) -> Self {
        Self {
            id: vehicle.id,
            plate: vehicle.plate,
            vehicle_type: vehicle.vehicle_type,
            model: vehicle.model,
            color: vehicle.color,
            owner_name: vehicle.owner_name,
            owner_phone: vehicle.owner_phone,
            status: vehicle.status,
            spot: vehicle.spot_id,
            entry_time: vehicle.entry_time,
            exit_time: vehicle.exit_time,
            duration_minutes: vehicle.duration_minutes,
            fee: vehicle.fee,
            estimated_fee,
        }
    }
}
