//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y los enums cerrados de tipo
//! y estado. Mapea exactamente a la tabla `vehicles` (status y tipo se
//! guardan como TEXT y se decodifican a enums vía try_from).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de vehículo - determina la sección de vagas y la tarifa
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Motorcycle,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Motorcycle => "motorcycle",
        }
    }
}

impl TryFrom<String> for VehicleType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "car" => Ok(VehicleType::Car),
            "motorcycle" => Ok(VehicleType::Motorcycle),
            other => Err(format!("unknown vehicle type '{}'", other)),
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estado del vehículo dentro del estacionamiento
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Parked,
    Exited,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Parked => "parked",
            VehicleStatus::Exited => "exited",
        }
    }
}

impl TryFrom<String> for VehicleStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "parked" => Ok(VehicleStatus::Parked),
            "exited" => Ok(VehicleStatus::Exited),
            other => Err(format!("unknown vehicle status '{}'", other)),
        }
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
///
/// Una estadía nunca se borra: `parked` pasa a `exited` una sola vez
/// y el registro queda como histórico.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    #[sqlx(try_from = "String")]
    pub vehicle_type: VehicleType,
    pub model: String,
    pub color: String,
    pub owner_name: String,
    pub owner_phone: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: VehicleStatus,
    pub spot_id: String,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub fee: Option<Decimal>,
}
