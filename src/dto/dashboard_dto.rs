//! DTOs de dashboard, mapa de vagas e histórico

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::history::{OperationHistoryEntry, OperationKind};
use crate::models::spot::ParkingSpot;
use crate::models::vehicle::VehicleType;
use crate::services::dashboard_service::DashboardStats;

/// Response de estadísticas del dashboard
#[derive(Debug, Serialize)]
pub struct DashboardStatsResponse {
    pub cars_parked: i64,
    pub motorcycles_parked: i64,
    pub available_spots: i64,
    pub today_revenue: Decimal,
    pub occupancy_rate: f64,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            cars_parked: stats.cars_parked,
            motorcycles_parked: stats.motorcycles_parked,
            available_spots: stats.available_spots,
            today_revenue: stats.today_revenue,
            occupancy_rate: stats.occupancy_rate,
        }
    }
}

/// Response de una vaga para el mapa
#[derive(Debug, Serialize)]
pub struct SpotResponse {
    pub id: String,
    pub spot_type: VehicleType,
    pub is_occupied: bool,
    pub is_reserved: bool,
    pub vehicle_id: Option<Uuid>,
    pub reservation_id: Option<Uuid>,
}

impl From<ParkingSpot> for SpotResponse {
    fn from(spot: ParkingSpot) -> Self {
        Self {
            id: spot.id,
            spot_type: spot.spot_type,
            is_occupied: spot.is_occupied,
            is_reserved: spot.is_reserved,
            vehicle_id: spot.vehicle_id,
            reservation_id: spot.reservation_id,
        }
    }
}

/// Filtro del histórico
#[derive(Debug, Deserialize)]
pub struct HistoryFilters {
    pub limit: Option<i64>,
}

/// Response de una entrada del histórico
#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    pub id: Uuid,
    pub operation: OperationKind,
    pub occurred_at: DateTime<Utc>,
    pub plate: Option<String>,
    pub spot: Option<String>,
    pub amount: Option<Decimal>,
    pub details: serde_json::Value,
}

impl From<OperationHistoryEntry> for HistoryEntryResponse {
    fn from(entry: OperationHistoryEntry) -> Self {
        Self {
            id: entry.id,
            operation: entry.operation,
            occurred_at: entry.occurred_at,
            plate: entry.plate,
            spot: entry.spot_id,
            amount: entry.amount,
            details: entry.details,
        }
    }
}
