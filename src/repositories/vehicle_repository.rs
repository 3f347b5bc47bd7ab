//! Repositorio de vehículos
//!
//! Lecturas y actualizaciones simples sobre la tabla `vehicles`. Las
//! escrituras transaccionales de entrada/salida viven en ParkingService
//! porque cruzan vehículos + vagas + histórico en una sola unidad.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::{Vehicle, VehicleStatus, VehicleType};
use crate::utils::errors::AppResult;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list_by_status(&self, status: Option<VehicleStatus>) -> AppResult<Vec<Vehicle>> {
        let vehicles = match status {
            Some(status) => {
                sqlx::query_as::<_, Vehicle>(
                    "SELECT * FROM vehicles WHERE status = $1 ORDER BY entry_time DESC",
                )
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY entry_time DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(vehicles)
    }

    pub async fn count_parked(&self, vehicle_type: VehicleType) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM vehicles WHERE status = $1 AND vehicle_type = $2",
        )
        .bind(VehicleStatus::Parked.as_str())
        .bind(vehicle_type.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Suma de tarifas de salidas desde el instante dado (revenue del día)
    pub async fn sum_exit_fees_since(&self, since: DateTime<Utc>) -> AppResult<Decimal> {
        let (total,): (Option<Decimal>,) = sqlx::query_as(
            "SELECT SUM(fee) FROM vehicles WHERE status = $1 AND exit_time >= $2",
        )
        .bind(VehicleStatus::Exited.as_str())
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(Decimal::ZERO))
    }
}
