//! Estadísticas del dashboard
//!
//! Toda lectura sensible a ocupación sincroniza primero, para que el
//! snapshot sea consistente aunque la tabla de vagas haya drifteado.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::vehicle::VehicleType;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::repositories::spot_repository::SpotRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::spot_allocator::{self, TOTAL_CAPACITY};
use crate::utils::errors::AppResult;

/// Snapshot de estadísticas del estacionamiento
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub cars_parked: i64,
    pub motorcycles_parked: i64,
    pub available_spots: i64,
    pub today_revenue: Decimal,
    /// Porcentaje de ocupación sobre las 70 vagas, 1 decimal
    pub occupancy_rate: f64,
}

pub struct DashboardService {
    pool: PgPool,
    vehicles: VehicleRepository,
    spots: SpotRepository,
    reservations: ReservationRepository,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            spots: SpotRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn compute_stats(&self) -> AppResult<DashboardStats> {
        // La tabla de vehículos manda; reconciliar antes de leer
        spot_allocator::synchronize(&self.pool).await?;

        let cars_parked = self.vehicles.count_parked(VehicleType::Car).await?;
        let motorcycles_parked = self.vehicles.count_parked(VehicleType::Motorcycle).await?;

        let available_spots = self.spots.count_free(VehicleType::Car).await?
            + self.spots.count_free(VehicleType::Motorcycle).await?;

        let start_of_day = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time")
            .and_utc();

        let today_revenue = self.vehicles.sum_exit_fees_since(start_of_day).await?
            + self
                .reservations
                .sum_confirmed_fees_since(start_of_day)
                .await?;

        let parked = cars_parked + motorcycles_parked;
        let occupancy_rate =
            ((parked as f64 / TOTAL_CAPACITY as f64) * 1000.0).round() / 10.0;

        Ok(DashboardStats {
            cars_parked,
            motorcycles_parked,
            available_spots,
            today_revenue,
            occupancy_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupancy_rate_rounding() {
        // 7 de 70 vagas = 10.0%
        let rate = ((7f64 / TOTAL_CAPACITY as f64) * 1000.0).round() / 10.0;
        assert_eq!(rate, 10.0);

        // 23 de 70 = 32.857% -> 32.9%
        let rate = ((23f64 / TOTAL_CAPACITY as f64) * 1000.0).round() / 10.0;
        assert_eq!(rate, 32.9);
    }
}
