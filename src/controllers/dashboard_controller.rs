use sqlx::PgPool;

use crate::dto::dashboard_dto::{
    DashboardStatsResponse, HistoryEntryResponse, HistoryFilters, SpotResponse,
};
use crate::repositories::history_repository::HistoryRepository;
use crate::repositories::spot_repository::SpotRepository;
use crate::services::dashboard_service::DashboardService;
use crate::services::spot_allocator;
use crate::utils::errors::AppError;

const DEFAULT_HISTORY_LIMIT: i64 = 100;

pub struct DashboardController {
    pool: PgPool,
    service: DashboardService,
    spots: SpotRepository,
    history: HistoryRepository,
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: DashboardService::new(pool.clone()),
            spots: SpotRepository::new(pool.clone()),
            history: HistoryRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn stats(&self) -> Result<DashboardStatsResponse, AppError> {
        let stats = self.service.compute_stats().await?;
        Ok(stats.into())
    }

    /// Mapa de vagas: sincroniza primero para entregar un snapshot
    /// consistente con la tabla de vehículos
    pub async fn spot_map(&self) -> Result<Vec<SpotResponse>, AppError> {
        spot_allocator::synchronize(&self.pool).await?;

        let spots = self.spots.list_all().await?;
        Ok(spots.into_iter().map(Into::into).collect())
    }

    pub async fn history(
        &self,
        filters: HistoryFilters,
    ) -> Result<Vec<HistoryEntryResponse>, AppError> {
        let limit = filters.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 1000);
        let entries = self.history.list(limit).await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }
}
