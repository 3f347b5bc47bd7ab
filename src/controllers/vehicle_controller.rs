use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::{
    EntryResponse, ExitResponse, RegisterEntryRequest, VehicleFilters, VehicleResponse,
};
use crate::models::vehicle::VehicleStatus;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::fee_calculator;
use crate::services::parking_service::ParkingService;
use crate::utils::errors::{not_found_error, AppError};

pub struct VehicleController {
    service: ParkingService,
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: ParkingService::new(pool.clone()),
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn register_entry(
        &self,
        request: RegisterEntryRequest,
    ) -> Result<ApiResponse<EntryResponse>, AppError> {
        request.validate()?;

        let result = self
            .service
            .register_entry(
                &request.plate,
                request.vehicle_type,
                &request.model,
                &request.color,
                &request.owner_name,
                request.owner_phone.as_deref(),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            result.into(),
            "Entrada registrada exitosamente".to_string(),
        ))
    }

    pub async fn process_exit(&self, id: Uuid) -> Result<ApiResponse<ExitResponse>, AppError> {
        let result = self.service.process_exit(id).await?;

        Ok(ApiResponse::success_with_message(
            result.into(),
            "Salida procesada exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        // Tarifa estimada solo mientras sigue estacionado
        let estimated_fee = (vehicle.status == VehicleStatus::Parked)
            .then(|| fee_calculator::estimate_fee(vehicle.entry_time, vehicle.vehicle_type));

        Ok(VehicleResponse::from_vehicle(vehicle, estimated_fee))
    }

    pub async fn list(&self, filters: VehicleFilters) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.list_by_status(filters.status).await?;

        let response = vehicles
            .into_iter()
            .map(|v| {
                let estimated_fee = (v.status == VehicleStatus::Parked)
                    .then(|| fee_calculator::estimate_fee(v.entry_time, v.vehicle_type));
                VehicleResponse::from_vehicle(v, estimated_fee)
            })
            .collect();

        Ok(response)
    }
}
