//! Repositorio de vagas
//!
//! Las 70 vagas existen desde la inicialización; acá solo se leen y se
//! mutan sus flags. La sobreescritura masiva de la sincronización vive
//! en el servicio de asignación.

use sqlx::PgPool;

use crate::models::spot::ParkingSpot;
use crate::models::vehicle::VehicleType;
use crate::utils::errors::AppResult;

pub struct SpotRepository {
    pool: PgPool,
}

impl SpotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> AppResult<Vec<ParkingSpot>> {
        let spots =
            sqlx::query_as::<_, ParkingSpot>("SELECT * FROM parking_spots ORDER BY spot_type, id")
                .fetch_all(&self.pool)
                .await?;

        Ok(spots)
    }

    pub async fn count_free(&self, vehicle_type: VehicleType) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM parking_spots WHERE spot_type = $1 AND is_occupied = FALSE",
        )
        .bind(vehicle_type.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Pre-reservar la vaga libre de menor ordinal para una reserva
    /// confirmada. El UPDATE condicional evita pisar una vaga que otra
    /// confirmación concurrente acaba de tomar. Devuelve None cuando no
    /// queda vaga libre del tipo (la entrada asignará normalmente).
    pub async fn reserve_first_free(
        &self,
        vehicle_type: VehicleType,
        reservation_id: uuid::Uuid,
    ) -> AppResult<Option<String>> {
        let reserved: Option<(String,)> = sqlx::query_as(
            r#"
            UPDATE parking_spots
            SET is_reserved = TRUE, reservation_id = $2
            WHERE id = (
                SELECT id FROM parking_spots
                WHERE spot_type = $1 AND is_occupied = FALSE AND is_reserved = FALSE
                ORDER BY id
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id
            "#,
        )
        .bind(vehicle_type.as_str())
        .bind(reservation_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reserved.map(|(id,)| id))
    }

    /// Limpiar la pre-reserva de una vaga (cancelación de reserva)
    pub async fn clear_reservation(&self, reservation_id: uuid::Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE parking_spots SET is_reserved = FALSE, reservation_id = NULL WHERE reservation_id = $1",
        )
        .bind(reservation_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
