//! Operaciones de patio: entrada y salida de vehículos
//!
//! Entrada y salida son unidades atómicas: vehículo + vaga + histórico
//! se escriben en una sola transacción para que nunca quede un vehículo
//! insertado con la vaga sin reclamar (ni al revés).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::history::OperationKind;
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::models::vehicle::{Vehicle, VehicleStatus, VehicleType};
use crate::services::{fee_calculator, spot_allocator};
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::validation::{is_valid_plate, normalize_plate};

/// Resultado de registrar una entrada
#[derive(Debug, Clone)]
pub struct EntryResult {
    pub vehicle_id: Uuid,
    pub plate: String,
    pub spot_id: String,
    pub entry_time: DateTime<Utc>,
    /// Reserva activada por esta entrada, si había una confirmada
    pub activated_reservation_id: Option<Uuid>,
}

/// Resultado de procesar una salida
#[derive(Debug, Clone)]
pub struct ExitResult {
    pub plate: String,
    pub spot_id: String,
    pub duration_minutes: i64,
    pub fee: Decimal,
}

pub struct ParkingService {
    pool: PgPool,
}

impl ParkingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registrar la entrada de un vehículo: valida la placa, rechaza
    /// placas ya estacionadas, asigna la vaga libre de menor ordinal y
    /// activa la reserva confirmada de la placa si su ventana cubre el
    /// instante de entrada.
    pub async fn register_entry(
        &self,
        plate: &str,
        vehicle_type: VehicleType,
        model: &str,
        color: &str,
        owner_name: &str,
        owner_phone: Option<&str>,
    ) -> AppResult<EntryResult> {
        let plate = normalize_plate(plate);
        if !is_valid_plate(&plate) {
            return Err(validation_error("plate", "invalid Brazilian plate format"));
        }

        let entry_time = Utc::now();
        let vehicle_id = Uuid::new_v4();

        let mut tx = self.pool.begin().await?;

        let (already_parked,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE plate = $1 AND status = $2)",
        )
        .bind(&plate)
        .bind(VehicleStatus::Parked.as_str())
        .fetch_one(&mut *tx)
        .await?;

        if already_parked {
            return Err(AppError::DuplicateActiveVehicle(plate));
        }

        // Reserva confirmada de esta placa cuya ventana cubre ahora:
        // la entrada la activa y libera su pre-reserva de vaga
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE plate = $1
              AND status = $2
              AND reservation_time <= $3
              AND reservation_time + (duration_hours || ' hours')::interval >= $3
            ORDER BY reservation_time
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(&plate)
        .bind(ReservationStatus::Confirmed.as_str())
        .bind(entry_time)
        .fetch_optional(&mut *tx)
        .await?;

        let mut preferred_spot = None;
        if let Some(reservation) = &reservation {
            sqlx::query(
                "UPDATE parking_spots SET is_reserved = FALSE, reservation_id = NULL WHERE reservation_id = $1",
            )
            .bind(reservation.id)
            .execute(&mut *tx)
            .await?;

            // La vaga pre-reservada en la confirmación tiene prioridad,
            // siempre que el tipo del vehículo coincida con la reserva
            if reservation.vehicle_type == vehicle_type {
                if let Some(reserved_spot) = &reservation.spot_id {
                    if spot_allocator::claim_spot(&mut tx, reserved_spot, vehicle_id).await? {
                        preferred_spot = Some(reserved_spot.clone());
                    }
                }
            }
        }

        let spot_id = match preferred_spot {
            Some(spot_id) => spot_id,
            None => spot_allocator::allocate_in_tx(&mut tx, vehicle_type, vehicle_id).await?,
        };

        sqlx::query(
            r#"
            INSERT INTO vehicles
                (id, plate, vehicle_type, model, color, owner_name, owner_phone,
                 status, spot_id, entry_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(vehicle_id)
        .bind(&plate)
        .bind(vehicle_type.as_str())
        .bind(model)
        .bind(color)
        .bind(owner_name)
        .bind(owner_phone)
        .bind(VehicleStatus::Parked.as_str())
        .bind(&spot_id)
        .bind(entry_time)
        .execute(&mut *tx)
        .await?;

        let activated_reservation_id = if let Some(reservation) = &reservation {
            sqlx::query(
                "UPDATE reservations SET status = $2, vehicle_id = $3, spot_id = $4 WHERE id = $1",
            )
            .bind(reservation.id)
            .bind(ReservationStatus::Active.as_str())
            .bind(vehicle_id)
            .bind(&spot_id)
            .execute(&mut *tx)
            .await?;

            append_history_in_tx(
                &mut tx,
                OperationKind::ReservationActivated,
                Some(&plate),
                Some(&spot_id),
                None,
                json!({ "reservation_id": reservation.id, "vehicle_id": vehicle_id }),
            )
            .await?;

            Some(reservation.id)
        } else {
            None
        };

        append_history_in_tx(
            &mut tx,
            OperationKind::Entry,
            Some(&plate),
            Some(&spot_id),
            None,
            json!({
                "vehicle_id": vehicle_id,
                "vehicle_type": vehicle_type.as_str(),
                "model": model,
                "color": color,
                "owner_name": owner_name,
            }),
        )
        .await?;

        tx.commit().await?;

        tracing::info!("🚗 Entrada registrada: placa {} en vaga {}", plate, spot_id);

        Ok(EntryResult {
            vehicle_id,
            plate,
            spot_id,
            entry_time,
            activated_reservation_id,
        })
    }

    /// Procesar la salida: cierra la estadía exactamente una vez,
    /// calcula duración y tarifa, y libera la vaga - todo en una
    /// transacción.
    pub async fn process_exit(&self, vehicle_id: Uuid) -> AppResult<ExitResult> {
        let mut tx = self.pool.begin().await?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE id = $1 AND status = $2 FOR UPDATE",
        )
        .bind(vehicle_id)
        .bind(VehicleStatus::Parked.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Parked vehicle with id '{}' not found", vehicle_id))
        })?;

        let exit_time = Utc::now();
        let duration_minutes = fee_calculator::elapsed_minutes(vehicle.entry_time, exit_time);
        let fee = fee_calculator::compute_fee(vehicle.entry_time, exit_time, vehicle.vehicle_type);

        sqlx::query(
            r#"
            UPDATE vehicles
            SET status = $2, exit_time = $3, duration_minutes = $4, fee = $5
            WHERE id = $1
            "#,
        )
        .bind(vehicle_id)
        .bind(VehicleStatus::Exited.as_str())
        .bind(exit_time)
        .bind(duration_minutes)
        .bind(fee)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE parking_spots SET is_occupied = FALSE, vehicle_id = NULL WHERE id = $1",
        )
        .bind(&vehicle.spot_id)
        .execute(&mut *tx)
        .await?;

        append_history_in_tx(
            &mut tx,
            OperationKind::Exit,
            Some(&vehicle.plate),
            Some(&vehicle.spot_id),
            Some(fee),
            json!({
                "vehicle_id": vehicle_id,
                "duration_minutes": duration_minutes,
                "entry_time": vehicle.entry_time,
                "exit_time": exit_time,
            }),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            "🏁 Salida procesada: placa {} liberó {} ({} min, R$ {})",
            vehicle.plate,
            vehicle.spot_id,
            duration_minutes,
            fee
        );

        Ok(ExitResult {
            plate: vehicle.plate,
            spot_id: vehicle.spot_id,
            duration_minutes,
            fee,
        })
    }
}

/// Insertar una entrada de histórico dentro de la transacción en curso
async fn append_history_in_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    operation: OperationKind,
    plate: Option<&str>,
    spot_id: Option<&str>,
    amount: Option<Decimal>,
    details: serde_json::Value,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO operation_history (id, operation, occurred_at, plate, spot_id, amount, details)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(operation.as_str())
    .bind(Utc::now())
    .bind(plate)
    .bind(spot_id)
    .bind(amount)
    .bind(details)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
