//! Schema e inicialización
//!
//! Creación idempotente de las tablas y seed de las 70 vagas fijas
//! (50 autos + 20 motos). Las vagas se crean una sola vez y nunca se
//! borran; reiniciar el servicio no las duplica.

use sqlx::PgPool;

use crate::models::vehicle::VehicleType;
use crate::services::spot_allocator::{capacity, spot_id};
use crate::utils::errors::AppResult;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS vehicles (
    id UUID PRIMARY KEY,
    plate TEXT NOT NULL,
    vehicle_type TEXT NOT NULL,
    model TEXT NOT NULL,
    color TEXT NOT NULL,
    owner_name TEXT NOT NULL,
    owner_phone TEXT,
    status TEXT NOT NULL,
    spot_id TEXT NOT NULL,
    entry_time TIMESTAMPTZ NOT NULL,
    exit_time TIMESTAMPTZ,
    duration_minutes BIGINT,
    fee NUMERIC(12, 2)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_vehicles_parked_plate
    ON vehicles (plate) WHERE status = 'parked';

CREATE TABLE IF NOT EXISTS parking_spots (
    id TEXT PRIMARY KEY,
    spot_type TEXT NOT NULL,
    is_occupied BOOLEAN NOT NULL DEFAULT FALSE,
    is_reserved BOOLEAN NOT NULL DEFAULT FALSE,
    vehicle_id UUID,
    reservation_id UUID
);

CREATE TABLE IF NOT EXISTS reservations (
    id UUID PRIMARY KEY,
    vehicle_type TEXT NOT NULL,
    plate TEXT NOT NULL,
    owner_name TEXT NOT NULL,
    owner_phone TEXT,
    reservation_time TIMESTAMPTZ NOT NULL,
    duration_hours INTEGER NOT NULL,
    fee NUMERIC(12, 2) NOT NULL,
    status TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    payment_deadline TIMESTAMPTZ NOT NULL,
    payment_id UUID,
    vehicle_id UUID,
    spot_id TEXT
);

CREATE TABLE IF NOT EXISTS payments (
    id UUID PRIMARY KEY,
    gateway_payment_id TEXT NOT NULL,
    reservation_id UUID,
    vehicle_id UUID,
    amount NUMERIC(12, 2) NOT NULL,
    status TEXT NOT NULL,
    payment_method TEXT NOT NULL,
    payer_email TEXT NOT NULL,
    payer_name TEXT NOT NULL,
    payer_document TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    expires_at TIMESTAMPTZ,
    completed_at TIMESTAMPTZ
);

CREATE TABLE IF NOT EXISTS operation_history (
    id UUID PRIMARY KEY,
    operation TEXT NOT NULL,
    occurred_at TIMESTAMPTZ NOT NULL,
    plate TEXT,
    spot_id TEXT,
    amount NUMERIC(12, 2),
    details JSONB NOT NULL
);
"#;

/// Crear tablas y seedear las vagas fijas
pub async fn initialize(pool: &PgPool) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::raw_sql(CREATE_TABLES).execute(&mut *tx).await?;

    for vehicle_type in [VehicleType::Car, VehicleType::Motorcycle] {
        for ordinal in 1..=capacity(vehicle_type) {
            sqlx::query(
                r#"
                INSERT INTO parking_spots (id, spot_type, is_occupied, is_reserved)
                VALUES ($1, $2, FALSE, FALSE)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(spot_id(vehicle_type, ordinal))
            .bind(vehicle_type.as_str())
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    tracing::info!("🅿️  Schema inicializado: 50 vagas de auto + 20 de moto");

    Ok(())
}
