//! Repositorio de reservas

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::reservation::{Reservation, ReservationStatus};
use crate::utils::errors::AppResult;

pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, reservation: &Reservation) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reservations
                (id, vehicle_type, plate, owner_name, owner_phone, reservation_time,
                 duration_hours, fee, status, created_at, payment_deadline,
                 payment_id, vehicle_id, spot_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(reservation.id)
        .bind(reservation.vehicle_type.as_str())
        .bind(&reservation.plate)
        .bind(&reservation.owner_name)
        .bind(&reservation.owner_phone)
        .bind(reservation.reservation_time)
        .bind(reservation.duration_hours)
        .bind(reservation.fee)
        .bind(reservation.status.as_str())
        .bind(reservation.created_at)
        .bind(reservation.payment_deadline)
        .bind(reservation.payment_id)
        .bind(reservation.vehicle_id)
        .bind(&reservation.spot_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        let reservation =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(reservation)
    }

    pub async fn list_all(&self) -> AppResult<Vec<Reservation>> {
        let reservations =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(reservations)
    }

    pub async fn update_status(&self, id: Uuid, status: ReservationStatus) -> AppResult<()> {
        sqlx::query("UPDATE reservations SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_payment(&self, id: Uuid, payment_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE reservations SET payment_id = $2 WHERE id = $1")
            .bind(id)
            .bind(payment_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_spot(&self, id: Uuid, spot_id: &str) -> AppResult<()> {
        sqlx::query("UPDATE reservations SET spot_id = $2 WHERE id = $1")
            .bind(id)
            .bind(spot_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Expirar en bloque las reservas pendientes con plazo de pago
    /// vencido. Devuelve las expiradas para registrar el histórico.
    pub async fn expire_overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<Reservation>> {
        let expired = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET status = $1
            WHERE status = $2 AND payment_deadline < $3
            RETURNING *
            "#,
        )
        .bind(ReservationStatus::Expired.as_str())
        .bind(ReservationStatus::PendingPayment.as_str())
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(expired)
    }

    /// Suma de tarifas de reservas confirmadas/activadas hoy, para el
    /// revenue del dashboard. El pago confirma la reserva, por eso se
    /// cuenta desde la confirmación y no desde la creación.
    pub async fn sum_confirmed_fees_since(&self, since: DateTime<Utc>) -> AppResult<rust_decimal::Decimal> {
        let (total,): (Option<rust_decimal::Decimal>,) = sqlx::query_as(
            r#"
            SELECT SUM(r.fee)
            FROM reservations r
            JOIN payments p ON p.id = r.payment_id
            WHERE r.status IN ($1, $2) AND p.completed_at >= $3
            "#,
        )
        .bind(ReservationStatus::Confirmed.as_str())
        .bind(ReservationStatus::Active.as_str())
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(rust_decimal::Decimal::ZERO))
    }
}
