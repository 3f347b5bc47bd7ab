//! Repositorio de pagos

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::payment::{Payment, PaymentStatus};
use crate::utils::errors::AppResult;

pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, payment: &Payment) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payments
                (id, gateway_payment_id, reservation_id, vehicle_id, amount, status,
                 payment_method, payer_email, payer_name, payer_document,
                 created_at, expires_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(payment.id)
        .bind(&payment.gateway_payment_id)
        .bind(payment.reservation_id)
        .bind(payment.vehicle_id)
        .bind(payment.amount)
        .bind(payment.status.as_str())
        .bind(payment.payment_method.as_str())
        .bind(&payment.payer_email)
        .bind(&payment.payer_name)
        .bind(&payment.payer_document)
        .bind(payment.created_at)
        .bind(payment.expires_at)
        .bind(payment.completed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        sqlx::query("UPDATE payments SET status = $2, completed_at = $3 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .bind(completed_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
