//! Repositorio del histórico de operaciones
//!
//! Append-only: el core solo inserta, reporting solo lee.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::history::{OperationHistoryEntry, OperationKind};
use crate::utils::errors::AppResult;

pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn append(
        &self,
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
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list(&self, limit: i64) -> AppResult<Vec<OperationHistoryEntry>> {
        let entries = sqlx::query_as::<_, OperationHistoryEntry>(
            "SELECT * FROM operation_history ORDER BY occurred_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
