use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::entities::IdempotencyRecord;
use crate::domain::error::CoreError;
use crate::domain::ports::IdempotencyRepository;
use crate::infrastructure::persistence::models::IdempotencyRecordModel;

/// `idempotency_logs` table, backed by PostgreSQL.
///
/// Only reads; the write path is part of the single locked transaction in
/// [`crate::infrastructure::persistence::ledger_store::PostgresLedgerStore`]
/// so a crash between "post the transfer" and "record the key" can't happen.
pub struct PostgresIdempotencyRepository {
    pool: PgPool,
}

impl PostgresIdempotencyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdempotencyRepository for PostgresIdempotencyRepository {
    async fn lookup(&self, key: &str) -> Result<Option<IdempotencyRecord>, CoreError> {
        let model = sqlx::query_as::<_, IdempotencyRecordModel>(
            r#"
            SELECT * FROM idempotency_logs
            WHERE idempotency_key = $1 AND expires_at > $2
            "#,
        )
        .bind(key)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::Internal(e.into()))?;

        Ok(model.map(IdempotencyRecord::from))
    }
}
