use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entities::Transaction;
use crate::domain::error::CoreError;
use crate::domain::ports::TransactionRepository;
use crate::domain::types::WalletId;
use crate::infrastructure::persistence::models::TransactionModel;

/// `transactions` table read side, backed by PostgreSQL.
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn find_by_wallet_ids(
        &self,
        wallet_ids: &[WalletId],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, CoreError> {
        let ids: Vec<uuid::Uuid> = wallet_ids.iter().map(|id| id.into_inner()).collect();

        let models = sqlx::query_as::<_, TransactionModel>(
            r#"
            SELECT * FROM transactions
            WHERE from_wallet_id = ANY($1) OR to_wallet_id = ANY($1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(ids)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CoreError::Internal(e.into()))?;

        Ok(models.into_iter().map(Transaction::from).collect())
    }
}
