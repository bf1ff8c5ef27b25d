use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entities::Wallet;
use crate::domain::error::CoreError;
use crate::domain::ports::WalletRepository;
use crate::domain::types::AssetTypeId;
use crate::infrastructure::persistence::models::WalletModel;

const UNIQUE_VIOLATION: &str = "23505";

/// `wallets` table, backed by PostgreSQL.
pub struct PostgresWalletRepository {
    pool: PgPool,
}

impl PostgresWalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WalletRepository for PostgresWalletRepository {
    async fn find(
        &self,
        user_id: &str,
        asset_type_id: AssetTypeId,
    ) -> Result<Option<Wallet>, CoreError> {
        let model = sqlx::query_as::<_, WalletModel>(
            r#"
            SELECT * FROM wallets
            WHERE user_id = $1 AND asset_type_id = $2
            "#,
        )
        .bind(user_id)
        .bind(asset_type_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::Internal(e.into()))?;

        Ok(model.map(Wallet::from))
    }

    /// Inserts a zero-balance wallet, or re-reads the one a concurrent
    /// caller just created under the same `(user_id, asset_type_id)`
    /// unique constraint (spec.md §4.2). An upsert would mask which branch
    /// happened; this keeps the unique-violation path observable and
    /// exercised, matching the locking idiom used by
    /// [`crate::infrastructure::persistence::ledger_store`].
    async fn acquire(
        &self,
        user_id: &str,
        asset_type_id: AssetTypeId,
        is_system: bool,
    ) -> Result<Wallet, CoreError> {
        let wallet = Wallet::new_zero_balance(user_id.to_string(), asset_type_id, is_system);

        let inserted = sqlx::query_as::<_, WalletModel>(
            r#"
            INSERT INTO wallets (id, user_id, asset_type_id, balance, is_system, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(wallet.id)
        .bind(&wallet.user_id)
        .bind(wallet.asset_type_id)
        .bind(wallet.balance)
        .bind(wallet.is_system)
        .bind(wallet.version)
        .bind(wallet.created_at)
        .bind(wallet.updated_at)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(model) => Ok(model.into()),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                self.find(user_id, asset_type_id)
                    .await?
                    .ok_or_else(|| {
                        CoreError::Internal(anyhow::anyhow!(
                            "unique violation on wallet insert but no row found on re-read"
                        ))
                    })
            }
            Err(e) => Err(CoreError::Internal(e.into())),
        }
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Wallet>, CoreError> {
        let models = sqlx::query_as::<_, WalletModel>(
            r#"
            SELECT * FROM wallets
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CoreError::Internal(e.into()))?;

        Ok(models.into_iter().map(Wallet::from).collect())
    }
}
