use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::entities::{Transaction, TransactionStatus};
use crate::domain::error::CoreError;
use crate::domain::ports::LedgerStore;
use crate::domain::posting::Posting;
use crate::domain::types::TransactionId;
use crate::infrastructure::persistence::models::WalletModel;

const UNIQUE_VIOLATION: &str = "23505";

/// The locking, double-entry posting protocol itself (spec.md §4.4 steps
/// 4-12), backed by PostgreSQL.
///
/// Grounded on the wallet-lock-in-ascending-id-order idiom common to both
/// escrow/ledger services in the retrieval pack: open one transaction, lock
/// every wallet the posting touches with a single `SELECT ... FOR UPDATE`
/// ordered by id so two transfers sharing a wallet can never deadlock,
/// validate under lock, write the header + balances + entries, and commit.
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    #[tracing::instrument(name = "PostgresLedgerStore::post", skip(self, posting), fields(idempotency_key = %posting.idempotency_key))]
    async fn post(&self, posting: Posting) -> Result<Transaction, CoreError> {
        let mut ids = [posting.from_wallet_id, posting.to_wallet_id];
        ids.sort();
        let lock_ids: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();

        let mut tx = self.pool.begin().await.map_err(|e| CoreError::Internal(e.into()))?;

        let locked = sqlx::query_as::<_, WalletModel>(
            r#"
            SELECT * FROM wallets
            WHERE id = ANY($1)
            ORDER BY id ASC
            FOR UPDATE
            "#,
        )
        .bind(&lock_ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| CoreError::Internal(e.into()))?;

        let from = locked
            .iter()
            .find(|w| w.id == posting.from_wallet_id)
            .ok_or_else(|| CoreError::WalletNotFound(posting.from_wallet_id.to_string()))?;
        let to = locked
            .iter()
            .find(|w| w.id == posting.to_wallet_id)
            .ok_or_else(|| CoreError::WalletNotFound(posting.to_wallet_id.to_string()))?;

        if !from.is_system && from.balance < posting.amount {
            return Err(CoreError::InsufficientFunds {
                wallet_id: from.id,
                available: from.balance,
                requested: posting.amount,
            });
        }

        let new_from_balance = from.balance - posting.amount;
        let new_to_balance = to.balance + posting.amount;
        let now = Utc::now();
        let transaction_id = TransactionId::new();

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, idempotency_key, kind, status, from_wallet_id, to_wallet_id,
                asset_type_id, amount, description, meta_data, created_at, completed_at
            )
            VALUES ($1, $2, $3, 'PENDING', $4, $5, $6, $7, $8, $9, $10, NULL)
            "#,
        )
        .bind(transaction_id)
        .bind(&posting.idempotency_key)
        .bind(posting.kind)
        .bind(posting.from_wallet_id)
        .bind(posting.to_wallet_id)
        .bind(posting.asset_type_id)
        .bind(posting.amount)
        .bind(&posting.description)
        .bind(&posting.meta_data)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| CoreError::Internal(e.into()))?;

        sqlx::query("UPDATE wallets SET balance = $1, version = version + 1, updated_at = $2 WHERE id = $3")
            .bind(new_from_balance)
            .bind(now)
            .bind(from.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| CoreError::Internal(e.into()))?;

        sqlx::query("UPDATE wallets SET balance = $1, version = version + 1, updated_at = $2 WHERE id = $3")
            .bind(new_to_balance)
            .bind(now)
            .bind(to.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| CoreError::Internal(e.into()))?;

        let (debit, credit) = crate::domain::entities::LedgerEntry::debit_and_credit(
            transaction_id,
            from.id,
            to.id,
            posting.amount,
            new_from_balance,
            new_to_balance,
            now,
        );

        for entry in [&debit, &credit] {
            sqlx::query(
                r#"
                INSERT INTO ledger_entries (transaction_id, wallet_id, kind, amount, balance_after, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(entry.transaction_id)
            .bind(entry.wallet_id)
            .bind(entry.kind)
            .bind(entry.amount)
            .bind(entry.balance_after)
            .bind(entry.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| CoreError::Internal(e.into()))?;
        }

        sqlx::query("UPDATE transactions SET status = 'COMPLETED', completed_at = $1 WHERE id = $2")
            .bind(now)
            .bind(transaction_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| CoreError::Internal(e.into()))?;

        let transaction = Transaction {
            id: transaction_id,
            idempotency_key: posting.idempotency_key.clone(),
            kind: posting.kind,
            status: TransactionStatus::Completed,
            from_wallet_id: posting.from_wallet_id,
            to_wallet_id: posting.to_wallet_id,
            asset_type_id: posting.asset_type_id,
            amount: posting.amount,
            description: posting.description.clone(),
            meta_data: posting.meta_data.clone(),
            created_at: now,
            completed_at: Some(now),
        };
        let response_body = serde_json::to_string(&transaction).map_err(|e| CoreError::Internal(e.into()))?;

        let recorded = sqlx::query(
            r#"
            INSERT INTO idempotency_logs (
                idempotency_key, request_path, request_method, response_status, response_body, created_at, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $6 + INTERVAL '24 hours')
            "#,
        )
        .bind(&posting.idempotency_key)
        .bind(&posting.request_path)
        .bind(&posting.request_method)
        .bind(posting.success_status)
        .bind(&response_body)
        .bind(now)
        .execute(&mut *tx)
        .await;

        match recorded {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                // A concurrent caller with the same key committed first; our
                // writes above roll back when `tx` drops here uncommitted,
                // and the engine replays the winner's stored response.
                return Err(CoreError::DuplicateIdempotencyRace);
            }
            Err(e) => return Err(CoreError::Internal(e.into())),
        }

        tx.commit().await.map_err(|e| CoreError::Internal(e.into()))?;

        Ok(transaction)
    }
}
