use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::domain::entities::{
    AssetType, IdempotencyRecord, LedgerEntry, LedgerEntryKind, Transaction, TransactionKind,
    TransactionStatus, Wallet,
};
use crate::domain::types::{AssetTypeId, TransactionId, WalletId};

/// Row shape of the `asset_types` table.
#[derive(Debug, FromRow)]
pub struct AssetTypeModel {
    pub id: AssetTypeId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AssetTypeModel> for AssetType {
    fn from(m: AssetTypeModel) -> Self {
        Self {
            id: m.id,
            code: m.code,
            name: m.name,
            description: m.description,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Row shape of the `wallets` table.
#[derive(Debug, FromRow)]
pub struct WalletModel {
    pub id: WalletId,
    pub user_id: String,
    pub asset_type_id: AssetTypeId,
    pub balance: Decimal,
    pub is_system: bool,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WalletModel> for Wallet {
    fn from(m: WalletModel) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            asset_type_id: m.asset_type_id,
            balance: m.balance,
            is_system: m.is_system,
            version: m.version,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Row shape of the `transactions` table.
#[derive(Debug, FromRow)]
pub struct TransactionModel {
    pub id: TransactionId,
    pub idempotency_key: String,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub from_wallet_id: WalletId,
    pub to_wallet_id: WalletId,
    pub asset_type_id: AssetTypeId,
    pub amount: Decimal,
    pub description: Option<String>,
    pub meta_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<TransactionModel> for Transaction {
    fn from(m: TransactionModel) -> Self {
        Self {
            id: m.id,
            idempotency_key: m.idempotency_key,
            kind: m.kind,
            status: m.status,
            from_wallet_id: m.from_wallet_id,
            to_wallet_id: m.to_wallet_id,
            asset_type_id: m.asset_type_id,
            amount: m.amount,
            description: m.description,
            meta_data: m.meta_data,
            created_at: m.created_at,
            completed_at: m.completed_at,
        }
    }
}

/// Row shape of the `ledger_entries` table.
#[derive(Debug, FromRow)]
pub struct LedgerEntryModel {
    pub id: i64,
    pub transaction_id: TransactionId,
    pub wallet_id: WalletId,
    pub kind: LedgerEntryKind,
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<LedgerEntryModel> for LedgerEntry {
    fn from(m: LedgerEntryModel) -> Self {
        Self {
            id: m.id,
            transaction_id: m.transaction_id,
            wallet_id: m.wallet_id,
            kind: m.kind,
            amount: m.amount,
            balance_after: m.balance_after,
            created_at: m.created_at,
        }
    }
}

/// Row shape of the `idempotency_logs` table.
#[derive(Debug, FromRow)]
pub struct IdempotencyRecordModel {
    pub idempotency_key: String,
    pub request_path: String,
    pub request_method: String,
    pub response_status: i32,
    pub response_body: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<IdempotencyRecordModel> for IdempotencyRecord {
    fn from(m: IdempotencyRecordModel) -> Self {
        Self {
            idempotency_key: m.idempotency_key,
            request_path: m.request_path,
            request_method: m.request_method,
            response_status: m.response_status,
            response_body: m.response_body,
            created_at: m.created_at,
            expires_at: m.expires_at,
        }
    }
}
