use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::entities::{Transaction, TransactionKind, TransactionStatus, Wallet};
use crate::domain::types::{TransactionId, WalletId};

#[derive(Debug, Deserialize, ToSchema)]
pub struct TopupRequest {
    pub user_id: String,
    pub asset_type_code: String,
    pub amount: Decimal,
    pub payment_reference: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BonusRequest {
    pub user_id: String,
    pub asset_type_code: String,
    pub amount: Decimal,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SpendRequest {
    pub user_id: String,
    pub asset_type_code: String,
    pub amount: Decimal,
    pub item_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HistoryQuery {
    pub asset_type_code: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BalanceQuery {
    pub asset_type_code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionResponse {
    #[schema(value_type = Uuid)]
    pub transaction_id: TransactionId,
    pub transaction_type: TransactionKind,
    pub status: TransactionStatus,
    #[schema(value_type = Uuid)]
    pub from_wallet_id: WalletId,
    #[schema(value_type = Uuid)]
    pub to_wallet_id: WalletId,
    pub amount: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            transaction_id: t.id,
            transaction_type: t.kind,
            status: t.status,
            from_wallet_id: t.from_wallet_id,
            to_wallet_id: t.to_wallet_id,
            amount: t.amount,
            description: t.description,
            created_at: t.created_at,
            completed_at: t.completed_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WalletBalanceResponse {
    #[schema(value_type = Uuid)]
    pub wallet_id: WalletId,
    pub user_id: String,
    pub asset_type_code: String,
    pub balance: Decimal,
    pub is_system: bool,
    pub updated_at: DateTime<Utc>,
}

impl WalletBalanceResponse {
    pub fn new(wallet: Wallet, asset_type_code: String) -> Self {
        Self {
            wallet_id: wallet.id,
            user_id: wallet.user_id,
            asset_type_code,
            balance: wallet.balance,
            is_system: wallet.is_system,
            updated_at: wallet.updated_at,
        }
    }
}
