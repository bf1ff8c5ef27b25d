use rust_decimal::Decimal;

use crate::domain::entities::TransactionKind;
use crate::domain::types::{AssetTypeId, WalletId};

/// Everything [`crate::domain::ports::LedgerStore::post`] needs to perform
/// one atomic double-entry posting (spec.md §4.4 steps 4-12): locking both
/// wallets in ascending id order, validating, writing the transaction
/// header, the two ledger entries, and the idempotency record, all inside
/// one database transaction.
#[derive(Debug, Clone)]
pub struct Posting {
    pub from_wallet_id: WalletId,
    pub to_wallet_id: WalletId,
    pub from_is_system: bool,
    pub asset_type_id: AssetTypeId,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub idempotency_key: String,
    pub description: Option<String>,
    pub meta_data: Option<String>,
    pub request_path: String,
    pub request_method: String,
    /// HTTP status the caller will answer with on success; recorded
    /// alongside the serialized [`crate::domain::entities::Transaction`] so
    /// a replayed request gets back byte-for-byte what the original did.
    pub success_status: i32,
}
