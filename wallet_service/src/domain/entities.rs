use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::error::CoreError;
use crate::domain::types::{AssetTypeId, TransactionId, WalletId};

/// A catalogued unit of value (e.g. `GOLD_COIN`, `DIAMOND`).
///
/// `code` is unique and immutable once a wallet or transaction references
/// it; only `is_active` assets may be named in new transactions (enforced
/// by the asset repository, not here).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetType {
    #[schema(value_type = Uuid)]
    pub id: AssetTypeId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The role a system wallet plays in the operations façade (§4.5).
///
/// System wallets are named by convention (`SYSTEM_TREASURY_<code>`, ...)
/// and are not subject to the non-negative-balance invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemRole {
    Treasury,
    BonusPool,
    Revenue,
}

impl SystemRole {
    /// The conventional `user_id` a system wallet is keyed under for a given asset code.
    pub fn wallet_user_id(&self, asset_code: &str) -> String {
        match self {
            SystemRole::Treasury => format!("SYSTEM_TREASURY_{asset_code}"),
            SystemRole::BonusPool => format!("SYSTEM_BONUS_POOL_{asset_code}"),
            SystemRole::Revenue => format!("SYSTEM_REVENUE_{asset_code}"),
        }
    }
}

/// A balance of one asset, owned by one actor (user or system role).
///
/// `(user_id, asset_type_id)` is unique. Non-system wallets must never be
/// observed with `balance < 0` outside of an in-flight transaction; system
/// wallets are unbounded sources/sinks and are exempt. `balance` and
/// `version` are mutated only inside a `TransferEngine` commit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Wallet {
    #[schema(value_type = Uuid)]
    pub id: WalletId,
    pub user_id: String,
    #[schema(value_type = Uuid)]
    pub asset_type_id: AssetTypeId,
    pub balance: Decimal,
    pub is_system: bool,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Builds a brand-new zero-balance wallet, as `WalletRepository::acquire` does on first reference.
    pub fn new_zero_balance(user_id: String, asset_type_id: AssetTypeId, is_system: bool) -> Self {
        let now = Utc::now();
        Self {
            id: WalletId::new(),
            user_id,
            asset_type_id,
            balance: Decimal::ZERO,
            is_system,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The kind of value movement a [`Transaction`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Topup,
    Bonus,
    Spend,
    Refund,
    Adjustment,
}

/// Lifecycle state of a [`Transaction`].
///
/// `RolledBack` is reserved for a future compensating-transaction flow and
/// is never produced by `topup`/`bonus`/`spend` (spec.md §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    RolledBack,
}

/// One value movement between two wallets.
///
/// `id` doubles as the externally opaque, UUID-shaped transaction
/// identifier: both are the same freshly generated UUIDv4, so there is no
/// separate surrogate/external pair to keep in sync.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    #[schema(value_type = Uuid)]
    pub id: TransactionId,
    pub idempotency_key: String,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    #[schema(value_type = Uuid)]
    pub from_wallet_id: WalletId,
    #[schema(value_type = Uuid)]
    pub to_wallet_id: WalletId,
    #[schema(value_type = Uuid)]
    pub asset_type_id: AssetTypeId,
    pub amount: Decimal,
    pub description: Option<String>,
    pub meta_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Validates the shape invariants from spec.md §3 before a transaction is persisted.
    pub fn validate(
        from_wallet_id: WalletId,
        to_wallet_id: WalletId,
        amount: Decimal,
    ) -> Result<(), CoreError> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::Validation(
                "amount must be strictly greater than zero".into(),
            ));
        }
        if amount.scale() > 2 {
            return Err(CoreError::Validation(
                "amount must have at most two fractional digits".into(),
            ));
        }
        if from_wallet_id == to_wallet_id {
            return Err(CoreError::Validation(
                "from_wallet_id and to_wallet_id must differ".into(),
            ));
        }
        Ok(())
    }
}

/// One side of a double-entry posting. Append-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "ledger_entry_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerEntryKind {
    Debit,
    Credit,
}

/// A single signed posting against one wallet.
///
/// Exactly two entries exist per completed [`Transaction`]: a DEBIT on the
/// from-wallet with `amount = -A` and a CREDIT on the to-wallet with
/// `amount = +A`. `balance_after` is the wallet's balance immediately after
/// this posting.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LedgerEntry {
    pub id: i64,
    #[schema(value_type = Uuid)]
    pub transaction_id: TransactionId,
    #[schema(value_type = Uuid)]
    pub wallet_id: WalletId,
    pub kind: LedgerEntryKind,
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Builds the DEBIT/CREDIT pair for one posting (spec.md §4.4 step 9).
    /// `id` is left at `0`; the database assigns the real value on insert.
    /// Kept as one pure function so the double-entry symmetry (P3: equal
    /// absolute amounts, opposite sign, one of each kind) is asserted in one
    /// place instead of duplicated across the two insert statements.
    pub fn debit_and_credit(
        transaction_id: TransactionId,
        from_wallet_id: WalletId,
        to_wallet_id: WalletId,
        amount: Decimal,
        from_balance_after: Decimal,
        to_balance_after: Decimal,
        created_at: DateTime<Utc>,
    ) -> (LedgerEntry, LedgerEntry) {
        let debit = LedgerEntry {
            id: 0,
            transaction_id,
            wallet_id: from_wallet_id,
            kind: LedgerEntryKind::Debit,
            amount: -amount,
            balance_after: from_balance_after,
            created_at,
        };
        let credit = LedgerEntry {
            id: 0,
            transaction_id,
            wallet_id: to_wallet_id,
            kind: LedgerEntryKind::Credit,
            amount,
            balance_after: to_balance_after,
            created_at,
        };
        (debit, credit)
    }
}

/// The idempotency replay cache record (spec.md §3, §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    pub idempotency_key: String,
    pub request_path: String,
    pub request_method: String,
    pub response_status: i32,
    pub response_body: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn validate_rejects_zero_amount() {
        let err = Transaction::validate(WalletId::new(), WalletId::new(), Decimal::ZERO);
        assert!(matches!(err, Err(CoreError::Validation(_))));
    }

    #[test]
    fn validate_rejects_more_than_two_fractional_digits() {
        let err = Transaction::validate(WalletId::new(), WalletId::new(), dec!(1.005));
        assert!(matches!(err, Err(CoreError::Validation(_))));
    }

    #[test]
    fn validate_rejects_same_wallet() {
        let wallet = WalletId::new();
        let err = Transaction::validate(wallet, wallet, dec!(10.00));
        assert!(matches!(err, Err(CoreError::Validation(_))));
    }

    #[test]
    fn validate_accepts_positive_two_decimal_amount() {
        let err = Transaction::validate(WalletId::new(), WalletId::new(), dec!(10.00));
        assert!(err.is_ok());
    }

    #[rstest::rstest]
    #[case(TransactionKind::Topup, dec!(10.00))]
    #[case(TransactionKind::Bonus, dec!(0.01))]
    #[case(TransactionKind::Spend, dec!(999999.99))]
    #[case(TransactionKind::Refund, dec!(1.50))]
    fn debit_and_credit_are_symmetric_opposite_sign_single_pair(
        #[case] _kind: TransactionKind,
        #[case] amount: Decimal,
    ) {
        let transaction_id = common::TransactionId::new();
        let from = WalletId::new();
        let to = WalletId::new();
        let now = Utc::now();

        let (debit, credit) =
            LedgerEntry::debit_and_credit(transaction_id, from, to, amount, dec!(0.00), amount, now);

        assert_eq!(debit.kind, LedgerEntryKind::Debit);
        assert_eq!(credit.kind, LedgerEntryKind::Credit);
        assert_eq!(debit.wallet_id, from);
        assert_eq!(credit.wallet_id, to);
        assert_eq!(debit.amount, -amount);
        assert_eq!(credit.amount, amount);
        assert_eq!(debit.amount + credit.amount, Decimal::ZERO);
        assert_eq!(debit.amount.abs(), credit.amount.abs());
    }

    #[test]
    fn system_role_wallet_user_id_follows_naming_convention() {
        assert_eq!(
            SystemRole::Treasury.wallet_user_id("GOLD_COIN"),
            "SYSTEM_TREASURY_GOLD_COIN"
        );
        assert_eq!(
            SystemRole::BonusPool.wallet_user_id("GOLD_COIN"),
            "SYSTEM_BONUS_POOL_GOLD_COIN"
        );
        assert_eq!(
            SystemRole::Revenue.wallet_user_id("GOLD_COIN"),
            "SYSTEM_REVENUE_GOLD_COIN"
        );
    }
}
