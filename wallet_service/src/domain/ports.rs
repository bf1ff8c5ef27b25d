//! Repository and gateway traits the use-case layer depends on.
//!
//! Each trait is `#[cfg_attr(test, automock)]` so use-cases can be unit
//! tested against an in-memory mock instead of a database (mirrors the
//! teacher's `domain/repository.rs`, split to the narrower grain
//! SPEC_FULL.md calls for). The one exception is [`LedgerStore`]: its
//! `post` implementation is the ascending-lock-order, single-transaction
//! posting protocol itself, so mocking it only exercises orchestration, not
//! the locking guarantee — real coverage of that lives in the integration
//! checklist in DESIGN.md.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::entities::{AssetType, IdempotencyRecord, Transaction, Wallet};
use crate::domain::error::CoreError;
use crate::domain::posting::Posting;
use crate::domain::types::{AssetTypeId, WalletId};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Resolves an asset code to its catalog row. Errors with
    /// [`CoreError::AssetNotFound`] if the code is unknown or inactive.
    async fn resolve(&self, code: &str) -> Result<AssetType, CoreError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Looks up a wallet by owner and asset, without creating one.
    async fn find(
        &self,
        user_id: &str,
        asset_type_id: AssetTypeId,
    ) -> Result<Option<Wallet>, CoreError>;

    /// Looks up a wallet by owner and asset, lazily creating a zero-balance
    /// one on first reference (spec.md §4.2).
    async fn acquire(
        &self,
        user_id: &str,
        asset_type_id: AssetTypeId,
        is_system: bool,
    ) -> Result<Wallet, CoreError>;

    /// All wallets (across every asset) owned by `user_id`, for the
    /// transaction-history query.
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Wallet>, CoreError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdempotencyRepository: Send + Sync {
    /// Looks up a previously recorded response for `key`, if one exists and
    /// has not expired.
    async fn lookup(&self, key: &str) -> Result<Option<IdempotencyRecord>, CoreError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Transactions touching any of `wallet_ids`, newest first, for the
    /// history query (spec.md §4.6).
    async fn find_by_wallet_ids(
        &self,
        wallet_ids: &[WalletId],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, CoreError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Performs one atomic double-entry posting: locks both wallets in
    /// ascending id order, validates presence and sufficient funds, writes
    /// the transaction header, the two ledger entries, and the idempotency
    /// record, and commits — or rolls everything back and surfaces the
    /// error (spec.md §4.4 steps 4-12).
    async fn post(&self, posting: Posting) -> Result<Transaction, CoreError>;
}
