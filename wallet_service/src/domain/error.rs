use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::types::WalletId;

/// The closed set of error values the core surfaces (spec.md §7).
///
/// `DuplicateIdempotencyRace` is never returned to a caller outside
/// `use_cases::transfer_engine` — it is caught there, the engine rolls back
/// and replays the winner's cached response instead of propagating it.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("asset not found or inactive: {0}")]
    AssetNotFound(String),

    /// A counterparty wallet does not exist and policy forbids creating it
    /// (e.g. `spend` against a user with no wallet). Carries whatever
    /// identified the missing wallet — a user id or a wallet id — for the
    /// error message.
    #[error("wallet not found: {0}")]
    WalletNotFound(String),

    #[error("insufficient funds in wallet {wallet_id}: available {available}, requested {requested}")]
    InsufficientFunds {
        wallet_id: WalletId,
        available: Decimal,
        requested: Decimal,
    },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),

    #[error("idempotency key race lost, replay required")]
    DuplicateIdempotencyRace,
}

impl CoreError {
    /// Client-class errors abort the current transaction and must not
    /// record an idempotency entry, so a corrected retry with the same key
    /// can still succeed (spec.md §7).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::AssetNotFound(_)
                | CoreError::WalletNotFound(_)
                | CoreError::InsufficientFunds { .. }
                | CoreError::Validation(_)
        )
    }
}
