//! Identifier newtypes for the wallet domain.
//!
//! Re-exported from the `common` crate so persistence models, domain
//! entities and API DTOs all share one definition instead of passing bare
//! `Uuid`s around and relying on argument order to keep them straight.

pub use common::{AssetTypeId, TransactionId, WalletId};
