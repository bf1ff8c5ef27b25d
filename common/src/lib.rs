//! Shared identifier newtypes used across the wallet service's layers.
//!
//! Kept in their own crate so persistence models, domain entities, and API
//! DTOs all refer to the same wrapped-`Uuid` types instead of passing bare
//! `Uuid`s around and relying on argument order to keep them straight.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
        )]
        #[sqlx(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_newtype!(AssetTypeId);
uuid_newtype!(WalletId);
uuid_newtype!(TransactionId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtypes_sort_by_inner_uuid() {
        let a = WalletId(Uuid::nil());
        let b = WalletId::new();
        assert!(a < b);
    }

    #[test]
    fn display_matches_inner_uuid() {
        let id = AssetTypeId::new();
        assert_eq!(id.to_string(), id.0.to_string());
    }
}
