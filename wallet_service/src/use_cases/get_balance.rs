use std::sync::Arc;

use crate::domain::entities::Wallet;
use crate::domain::error::CoreError;
use crate::domain::ports::{AssetRepository, WalletRepository};

/// Reads a user's balance for one asset.
///
/// Matches the original `get_wallet_balance` behavior of creating a
/// zero-balance wallet if the user has never been credited or debited in
/// this asset before — a quirk carried over deliberately rather than
/// fixed, see DESIGN.md.
#[derive(Clone)]
pub struct GetBalanceUseCase {
    asset_repo: Arc<dyn AssetRepository>,
    wallet_repo: Arc<dyn WalletRepository>,
}

impl GetBalanceUseCase {
    pub fn new(asset_repo: Arc<dyn AssetRepository>, wallet_repo: Arc<dyn WalletRepository>) -> Self {
        Self { asset_repo, wallet_repo }
    }

    #[tracing::instrument(name = "GetBalanceUseCase::execute", skip(self))]
    pub async fn execute(&self, user_id: &str, asset_code: &str) -> Result<Wallet, CoreError> {
        let asset = self.asset_repo.resolve(asset_code).await?;
        self.wallet_repo.acquire(user_id, asset.id, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AssetType;
    use crate::domain::ports::{MockAssetRepository, MockWalletRepository};
    use crate::domain::types::AssetTypeId;
    use chrono::Utc;

    #[tokio::test]
    async fn creates_a_zero_balance_wallet_on_first_read() {
        let asset = AssetType {
            id: AssetTypeId::new(),
            code: "GOLD_COIN".into(),
            name: "Gold Coin".into(),
            description: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut asset_repo = MockAssetRepository::new();
        let asset_clone = asset.clone();
        asset_repo.expect_resolve().times(1).returning(move |_| Ok(asset_clone.clone()));

        let mut wallet_repo = MockWalletRepository::new();
        let asset_id = asset.id;
        wallet_repo.expect_acquire().times(1).returning(move |user_id, asset_type_id, is_system| {
            assert_eq!(asset_type_id, asset_id);
            assert!(!is_system);
            Ok(crate::domain::entities::Wallet::new_zero_balance(
                user_id.to_string(),
                asset_type_id,
                is_system,
            ))
        });

        let use_case = GetBalanceUseCase::new(Arc::new(asset_repo), Arc::new(wallet_repo));
        let wallet = use_case.execute("user-1", "GOLD_COIN").await.unwrap();
        assert_eq!(wallet.user_id, "user-1");
        assert_eq!(wallet.balance, rust_decimal::Decimal::ZERO);
    }
}
