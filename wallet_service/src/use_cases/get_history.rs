use std::sync::Arc;

use crate::domain::entities::Transaction;
use crate::domain::error::CoreError;
use crate::domain::ports::{AssetRepository, TransactionRepository, WalletRepository};

const MAX_HISTORY_LIMIT: i64 = 100;

/// Lists a user's transaction history, optionally filtered to one asset,
/// newest first, paginated (spec.md §4.6). `limit` is capped at 100
/// regardless of what the caller asks for.
#[derive(Clone)]
pub struct GetHistoryUseCase {
    asset_repo: Arc<dyn AssetRepository>,
    wallet_repo: Arc<dyn WalletRepository>,
    transaction_repo: Arc<dyn TransactionRepository>,
}

impl GetHistoryUseCase {
    pub fn new(
        asset_repo: Arc<dyn AssetRepository>,
        wallet_repo: Arc<dyn WalletRepository>,
        transaction_repo: Arc<dyn TransactionRepository>,
    ) -> Self {
        Self { asset_repo, wallet_repo, transaction_repo }
    }

    #[tracing::instrument(name = "GetHistoryUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        user_id: &str,
        asset_code: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, CoreError> {
        let limit = limit.min(MAX_HISTORY_LIMIT);

        let wallet_ids = match asset_code {
            Some(code) => {
                let asset = self.asset_repo.resolve(code).await?;
                match self.wallet_repo.find(user_id, asset.id).await? {
                    Some(wallet) => vec![wallet.id],
                    None => return Ok(Vec::new()),
                }
            }
            None => {
                let wallets = self.wallet_repo.find_by_user(user_id).await?;
                if wallets.is_empty() {
                    return Ok(Vec::new());
                }
                wallets.iter().map(|w| w.id).collect()
            }
        };

        self.transaction_repo
            .find_by_wallet_ids(&wallet_ids, limit, offset)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AssetType;
    use crate::domain::ports::{MockAssetRepository, MockTransactionRepository, MockWalletRepository};
    use crate::domain::types::AssetTypeId;
    use chrono::Utc;

    fn test_asset() -> AssetType {
        AssetType {
            id: AssetTypeId::new(),
            code: "GOLD_COIN".into(),
            name: "Gold Coin".into(),
            description: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn returns_empty_history_without_querying_transactions_when_user_has_no_wallets() {
        let mut wallet_repo = MockWalletRepository::new();
        wallet_repo.expect_find_by_user().times(1).returning(|_| Ok(Vec::new()));

        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo.expect_find_by_wallet_ids().times(0);

        let use_case = GetHistoryUseCase::new(
            Arc::new(MockAssetRepository::new()),
            Arc::new(wallet_repo),
            Arc::new(transaction_repo),
        );
        let history = use_case.execute("user-1", None, 20, 0).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn filters_to_the_single_wallet_matching_the_requested_asset() {
        let asset = test_asset();
        let asset_id = asset.id;

        let mut asset_repo = MockAssetRepository::new();
        let asset_clone = asset.clone();
        asset_repo.expect_resolve().times(1).returning(move |_| Ok(asset_clone.clone()));

        let mut wallet_repo = MockWalletRepository::new();
        wallet_repo.expect_find_by_user().times(0);
        wallet_repo.expect_find().times(1).returning(move |user_id, queried_asset_id| {
            assert_eq!(queried_asset_id, asset_id);
            Ok(Some(crate::domain::entities::Wallet::new_zero_balance(
                user_id.to_string(),
                queried_asset_id,
                false,
            )))
        });

        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo
            .expect_find_by_wallet_ids()
            .withf(|ids, _, _| ids.len() == 1)
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        let use_case = GetHistoryUseCase::new(Arc::new(asset_repo), Arc::new(wallet_repo), Arc::new(transaction_repo));
        let history = use_case.execute("user-1", Some("GOLD_COIN"), 20, 0).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn clamps_limit_to_one_hundred() {
        let mut wallet_repo = MockWalletRepository::new();
        wallet_repo.expect_find_by_user().times(1).returning(|user_id| {
            Ok(vec![crate::domain::entities::Wallet::new_zero_balance(
                user_id.to_string(),
                AssetTypeId::new(),
                false,
            )])
        });

        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo
            .expect_find_by_wallet_ids()
            .withf(|_, limit, _| *limit == MAX_HISTORY_LIMIT)
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        let use_case = GetHistoryUseCase::new(
            Arc::new(MockAssetRepository::new()),
            Arc::new(wallet_repo),
            Arc::new(transaction_repo),
        );
        use_case.execute("user-1", None, 10_000, 0).await.unwrap();
    }
}
