use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::entities::{SystemRole, Transaction, TransactionKind};
use crate::domain::error::CoreError;
use crate::domain::ports::{AssetRepository, IdempotencyRepository, LedgerStore, WalletRepository};
use crate::domain::posting::Posting;
use crate::domain::types::AssetTypeId;

/// Who one side of a transfer moves value to or from (spec.md §4.5).
///
/// A `User` wallet is lazily created only when `create_if_missing` is set;
/// `spend` needs the wallet to already exist, the other operations don't
/// care. A `System` wallet is always lazily created — system accounts are
/// unbounded sources/sinks and never fail to "exist".
#[derive(Debug, Clone)]
pub enum Party {
    User { user_id: String, create_if_missing: bool },
    System(SystemRole),
}

/// One transfer request, asset-code addressed rather than wallet-id
/// addressed — the engine resolves both ends itself (spec.md §4.4).
#[derive(Debug, Clone)]
pub struct EngineRequest {
    pub asset_code: String,
    pub from: Party,
    pub to: Party,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub meta_data: Option<String>,
    pub idempotency_key: String,
    pub request_path: String,
    pub request_method: String,
    pub success_status: i32,
}

const MAX_USER_ID_LEN: usize = 100;
const MAX_ASSET_CODE_LEN: usize = 50;
const MAX_IDEMPOTENCY_KEY_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 500;

impl EngineRequest {
    /// Field/amount constraints enforced at the adapter boundary before the
    /// core is entered (spec.md §9), so a malformed request fails fast with
    /// `CoreError::Validation` instead of surfacing as a Postgres truncation
    /// error once it reaches a column with a length limit, and instead of
    /// leaving a lazily-created wallet row behind as a side effect.
    fn validate_shape(&self) -> Result<(), CoreError> {
        if self.amount <= Decimal::ZERO {
            return Err(CoreError::Validation(
                "amount must be strictly greater than zero".into(),
            ));
        }
        if self.amount.scale() > 2 {
            return Err(CoreError::Validation(
                "amount must have at most two fractional digits".into(),
            ));
        }
        if self.asset_code.is_empty() || self.asset_code.chars().count() > MAX_ASSET_CODE_LEN {
            return Err(CoreError::Validation(format!(
                "asset_code must be 1-{MAX_ASSET_CODE_LEN} characters"
            )));
        }
        if self.idempotency_key.is_empty() || self.idempotency_key.chars().count() > MAX_IDEMPOTENCY_KEY_LEN {
            return Err(CoreError::Validation(format!(
                "idempotency_key must be 1-{MAX_IDEMPOTENCY_KEY_LEN} characters"
            )));
        }
        for party in [&self.from, &self.to] {
            if let Party::User { user_id, .. } = party {
                if user_id.is_empty() || user_id.chars().count() > MAX_USER_ID_LEN {
                    return Err(CoreError::Validation(format!(
                        "user_id must be 1-{MAX_USER_ID_LEN} characters"
                    )));
                }
            }
        }
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(CoreError::Validation(format!(
                    "description must be at most {MAX_DESCRIPTION_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}

/// Orchestrates one value movement: idempotency short-circuit, asset and
/// wallet resolution, then handoff to [`LedgerStore::post`] for the locked,
/// atomic write. This is the one place spec.md §4.4's twelve steps are
/// stitched together; the locking and posting themselves live behind
/// `LedgerStore` so this type stays unit-testable against mocks.
#[derive(Clone)]
pub struct TransferEngine {
    asset_repo: Arc<dyn AssetRepository>,
    wallet_repo: Arc<dyn WalletRepository>,
    idempotency_repo: Arc<dyn IdempotencyRepository>,
    ledger_store: Arc<dyn LedgerStore>,
}

impl TransferEngine {
    pub fn new(
        asset_repo: Arc<dyn AssetRepository>,
        wallet_repo: Arc<dyn WalletRepository>,
        idempotency_repo: Arc<dyn IdempotencyRepository>,
        ledger_store: Arc<dyn LedgerStore>,
    ) -> Self {
        Self {
            asset_repo,
            wallet_repo,
            idempotency_repo,
            ledger_store,
        }
    }

    #[tracing::instrument(name = "TransferEngine::execute", skip(self, request), fields(idempotency_key = %request.idempotency_key))]
    pub async fn execute(&self, request: EngineRequest) -> Result<Transaction, CoreError> {
        if let Some(cached) = self.idempotency_repo.lookup(&request.idempotency_key).await? {
            return decode_cached_transaction(&cached.response_body);
        }

        request.validate_shape()?;

        let asset = self.asset_repo.resolve(&request.asset_code).await?;

        let from_wallet = self.resolve_party(&request.from, asset.id, &asset.code).await?;
        let to_wallet = self.resolve_party(&request.to, asset.id, &asset.code).await?;

        crate::domain::entities::Transaction::validate(from_wallet.id, to_wallet.id, request.amount)?;

        let posting = Posting {
            from_wallet_id: from_wallet.id,
            to_wallet_id: to_wallet.id,
            from_is_system: from_wallet.is_system,
            asset_type_id: asset.id,
            amount: request.amount,
            kind: request.kind,
            idempotency_key: request.idempotency_key.clone(),
            description: request.description,
            meta_data: request.meta_data,
            request_path: request.request_path,
            request_method: request.request_method,
            success_status: request.success_status,
        };

        match self.ledger_store.post(posting).await {
            Ok(transaction) => Ok(transaction),
            Err(CoreError::DuplicateIdempotencyRace) => {
                let winner = self
                    .idempotency_repo
                    .lookup(&request.idempotency_key)
                    .await?
                    .ok_or_else(|| {
                        CoreError::Internal(anyhow::anyhow!(
                            "lost idempotency race but no winning record found on replay"
                        ))
                    })?;
                decode_cached_transaction(&winner.response_body)
            }
            Err(other) => Err(other),
        }
    }

    async fn resolve_party(
        &self,
        party: &Party,
        asset_type_id: AssetTypeId,
        asset_code: &str,
    ) -> Result<crate::domain::entities::Wallet, CoreError> {
        match party {
            Party::User { user_id, create_if_missing: true } => {
                self.wallet_repo.acquire(user_id, asset_type_id, false).await
            }
            Party::User { user_id, create_if_missing: false } => self
                .wallet_repo
                .find(user_id, asset_type_id)
                .await?
                .ok_or_else(|| CoreError::WalletNotFound(user_id.clone())),
            Party::System(role) => {
                self.wallet_repo
                    .acquire(&role.wallet_user_id(asset_code), asset_type_id, true)
                    .await
            }
        }
    }
}

fn decode_cached_transaction(body: &str) -> Result<Transaction, CoreError> {
    serde_json::from_str(body).map_err(|e| CoreError::Internal(e.into()))
}
