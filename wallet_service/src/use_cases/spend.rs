use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;

use crate::domain::entities::{SystemRole, Transaction, TransactionKind};
use crate::domain::error::CoreError;
use crate::use_cases::transfer_engine::{EngineRequest, Party, TransferEngine};

/// Moves value from a user's wallet into the revenue system wallet.
///
/// Unlike `topup`/`bonus`, this does not lazily create the user's wallet:
/// spending requires an existing balance to spend from (matches the
/// original `spend_credits` behavior, spec.md §4.5).
#[derive(Clone)]
pub struct SpendUseCase {
    engine: Arc<TransferEngine>,
}

impl SpendUseCase {
    pub fn new(engine: Arc<TransferEngine>) -> Self {
        Self { engine }
    }

    #[tracing::instrument(name = "SpendUseCase::execute", skip(self, description, item_id))]
    pub async fn execute(
        &self,
        user_id: String,
        asset_code: String,
        amount: Decimal,
        idempotency_key: String,
        description: Option<String>,
        item_id: Option<String>,
    ) -> Result<Transaction, CoreError> {
        let meta_data = json!({
            "item_id": item_id,
            "flow": "spend",
        })
        .to_string();

        self.engine
            .execute(EngineRequest {
                asset_code,
                from: Party::User { user_id, create_if_missing: false },
                to: Party::System(SystemRole::Revenue),
                amount,
                kind: TransactionKind::Spend,
                description,
                meta_data: Some(meta_data),
                idempotency_key,
                request_path: "/api/v1/wallets/spend".to_string(),
                request_method: "POST".to_string(),
                success_status: 201,
            })
            .await
    }
}
