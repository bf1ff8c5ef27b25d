use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;

use crate::domain::entities::{SystemRole, Transaction, TransactionKind};
use crate::domain::error::CoreError;
use crate::use_cases::transfer_engine::{EngineRequest, Party, TransferEngine};

/// Moves value from the bonus-pool system wallet into a user's wallet,
/// creating the user's wallet on first reference (spec.md §4.5).
#[derive(Clone)]
pub struct IssueBonusUseCase {
    engine: Arc<TransferEngine>,
}

impl IssueBonusUseCase {
    pub fn new(engine: Arc<TransferEngine>) -> Self {
        Self { engine }
    }

    #[tracing::instrument(name = "IssueBonusUseCase::execute", skip(self, reason))]
    pub async fn execute(
        &self,
        user_id: String,
        asset_code: String,
        amount: Decimal,
        idempotency_key: String,
        reason: Option<String>,
    ) -> Result<Transaction, CoreError> {
        let meta_data = json!({
            "bonus_reason": reason,
            "flow": "bonus",
        })
        .to_string();
        let description = reason.map(|r| format!("Bonus: {r}"));

        self.engine
            .execute(EngineRequest {
                asset_code,
                from: Party::System(SystemRole::BonusPool),
                to: Party::User { user_id, create_if_missing: true },
                amount,
                kind: TransactionKind::Bonus,
                description,
                meta_data: Some(meta_data),
                idempotency_key,
                request_path: "/api/v1/wallets/bonus".to_string(),
                request_method: "POST".to_string(),
                success_status: 201,
            })
            .await
    }
}
