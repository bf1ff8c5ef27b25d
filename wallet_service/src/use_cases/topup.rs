use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;

use crate::domain::entities::{SystemRole, Transaction, TransactionKind};
use crate::domain::error::CoreError;
use crate::use_cases::transfer_engine::{EngineRequest, Party, TransferEngine};

/// Moves value from the treasury system wallet into a user's wallet,
/// creating the user's wallet on first reference (spec.md §4.5).
#[derive(Clone)]
pub struct TopupUseCase {
    engine: Arc<TransferEngine>,
}

impl TopupUseCase {
    pub fn new(engine: Arc<TransferEngine>) -> Self {
        Self { engine }
    }

    #[tracing::instrument(name = "TopupUseCase::execute", skip(self, description, payment_reference))]
    pub async fn execute(
        &self,
        user_id: String,
        asset_code: String,
        amount: Decimal,
        idempotency_key: String,
        description: Option<String>,
        payment_reference: Option<String>,
    ) -> Result<Transaction, CoreError> {
        let meta_data = json!({
            "payment_reference": payment_reference,
            "flow": "topup",
        })
        .to_string();

        self.engine
            .execute(EngineRequest {
                asset_code,
                from: Party::System(SystemRole::Treasury),
                to: Party::User { user_id, create_if_missing: true },
                amount,
                kind: TransactionKind::Topup,
                description,
                meta_data: Some(meta_data),
                idempotency_key,
                request_path: "/api/v1/wallets/topup".to_string(),
                request_method: "POST".to_string(),
                success_status: 201,
            })
            .await
    }
}
