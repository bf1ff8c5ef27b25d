use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};

use crate::api::dto::{
    BalanceQuery, BonusRequest, HistoryQuery, SpendRequest, TopupRequest, TransactionResponse,
    WalletBalanceResponse,
};
use crate::api::error::ApiError;
use crate::api::response::ApiResponse;
use crate::use_cases::bonus::IssueBonusUseCase;
use crate::use_cases::get_balance::GetBalanceUseCase;
use crate::use_cases::get_history::GetHistoryUseCase;
use crate::use_cases::spend::SpendUseCase;
use crate::use_cases::topup::TopupUseCase;

/// Dependency bag injected into every handler via axum's shared state.
pub struct AppState {
    pub topup_use_case: TopupUseCase,
    pub bonus_use_case: IssueBonusUseCase,
    pub spend_use_case: SpendUseCase,
    pub get_balance_use_case: GetBalanceUseCase,
    pub get_history_use_case: GetHistoryUseCase,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/wallets/topup", post(topup_wallet))
        .route("/api/v1/wallets/bonus", post(issue_bonus))
        .route("/api/v1/wallets/spend", post(spend_credits))
        .route("/api/v1/wallets/{user_id}/balance", get(get_wallet_balance))
        .route("/api/v1/wallets/{user_id}/transactions", get(get_transaction_history))
        .with_state(state)
}

fn idempotency_key(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ApiError(crate::domain::error::CoreError::Validation(
                "missing required Idempotency-Key header".to_string(),
            ))
        })
}

/// Top-up a user's wallet from the system treasury (real-money purchase flow).
#[utoipa::path(
    post,
    path = "/api/v1/wallets/topup",
    request_body = TopupRequest,
    responses((status = 201, body = ApiResponse<TransactionResponse>)),
    tag = "wallets"
)]
pub async fn topup_wallet(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<TopupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ApiError> {
    let key = idempotency_key(&headers)?;
    let transaction = state
        .topup_use_case
        .execute(
            payload.user_id,
            payload.asset_type_code,
            payload.amount,
            key,
            payload.description,
            payload.payment_reference,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TransactionResponse::from(transaction))),
    ))
}

/// Issue free bonus credits to a user from the system bonus pool.
#[utoipa::path(
    post,
    path = "/api/v1/wallets/bonus",
    request_body = BonusRequest,
    responses((status = 201, body = ApiResponse<TransactionResponse>)),
    tag = "wallets"
)]
pub async fn issue_bonus(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<BonusRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ApiError> {
    let key = idempotency_key(&headers)?;
    let transaction = state
        .bonus_use_case
        .execute(payload.user_id, payload.asset_type_code, payload.amount, key, payload.reason)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TransactionResponse::from(transaction))),
    ))
}

/// Spend credits from a user's wallet into the system revenue account.
#[utoipa::path(
    post,
    path = "/api/v1/wallets/spend",
    request_body = SpendRequest,
    responses((status = 201, body = ApiResponse<TransactionResponse>)),
    tag = "wallets"
)]
pub async fn spend_credits(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SpendRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), ApiError> {
    let key = idempotency_key(&headers)?;
    let transaction = state
        .spend_use_case
        .execute(
            payload.user_id,
            payload.asset_type_code,
            payload.amount,
            key,
            payload.description,
            payload.item_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TransactionResponse::from(transaction))),
    ))
}

/// Read a user's balance for one asset.
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{user_id}/balance",
    responses((status = 200, body = ApiResponse<WalletBalanceResponse>)),
    tag = "wallets"
)]
pub async fn get_wallet_balance(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<ApiResponse<WalletBalanceResponse>>, ApiError> {
    let wallet = state
        .get_balance_use_case
        .execute(&user_id, &query.asset_type_code)
        .await?;

    Ok(Json(ApiResponse::success(WalletBalanceResponse::new(
        wallet,
        query.asset_type_code,
    ))))
}

/// List a user's transaction history, newest first, paginated.
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{user_id}/transactions",
    responses((status = 200, body = ApiResponse<Vec<TransactionResponse>>)),
    tag = "wallets"
)]
pub async fn get_transaction_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, ApiError> {
    let transactions = state
        .get_history_use_case
        .execute(&user_id, query.asset_type_code.as_deref(), query.limit, query.offset)
        .await?;

    Ok(Json(ApiResponse::success(
        transactions.into_iter().map(TransactionResponse::from).collect(),
    )))
}
