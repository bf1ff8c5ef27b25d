use std::sync::Arc;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use wallet_service::{
    api::{
        dto::{
            BalanceQuery, BonusRequest, HistoryQuery, SpendRequest, TopupRequest,
            TransactionResponse, WalletBalanceResponse,
        },
        http_routes::{routes, AppState},
        response::ApiResponse,
    },
    config::Settings,
    infrastructure::persistence::{
        asset_repository::PostgresAssetRepository, idempotency_repository::PostgresIdempotencyRepository,
        ledger_store::PostgresLedgerStore, transaction_repository::PostgresTransactionRepository,
        wallet_repository::PostgresWalletRepository,
    },
    use_cases::{
        bonus::IssueBonusUseCase, get_balance::GetBalanceUseCase, get_history::GetHistoryUseCase,
        spend::SpendUseCase, topup::TopupUseCase, transfer_engine::TransferEngine,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        wallet_service::api::http_routes::topup_wallet,
        wallet_service::api::http_routes::issue_bonus,
        wallet_service::api::http_routes::spend_credits,
        wallet_service::api::http_routes::get_wallet_balance,
        wallet_service::api::http_routes::get_transaction_history
    ),
    components(schemas(
        TopupRequest,
        BonusRequest,
        SpendRequest,
        HistoryQuery,
        BalanceQuery,
        TransactionResponse,
        WalletBalanceResponse,
        ApiResponse<TransactionResponse>,
        ApiResponse<WalletBalanceResponse>,
        ApiResponse<Vec<TransactionResponse>>
    ))
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load environment variables.
    dotenv().ok();
    let settings = Settings::from_env();

    // 2. Configure logging/tracing.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting {} v{}...", settings.app_name, settings.app_version);

    // 3. Connect to the database and run migrations.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    // 4. Instantiate infrastructure adapters.
    let asset_repo = Arc::new(PostgresAssetRepository::new(pool.clone()));
    let wallet_repo = Arc::new(PostgresWalletRepository::new(pool.clone()));
    let idempotency_repo = Arc::new(PostgresIdempotencyRepository::new(pool.clone()));
    let transaction_repo = Arc::new(PostgresTransactionRepository::new(pool.clone()));
    let ledger_store = Arc::new(PostgresLedgerStore::new(pool.clone()));

    // 5. Instantiate the transfer engine and the use cases that sit on top of it.
    let engine = Arc::new(TransferEngine::new(
        asset_repo.clone(),
        wallet_repo.clone(),
        idempotency_repo.clone(),
        ledger_store.clone(),
    ));

    let topup_use_case = TopupUseCase::new(engine.clone());
    let bonus_use_case = IssueBonusUseCase::new(engine.clone());
    let spend_use_case = SpendUseCase::new(engine.clone());
    let get_balance_use_case = GetBalanceUseCase::new(asset_repo.clone(), wallet_repo.clone());
    let get_history_use_case =
        GetHistoryUseCase::new(asset_repo.clone(), wallet_repo.clone(), transaction_repo.clone());

    // 6. Configure axum application state.
    let app_state = Arc::new(AppState {
        topup_use_case,
        bonus_use_case,
        spend_use_case,
        get_balance_use_case,
        get_history_use_case,
    });

    // 7. Configure routes and serve.
    let app = routes(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    info!("HTTP server listening on {}", settings.addr());

    let listener = tokio::net::TcpListener::bind(&settings.addr()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
