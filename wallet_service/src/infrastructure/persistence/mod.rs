pub mod asset_repository;
pub mod idempotency_repository;
pub mod ledger_store;
pub mod models;
pub mod transaction_repository;
pub mod wallet_repository;
