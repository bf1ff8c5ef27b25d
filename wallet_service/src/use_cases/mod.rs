pub mod bonus;
pub mod get_balance;
pub mod get_history;
pub mod spend;
pub mod topup;
pub mod transfer_engine;
