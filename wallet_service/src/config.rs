use std::env;

/// Runtime configuration, loaded from the environment (`.env` via
/// `dotenvy` in development). `system_treasury_id`/`system_bonus_pool_id`/
/// `system_revenue_id` are advisory only — system wallets are addressed by
/// the naming convention in `SystemRole::wallet_user_id`, not these values
/// (spec.md §6).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub app_name: String,
    pub app_version: String,
    pub debug: bool,
    pub system_treasury_id: Option<String>,
    pub system_bonus_pool_id: Option<String>,
    pub system_revenue_id: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "wallet_service".to_string()),
            app_version: env::var("APP_VERSION").unwrap_or_else(|_| "0.1.0".to_string()),
            debug: env::var("DEBUG")
                .ok()
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            system_treasury_id: env::var("SYSTEM_TREASURY_ID").ok(),
            system_bonus_pool_id: env::var("SYSTEM_BONUS_POOL_ID").ok(),
            system_revenue_id: env::var("SYSTEM_REVENUE_ID").ok(),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
