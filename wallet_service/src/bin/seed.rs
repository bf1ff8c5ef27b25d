use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

/// Runs pending migrations and seeds the initial asset catalog. Idempotent:
/// safe to run against an already-seeded database.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    println!("Connecting to {database_url}...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .map_err(|e| format!("failed to connect: {e}"))?;

    println!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| format!("migration failed: {e}"))?;

    println!("Seeding GOLD_COIN asset type...");
    sqlx::query(
        r#"
        INSERT INTO asset_types (id, code, name, description, is_active, created_at, updated_at)
        VALUES ($1, 'GOLD_COIN', 'Gold Coin', 'Primary in-app virtual currency', TRUE, now(), now())
        ON CONFLICT (code) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .execute(&pool)
    .await
    .map_err(|e| format!("seed failed: {e}"))?;

    println!("Wallet DB initialized successfully.");
    Ok(())
}
