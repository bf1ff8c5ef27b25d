use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entities::AssetType;
use crate::domain::error::CoreError;
use crate::domain::ports::AssetRepository;
use crate::infrastructure::persistence::models::AssetTypeModel;

/// `asset_types` catalog, backed by PostgreSQL.
pub struct PostgresAssetRepository {
    pool: PgPool,
}

impl PostgresAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetRepository for PostgresAssetRepository {
    async fn resolve(&self, code: &str) -> Result<AssetType, CoreError> {
        let model = sqlx::query_as::<_, AssetTypeModel>(
            r#"
            SELECT * FROM asset_types
            WHERE code = $1 AND is_active = TRUE
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::Internal(e.into()))?;

        model
            .map(AssetType::from)
            .ok_or_else(|| CoreError::AssetNotFound(code.to_string()))
    }
}
