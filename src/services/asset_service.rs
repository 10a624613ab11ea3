use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::{default_asset_emoji, Asset, AssetStatus, CreateAssetRequest, UpdateAssetRequest};

const ASSET_COLUMNS: &str =
    "id, user_id, name, asset_type, fuel_type, model, year, emoji, carbon_impact, status, created_at, updated_at";

#[derive(Clone)]
pub struct AssetService {
    db: PgPool,
}

impl AssetService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Asset>, AppError> {
        let assets = sqlx::query_as::<_, Asset>(&format!(
            "SELECT {} FROM assets WHERE user_id = $1 AND status = $2 ORDER BY created_at DESC",
            ASSET_COLUMNS
        ))
        .bind(user_id)
        .bind(AssetStatus::Active)
        .fetch_all(&self.db)
        .await?;

        Ok(assets)
    }

    pub async fn create(&self, user_id: Uuid, request: CreateAssetRequest) -> Result<Asset, AppError> {
        request.validate()?;
        let asset_type = request.asset_type.to_lowercase();
        let emoji = request
            .emoji
            .unwrap_or_else(|| default_asset_emoji(&asset_type).to_string());

        let asset = sqlx::query_as::<_, Asset>(&format!(
            "INSERT INTO assets (id, user_id, name, asset_type, fuel_type, model, year, emoji, carbon_impact, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {}",
            ASSET_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(request.name.trim())
        .bind(&asset_type)
        .bind(&request.fuel_type)
        .bind(&request.model)
        .bind(request.year)
        .bind(&emoji)
        .bind(request.carbon_impact.unwrap_or(0.0))
        .bind(AssetStatus::Active)
        .fetch_one(&self.db)
        .await?;

        info!("Created asset {} for user {}", asset.id, user_id);
        Ok(asset)
    }

    pub async fn get(&self, user_id: Uuid, asset_id: Uuid) -> Result<Asset, AppError> {
        sqlx::query_as::<_, Asset>(&format!(
            "SELECT {} FROM assets WHERE id = $1 AND user_id = $2 AND status = $3",
            ASSET_COLUMNS
        ))
        .bind(asset_id)
        .bind(user_id)
        .bind(AssetStatus::Active)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Asset".to_string()))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        asset_id: Uuid,
        request: UpdateAssetRequest,
    ) -> Result<Asset, AppError> {
        request.validate()?;

        sqlx::query_as::<_, Asset>(&format!(
            "UPDATE assets
             SET name = COALESCE($4, name),
                 asset_type = COALESCE($5, asset_type),
                 fuel_type = COALESCE($6, fuel_type),
                 model = COALESCE($7, model),
                 year = COALESCE($8, year),
                 emoji = COALESCE($9, emoji),
                 carbon_impact = COALESCE($10, carbon_impact),
                 updated_at = NOW()
             WHERE id = $1 AND user_id = $2 AND status = $3
             RETURNING {}",
            ASSET_COLUMNS
        ))
        .bind(asset_id)
        .bind(user_id)
        .bind(AssetStatus::Active)
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.asset_type.map(|asset_type| asset_type.to_lowercase()))
        .bind(&request.fuel_type)
        .bind(&request.model)
        .bind(request.year)
        .bind(&request.emoji)
        .bind(request.carbon_impact)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Asset".to_string()))
    }

    /// Soft delete; logged activities keep their link to the asset
    pub async fn delete(&self, user_id: Uuid, asset_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE assets SET status = $3, updated_at = NOW()
             WHERE id = $1 AND user_id = $2 AND status = $4",
        )
        .bind(asset_id)
        .bind(user_id)
        .bind(AssetStatus::Deleted)
        .bind(AssetStatus::Active)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Asset".to_string()));
        }

        info!("Soft-deleted asset {} for user {}", asset_id, user_id);
        Ok(())
    }

    pub async fn count_active(&self, user_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM assets WHERE user_id = $1 AND status = $2")
            .bind(user_id)
            .bind(AssetStatus::Active)
            .fetch_one(&self.db)
            .await?;

        Ok(count)
    }
}
