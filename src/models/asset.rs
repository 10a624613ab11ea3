use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;
use validator::Validate;

use super::validation::validate_asset_type;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub asset_type: String,
    pub fuel_type: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub emoji: String,
    pub carbon_impact: f64,
    pub status: AssetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "asset_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Active,
    Deleted,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAssetRequest {
    #[validate(length(min = 1, max = 255, message = "Asset name cannot be empty"))]
    pub name: String,
    #[validate(custom(function = "validate_asset_type"))]
    pub asset_type: String,
    pub fuel_type: Option<String>,
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    pub emoji: Option<String>,
    #[validate(range(min = 0.0))]
    pub carbon_impact: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAssetRequest {
    #[validate(length(min = 1, max = 255, message = "Asset name cannot be empty"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_asset_type"))]
    pub asset_type: Option<String>,
    pub fuel_type: Option<String>,
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    pub emoji: Option<String>,
    #[validate(range(min = 0.0))]
    pub carbon_impact: Option<f64>,
}

/// Default emoji shown for an asset type when the client does not pick one
pub fn default_asset_emoji(asset_type: &str) -> &'static str {
    match asset_type {
        "vehicle" => "🚗",
        "machine" => "🏗️",
        "flight" => "✈️",
        "appliance" => "🔌",
        _ => "📊",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TopEmitter {
    pub asset_id: Uuid,
    pub asset: String,
    pub total_emissions: f64,
}
