use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "activity_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Transport,
    Energy,
    Food,
    Waste,
    Other,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 5] = [
        ActivityCategory::Transport,
        ActivityCategory::Energy,
        ActivityCategory::Food,
        ActivityCategory::Waste,
        ActivityCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::Transport => "transport",
            ActivityCategory::Energy => "energy",
            ActivityCategory::Food => "food",
            ActivityCategory::Waste => "waste",
            ActivityCategory::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "transport" => Some(ActivityCategory::Transport),
            "energy" => Some(ActivityCategory::Energy),
            "food" => Some(ActivityCategory::Food),
            "waste" => Some(ActivityCategory::Waste),
            "other" => Some(ActivityCategory::Other),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityCategory::Transport => "Transportation",
            ActivityCategory::Energy => "Energy",
            ActivityCategory::Food => "Food",
            ActivityCategory::Waste => "Waste",
            ActivityCategory::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ActivityCategory::Transport => "🚗",
            ActivityCategory::Energy => "⚡",
            ActivityCategory::Food => "🍽️",
            ActivityCategory::Waste => "🗑️",
            ActivityCategory::Other => "📝",
        }
    }
}

/// A logged activity together with the emission computed for it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub asset_id: Option<Uuid>,
    pub title: String,
    pub category: ActivityCategory,
    pub activity_type: String,
    pub input_value: f64,
    pub input_unit: String,
    pub emission_factor: f64,
    pub emission_kg: f64,
    pub calculation: String,
    pub location: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal view of an activity consumed by the analytics functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub emission_kg: f64,
}

impl ActivityRecord {
    pub fn new(user_id: Uuid, date: NaiveDate, emission_kg: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            emission_kg,
        }
    }
}

impl From<&Activity> for ActivityRecord {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            user_id: activity.user_id,
            date: activity.date,
            emission_kg: activity.emission_kg,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateActivityRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub category: ActivityCategory,
    #[validate(length(min = 1, max = 50))]
    pub activity_type: String,
    #[validate(range(min = 0.0, message = "Value cannot be negative"))]
    pub value: f64,
    /// Only used for the `other` category when the type has no known factor
    #[validate(range(min = 0.0))]
    pub emission_factor: Option<f64>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    pub asset_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateActivityRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub activity_type: Option<String>,
    #[validate(range(min = 0.0, message = "Value cannot be negative"))]
    pub value: Option<f64>,
    #[validate(range(min = 0.0))]
    pub emission_factor: Option<f64>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    pub asset_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<ActivityCategory>,
}

#[derive(Debug, Serialize)]
pub struct ActivityListResponse {
    pub activities: Vec<Activity>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryStat {
    pub category: ActivityCategory,
    pub count: i64,
    pub total_emissions: f64,
}

#[derive(Debug, Serialize)]
pub struct ActivityStats {
    pub total_activities: i64,
    pub this_month: i64,
    pub by_category: Vec<CategoryStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CalculateEmissionRequest {
    pub category: ActivityCategory,
    #[validate(length(min = 1, max = 50))]
    pub activity_type: String,
    #[validate(range(min = 0.0, message = "Value cannot be negative"))]
    pub value: f64,
    #[validate(range(min = 0.0))]
    pub emission_factor: Option<f64>,
}
