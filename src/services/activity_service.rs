use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::{
    Activity, ActivityCategory, ActivityListResponse, ActivityQuery, ActivityRecord, ActivityStats,
    AssetStatus, CategoryStat, CreateActivityRequest, UpdateActivityRequest,
};
use crate::services::carbon_calculator::CarbonCalculator;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

const ACTIVITY_COLUMNS: &str = "id, user_id, asset_id, title, category, activity_type, input_value, \
     input_unit, emission_factor, emission_kg, calculation, location, date, created_at, updated_at";

/// Highest page number whose offset still fits in an `i64`
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// Normalised `(page, limit, offset)` for a list request
pub fn page_window(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit, (page - 1) * limit)
}

pub fn page_count(total: i64, limit: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

#[derive(Clone)]
pub struct ActivityService {
    db: PgPool,
}

impl ActivityService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, user_id: Uuid, query: ActivityQuery) -> Result<ActivityListResponse, AppError> {
        let (page, limit, offset) = page_window(query.page, query.limit);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM activities
             WHERE user_id = $1 AND ($2::activity_category IS NULL OR category = $2)",
        )
        .bind(user_id)
        .bind(query.category)
        .fetch_one(&self.db)
        .await?;

        let activities = sqlx::query_as::<_, Activity>(&format!(
            "SELECT {} FROM activities
             WHERE user_id = $1 AND ($2::activity_category IS NULL OR category = $2)
             ORDER BY date DESC, created_at DESC
             LIMIT $3 OFFSET $4",
            ACTIVITY_COLUMNS
        ))
        .bind(user_id)
        .bind(query.category)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(ActivityListResponse {
            activities,
            total,
            page,
            limit,
            pages: page_count(total, limit),
        })
    }

    pub async fn create(&self, user_id: Uuid, request: CreateActivityRequest) -> Result<Activity, AppError> {
        request.validate()?;
        if let Some(asset_id) = request.asset_id {
            self.ensure_asset_owned(user_id, asset_id).await?;
        }

        let emission = CarbonCalculator::calculate(
            request.category,
            &request.activity_type,
            request.value,
            request.emission_factor,
        )?;
        let date = request.date.unwrap_or_else(|| Utc::now().date_naive());

        let activity = sqlx::query_as::<_, Activity>(&format!(
            "INSERT INTO activities (
                id, user_id, asset_id, title, category, activity_type, input_value,
                input_unit, emission_factor, emission_kg, calculation, location, date
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {}",
            ACTIVITY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(request.asset_id)
        .bind(request.title.trim())
        .bind(request.category)
        .bind(&request.activity_type)
        .bind(request.value)
        .bind(&emission.input_unit)
        .bind(emission.factor)
        .bind(emission.amount)
        .bind(&emission.calculation)
        .bind(&request.location)
        .bind(date)
        .fetch_one(&self.db)
        .await?;

        info!(
            "Logged activity {} for user {}: {} kg CO₂",
            activity.id, user_id, activity.emission_kg
        );
        Ok(activity)
    }

    pub async fn get(&self, user_id: Uuid, activity_id: Uuid) -> Result<Activity, AppError> {
        sqlx::query_as::<_, Activity>(&format!(
            "SELECT {} FROM activities WHERE id = $1 AND user_id = $2",
            ACTIVITY_COLUMNS
        ))
        .bind(activity_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity".to_string()))
    }

    /// Applies the changes and recomputes the emission from the merged fields
    pub async fn update(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
        request: UpdateActivityRequest,
    ) -> Result<Activity, AppError> {
        request.validate()?;
        let existing = self.get(user_id, activity_id).await?;

        if let Some(asset_id) = request.asset_id {
            self.ensure_asset_owned(user_id, asset_id).await?;
        }

        let activity_type = request.activity_type.unwrap_or(existing.activity_type);
        let value = request.value.unwrap_or(existing.input_value);
        let custom_factor = request
            .emission_factor
            .or((existing.category == ActivityCategory::Other).then_some(existing.emission_factor));
        let emission = CarbonCalculator::calculate(existing.category, &activity_type, value, custom_factor)?;

        let activity = sqlx::query_as::<_, Activity>(&format!(
            "UPDATE activities
             SET title = $3, activity_type = $4, input_value = $5, input_unit = $6,
                 emission_factor = $7, emission_kg = $8, calculation = $9,
                 location = $10, asset_id = $11, date = $12, updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {}",
            ACTIVITY_COLUMNS
        ))
        .bind(activity_id)
        .bind(user_id)
        .bind(request.title.as_deref().map(str::trim).unwrap_or(&existing.title))
        .bind(&activity_type)
        .bind(value)
        .bind(&emission.input_unit)
        .bind(emission.factor)
        .bind(emission.amount)
        .bind(&emission.calculation)
        .bind(request.location.or(existing.location))
        .bind(request.asset_id.or(existing.asset_id))
        .bind(request.date.unwrap_or(existing.date))
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity".to_string()))?;

        Ok(activity)
    }

    pub async fn delete(&self, user_id: Uuid, activity_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1 AND user_id = $2")
            .bind(activity_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Activity".to_string()));
        }
        Ok(())
    }

    pub async fn stats(&self, user_id: Uuid) -> Result<ActivityStats, AppError> {
        let (total_activities, this_month): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*),
                    COUNT(*) FILTER (WHERE date >= date_trunc('month', CURRENT_DATE)::date)
             FROM activities WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(ActivityStats {
            total_activities,
            this_month,
            by_category: self.category_breakdown(user_id, None).await?,
        })
    }

    /// Per-category count and emissions, optionally limited to dates on or after `since`
    pub async fn category_breakdown(
        &self,
        user_id: Uuid,
        since: Option<NaiveDate>,
    ) -> Result<Vec<CategoryStat>, AppError> {
        let stats = sqlx::query_as::<_, CategoryStat>(
            "SELECT category, COUNT(*) AS count, COALESCE(SUM(emission_kg), 0) AS total_emissions
             FROM activities
             WHERE user_id = $1 AND ($2::date IS NULL OR date >= $2)
             GROUP BY category
             ORDER BY total_emissions DESC",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.db)
        .await?;

        Ok(stats)
    }

    /// The user's activity records with dates in `[start, end]`
    pub async fn records_between(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ActivityRecord>, AppError> {
        let records = sqlx::query_as::<_, ActivityRecord>(
            "SELECT id, user_id, date, emission_kg FROM activities
             WHERE user_id = $1 AND date BETWEEN $2 AND $3",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(records)
    }

    async fn ensure_asset_owned(&self, user_id: Uuid, asset_id: Uuid) -> Result<(), AppError> {
        let found: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM assets WHERE id = $1 AND user_id = $2 AND status = $3",
        )
        .bind(asset_id)
        .bind(user_id)
        .bind(AssetStatus::Active)
        .fetch_optional(&self.db)
        .await?;

        found
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Asset".to_string()))
    }
}
