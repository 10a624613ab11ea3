use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Activity, ActivityCategory, ActivityQuery, AssetStatus, ChangeType, DailyEmission,
    InsightPayload, TopEmitter,
};
use crate::services::activity_service::ActivityService;
use crate::services::asset_service::AssetService;
use crate::services::emission_analytics::{
    daily_totals, round_to, total_emission, trend_insight, EmissionAnalyzer,
};

pub const DEFAULT_TREND_DAYS: i64 = 30;
pub const MAX_TREND_DAYS: i64 = 365;
const RECENT_ACTIVITY_COUNT: i64 = 5;
const TOP_EMITTER_COUNT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_emissions: f64,
    pub total_activities: i64,
    pub asset_count: i64,
    pub recent_activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: ActivityCategory,
    pub name: &'static str,
    pub icon: &'static str,
    pub count: i64,
    pub total_emissions: f64,
    pub percentage: f64,
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Month-over-month payload for the metrics card.
pub fn monthly_insight(
    current: f64,
    previous: f64,
    previous_month: NaiveDate,
    analyzer: &EmissionAnalyzer,
) -> InsightPayload {
    let (trend, change) = analyzer.compare(current, previous);
    let change_type = ChangeType::from(trend);

    let message = match change_type {
        ChangeType::Decrease => format!("Reduced by {:.1}% from last month", change.abs()),
        ChangeType::Increase => format!("Increased by {:.1}% from last month", change.abs()),
        ChangeType::Neutral => "Stable emissions this month".to_string(),
    };

    let mut payload = InsightPayload::new("This Month", change_type, round_to(change.abs(), 1), message);
    payload.total_emissions = Some(round_to(current, 2));
    payload.previous_emissions = Some(round_to(previous, 2));
    payload.comparison_period = Some(previous_month.format("%B %Y").to_string());
    payload
}

#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
    activities: ActivityService,
    assets: AssetService,
    analyzer: EmissionAnalyzer,
}

impl DashboardService {
    pub fn new(db: PgPool, analyzer: EmissionAnalyzer) -> Self {
        Self {
            activities: ActivityService::new(db.clone()),
            assets: AssetService::new(db.clone()),
            db,
            analyzer,
        }
    }

    pub async fn stats(&self, user_id: Uuid) -> Result<DashboardStats, AppError> {
        let (total_emissions, total_activities): (f64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(emission_kg), 0), COUNT(*) FROM activities WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        let recent = self
            .activities
            .list(
                user_id,
                ActivityQuery {
                    page: Some(1),
                    limit: Some(RECENT_ACTIVITY_COUNT),
                    category: None,
                },
            )
            .await?;

        Ok(DashboardStats {
            total_emissions: round_to(total_emissions, 2),
            total_activities,
            asset_count: self.assets.count_active(user_id).await?,
            recent_activities: recent.activities,
        })
    }

    /// Zero-filled daily totals for the `days` days ending `today`
    pub async fn emissions_trend(
        &self,
        user_id: Uuid,
        days: Option<i64>,
        today: NaiveDate,
    ) -> Result<Vec<DailyEmission>, AppError> {
        let days = days.unwrap_or(DEFAULT_TREND_DAYS).clamp(1, MAX_TREND_DAYS);
        let start = today - Duration::days(days - 1);

        let records = self.activities.records_between(user_id, start, today).await?;
        Ok(daily_totals(&records, start, today)?)
    }

    pub async fn top_emitters(&self, user_id: Uuid) -> Result<Vec<TopEmitter>, AppError> {
        let emitters = sqlx::query_as::<_, TopEmitter>(
            "SELECT a.id AS asset_id, a.name AS asset, COALESCE(SUM(act.emission_kg), 0) AS total_emissions
             FROM assets a
             JOIN activities act ON act.asset_id = a.id
             WHERE a.user_id = $1 AND a.status = $2
             GROUP BY a.id, a.name
             ORDER BY total_emissions DESC
             LIMIT $3",
        )
        .bind(user_id)
        .bind(AssetStatus::Active)
        .bind(TOP_EMITTER_COUNT)
        .fetch_all(&self.db)
        .await?;

        Ok(emitters)
    }

    pub async fn categories(&self, user_id: Uuid) -> Result<Vec<CategoryBreakdown>, AppError> {
        let stats = self.activities.category_breakdown(user_id, None).await?;
        let grand_total: f64 = stats.iter().map(|stat| stat.total_emissions).sum();

        Ok(stats
            .into_iter()
            .map(|stat| CategoryBreakdown {
                category: stat.category,
                name: stat.category.display_name(),
                icon: stat.category.icon(),
                count: stat.count,
                total_emissions: round_to(stat.total_emissions, 2),
                percentage: if grand_total > 0.0 {
                    round_to(stat.total_emissions / grand_total * 100.0, 1)
                } else {
                    0.0
                },
            })
            .collect())
    }

    /// This month so far against the whole previous month
    pub async fn metrics(&self, user_id: Uuid, today: NaiveDate) -> Result<InsightPayload, AppError> {
        let this_month = month_start(today);
        let last_month_end = this_month - Duration::days(1);
        let last_month = month_start(last_month_end);

        let records = self.activities.records_between(user_id, last_month, today).await?;
        let current = total_emission(&records, this_month, today);
        let previous = total_emission(&records, last_month, last_month_end);

        Ok(monthly_insight(current, previous, last_month, &self.analyzer))
    }

    pub async fn weekly_trend(&self, user_id: Uuid, today: NaiveDate) -> Result<InsightPayload, AppError> {
        let (start, end) = self.analyzer.trend_window(today);
        let records = self.activities.records_between(user_id, start, end).await?;
        let report = self.analyzer.trend(&records, today)?;

        Ok(trend_insight(&report, self.analyzer.config().trend_window_days))
    }
}
