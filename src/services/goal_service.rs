use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::{
    validate_date_order, CreateGoalRequest, Goal, GoalStatus, GoalsSummary, InsightPayload,
    ProgressSnapshot, UpdateGoalRequest,
};
use crate::services::activity_service::ActivityService;
use crate::services::emission_analytics::{progress_insight, EmissionAnalyzer};

const GOAL_COLUMNS: &str =
    "id, user_id, title, target_reduction_percent, start_date, end_date, status, created_at, updated_at";

#[derive(Debug, Serialize)]
pub struct GoalProgress {
    pub goal: Goal,
    pub as_of: NaiveDate,
    pub progress: ProgressSnapshot,
    pub insight: InsightPayload,
}

#[derive(Clone)]
pub struct GoalService {
    db: PgPool,
    activities: ActivityService,
    analyzer: EmissionAnalyzer,
}

impl GoalService {
    pub fn new(db: PgPool, analyzer: EmissionAnalyzer) -> Self {
        Self {
            activities: ActivityService::new(db.clone()),
            db,
            analyzer,
        }
    }

    pub async fn list(&self, user_id: Uuid, status: Option<GoalStatus>) -> Result<Vec<Goal>, AppError> {
        let goals = sqlx::query_as::<_, Goal>(&format!(
            "SELECT {} FROM goals
             WHERE user_id = $1 AND ($2::goal_status IS NULL OR status = $2)
             ORDER BY created_at DESC",
            GOAL_COLUMNS
        ))
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.db)
        .await?;

        Ok(goals)
    }

    pub async fn create(&self, user_id: Uuid, request: CreateGoalRequest) -> Result<Goal, AppError> {
        request.validate()?;
        let start_date = request.start_date.unwrap_or_else(|| Utc::now().date_naive());
        validate_date_order(start_date, request.end_date).map_err(AppError::Validation)?;

        let goal = sqlx::query_as::<_, Goal>(&format!(
            "INSERT INTO goals (id, user_id, title, target_reduction_percent, start_date, end_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            GOAL_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(request.title.trim())
        .bind(request.target_reduction_percent)
        .bind(start_date)
        .bind(request.end_date)
        .bind(GoalStatus::Active)
        .fetch_one(&self.db)
        .await?;

        info!(
            "Created goal {} for user {}: {}% reduction from {}",
            goal.id, user_id, goal.target_reduction_percent, goal.start_date
        );
        Ok(goal)
    }

    pub async fn get(&self, user_id: Uuid, goal_id: Uuid) -> Result<Goal, AppError> {
        sqlx::query_as::<_, Goal>(&format!(
            "SELECT {} FROM goals WHERE id = $1 AND user_id = $2",
            GOAL_COLUMNS
        ))
        .bind(goal_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Goal".to_string()))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        request: UpdateGoalRequest,
    ) -> Result<Goal, AppError> {
        request.validate()?;
        let existing = self.get(user_id, goal_id).await?;

        let status = request.status.unwrap_or(existing.status);
        if !existing.status.can_transition_to(status) {
            warn!(
                "Rejected goal {} status change {} -> {}",
                goal_id,
                existing.status.as_str(),
                status.as_str()
            );
            return Err(AppError::Conflict(format!(
                "Goal is {} and cannot move to {}",
                existing.status.as_str(),
                status.as_str()
            )));
        }

        let start_date = request.start_date.unwrap_or(existing.start_date);
        let end_date = request.end_date.unwrap_or(existing.end_date);
        validate_date_order(start_date, end_date).map_err(AppError::Validation)?;

        sqlx::query_as::<_, Goal>(&format!(
            "UPDATE goals
             SET title = $3, target_reduction_percent = $4, start_date = $5,
                 end_date = $6, status = $7, updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {}",
            GOAL_COLUMNS
        ))
        .bind(goal_id)
        .bind(user_id)
        .bind(request.title.as_deref().map(str::trim).unwrap_or(&existing.title))
        .bind(request.target_reduction_percent.unwrap_or(existing.target_reduction_percent))
        .bind(start_date)
        .bind(end_date)
        .bind(status)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Goal".to_string()))
    }

    pub async fn delete(&self, user_id: Uuid, goal_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(goal_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Goal".to_string()));
        }
        Ok(())
    }

    /// Evaluates the goal against the owner's own activities as of `as_of` (default today)
    pub async fn progress(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        as_of: Option<NaiveDate>,
    ) -> Result<GoalProgress, AppError> {
        let goal = self.get(user_id, goal_id).await?;
        let now = as_of.unwrap_or_else(|| Utc::now().date_naive());

        let (window_start, window_end) = self.analyzer.progress_window(&goal, now);
        let records = self
            .activities
            .records_between(goal.user_id, window_start, window_end)
            .await?;

        let progress = self.analyzer.evaluate(&goal, &records, now)?;
        let insight = progress_insight(&goal, &progress);

        Ok(GoalProgress {
            goal,
            as_of: now,
            progress,
            insight,
        })
    }

    pub async fn summary(&self, user_id: Uuid) -> Result<GoalsSummary, AppError> {
        let goals = self.list(user_id, None).await?;
        Ok(GoalsSummary::from_goals(&goals))
    }
}
