use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;
use validator::Validate;

/// An emission reduction goal measured against a pre-start baseline
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub target_reduction_percent: f64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "goal_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Cancelled,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GoalStatus::Completed | GoalStatus::Cancelled)
    }

    /// Terminal states are final; staying in the current state is always allowed.
    pub fn can_transition_to(&self, next: GoalStatus) -> bool {
        *self == next || !self.is_terminal()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 255, message = "Goal title cannot be empty"))]
    pub title: String,
    #[validate(range(
        exclusive_min = 0.0,
        max = 100.0,
        message = "Target reduction must be greater than 0 and at most 100"
    ))]
    pub target_reduction_percent: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 255, message = "Goal title cannot be empty"))]
    pub title: Option<String>,
    #[validate(range(
        exclusive_min = 0.0,
        max = 100.0,
        message = "Target reduction must be greater than 0 and at most 100"
    ))]
    pub target_reduction_percent: Option<f64>,
    pub start_date: Option<NaiveDate>,
    /// Absent keeps the current end date; `null` makes the goal open-ended
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Option<NaiveDate>>,
    pub status: Option<GoalStatus>,
}

/// Wraps a field that is present in the payload, even as `null`, in `Some`
fn present_field<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalQuery {
    pub status: Option<GoalStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressQuery {
    /// Evaluate as of this date instead of today
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalsSummary {
    pub total_goals: usize,
    pub active_goals: usize,
    pub completed_goals: usize,
    pub cancelled_goals: usize,
    pub completion_rate: f64,
}

impl GoalsSummary {
    pub fn from_goals(goals: &[Goal]) -> Self {
        let total_goals = goals.len();
        let count = |status: GoalStatus| goals.iter().filter(|g| g.status == status).count();
        let completed_goals = count(GoalStatus::Completed);

        let completion_rate = if total_goals > 0 {
            (completed_goals as f64 / total_goals as f64) * 100.0
        } else {
            0.0
        };

        Self {
            total_goals,
            active_goals: count(GoalStatus::Active),
            completed_goals,
            cancelled_goals: count(GoalStatus::Cancelled),
            completion_rate,
        }
    }
}
