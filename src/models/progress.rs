use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Derived view of how a goal is doing; computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub baseline_daily_avg: f64,
    pub current_daily_avg: f64,
    /// Negative when emissions rose above the baseline
    pub actual_reduction_percent: f64,
    /// Clamped to [0, 100] for display
    pub current_progress_percent: f64,
    /// Unclamped progress, above 100 when the target is overshot
    pub raw_progress_percent: f64,
    pub on_track: bool,
    pub days_active: i64,
    pub days_remaining: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Neutral,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Neutral => "neutral",
        }
    }
}

/// Direction label used by dashboard payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Increase,
    Decrease,
    Neutral,
}

impl From<Trend> for ChangeType {
    fn from(trend: Trend) -> Self {
        match trend {
            Trend::Increasing => ChangeType::Increase,
            Trend::Decreasing => ChangeType::Decrease,
            Trend::Neutral => ChangeType::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub trend: Trend,
    pub change_percent: f64,
    pub recent_avg: f64,
    pub prior_avg: f64,
}

/// Payload shared by the dashboard metrics card, weekly trend and goal progress views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightPayload {
    pub period: String,
    pub change_type: ChangeType,
    pub change_percent: f64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_emissions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_emissions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_progress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_reduction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_track: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_active: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_daily_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_daily_avg: Option<f64>,
}

impl InsightPayload {
    pub fn new(period: impl Into<String>, change_type: ChangeType, change_percent: f64, message: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            change_type,
            change_percent,
            message: message.into(),
            total_emissions: None,
            previous_emissions: None,
            comparison_period: None,
            current_progress: None,
            actual_reduction: None,
            on_track: None,
            days_active: None,
            days_remaining: None,
            current_daily_avg: None,
            baseline_daily_avg: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEmission {
    pub date: NaiveDate,
    pub total: f64,
}
