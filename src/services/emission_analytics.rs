//! Goal progress and emission trend analysis.
//!
//! Everything here is a pure function over a caller-supplied slice of
//! [`ActivityRecord`]s. Handlers fetch the records for the relevant window and
//! call in; nothing is cached or shared between calls.

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::config::AnalyticsConfig;
use crate::models::{
    ActivityRecord, ChangeType, DailyEmission, Goal, InsightPayload, ProgressSnapshot, Trend,
    TrendReport,
};

pub const DEFAULT_BASELINE_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_TREND_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_TREND_THRESHOLD_PERCENT: f64 = 1.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("Invalid goal: {0}")]
    InvalidGoal(String),
}

/// Total emissions in `[start, end]` divided by the number of calendar days in
/// the window. Days without activity count as zero.
pub fn average_daily_emission(
    records: &[ActivityRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<f64, AnalyticsError> {
    if start > end {
        return Err(AnalyticsError::InvalidRange { start, end });
    }

    let days = (end - start).num_days() + 1;
    let total = total_emission(records, start, end);

    Ok(total / days as f64)
}

/// Sum of emissions dated inside `[start, end]`, duplicates included.
pub fn total_emission(records: &[ActivityRecord], start: NaiveDate, end: NaiveDate) -> f64 {
    records
        .iter()
        .filter(|record| record.date >= start && record.date <= end)
        .map(|record| record.emission_kg)
        .sum()
}

/// Daily average over the `window_days` days immediately before `goal_start`.
pub fn baseline(
    records: &[ActivityRecord],
    goal_start: NaiveDate,
    window_days: i64,
) -> Result<f64, AnalyticsError> {
    let start = goal_start - Duration::days(window_days);
    let end = goal_start - Duration::days(1);
    average_daily_emission(records, start, end)
}

/// Checks a goal is measurable. Creation does not guarantee this, so it runs
/// on every evaluation.
pub fn validate_goal(goal: &Goal) -> Result<(), AnalyticsError> {
    let target = goal.target_reduction_percent;
    if !target.is_finite() || target <= 0.0 {
        return Err(AnalyticsError::InvalidGoal(format!(
            "target reduction must be greater than 0, got {}",
            target
        )));
    }
    if target > 100.0 {
        return Err(AnalyticsError::InvalidGoal(format!(
            "target reduction cannot exceed 100, got {}",
            target
        )));
    }
    if let Some(end) = goal.end_date {
        if end < goal.start_date {
            return Err(AnalyticsError::InvalidGoal(format!(
                "end date {} is before start date {}",
                end, goal.start_date
            )));
        }
    }
    Ok(())
}

/// Evaluates a goal against the user's records as of `now`.
///
/// The current window runs from the goal's start to `min(now, end_date)`.
/// Before the start date nothing has been measured yet, so the snapshot
/// reports zero reduction rather than comparing against an empty window.
pub fn evaluate_progress(
    goal: &Goal,
    records: &[ActivityRecord],
    now: NaiveDate,
    baseline_window_days: i64,
) -> Result<ProgressSnapshot, AnalyticsError> {
    validate_goal(goal)?;

    let baseline_daily_avg = baseline(records, goal.start_date, baseline_window_days)?;

    let effective_end = goal.end_date.map_or(now, |end| end.min(now));
    let started = effective_end >= goal.start_date;

    let current_daily_avg = if started {
        average_daily_emission(records, goal.start_date, effective_end)?
    } else {
        0.0
    };

    // A zero baseline leaves nothing to measure against.
    let actual_reduction_percent = if baseline_daily_avg == 0.0 || !started {
        0.0
    } else {
        (baseline_daily_avg - current_daily_avg) / baseline_daily_avg * 100.0
    };

    let raw_progress_percent = actual_reduction_percent / goal.target_reduction_percent * 100.0;

    let on_track = match goal.end_date {
        None => actual_reduction_percent > 0.0,
        Some(end) => raw_progress_percent / 100.0 >= elapsed_fraction(goal.start_date, end, now),
    };

    let days_active = if started {
        (effective_end - goal.start_date).num_days() + 1
    } else {
        0
    };
    let days_remaining = goal.end_date.map(|end| (end - now).num_days().max(0));

    Ok(ProgressSnapshot {
        baseline_daily_avg,
        current_daily_avg,
        actual_reduction_percent,
        current_progress_percent: raw_progress_percent.clamp(0.0, 100.0),
        raw_progress_percent,
        on_track,
        days_active,
        days_remaining,
    })
}

/// Share of the goal window that has elapsed by `now`, clamped to [0, 1].
pub fn elapsed_fraction(start: NaiveDate, end: NaiveDate, now: NaiveDate) -> f64 {
    let total = (end - start).num_days();
    if total <= 0 {
        return if now >= end { 1.0 } else { 0.0 };
    }

    let elapsed = (now - start).num_days() as f64;
    (elapsed / total as f64).clamp(0.0, 1.0)
}

/// Compares the trailing `window_days` ending at `now` with the window before it.
pub fn classify_trend(
    records: &[ActivityRecord],
    now: NaiveDate,
    window_days: i64,
    threshold_percent: f64,
) -> Result<TrendReport, AnalyticsError> {
    let recent_start = now - Duration::days(window_days - 1);
    let recent_avg = average_daily_emission(records, recent_start, now)?;

    let prior_end = now - Duration::days(window_days);
    let prior_start = now - Duration::days(2 * window_days - 1);
    let prior_avg = average_daily_emission(records, prior_start, prior_end)?;

    let (trend, change_percent) = classify_change(recent_avg, prior_avg, threshold_percent);

    Ok(TrendReport {
        trend,
        change_percent,
        recent_avg,
        prior_avg,
    })
}

/// Percent change from `prior` to `recent`, labelled with a +/- threshold band.
/// A zero prior value yields a neutral zero change.
pub fn classify_change(recent: f64, prior: f64, threshold_percent: f64) -> (Trend, f64) {
    let change_percent = if prior == 0.0 {
        0.0
    } else {
        (recent - prior) / prior * 100.0
    };

    let trend = if change_percent < -threshold_percent {
        Trend::Decreasing
    } else if change_percent > threshold_percent {
        Trend::Increasing
    } else {
        Trend::Neutral
    };

    (trend, change_percent)
}

/// Per-day totals for every date in `[start, end]`, zero-filled.
pub fn daily_totals(
    records: &[ActivityRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DailyEmission>, AnalyticsError> {
    if start > end {
        return Err(AnalyticsError::InvalidRange { start, end });
    }

    Ok(start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| DailyEmission {
            date,
            total: round_to(total_emission(records, date, date), 2),
        })
        .collect())
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Progress payload for the goals view.
pub fn progress_insight(goal: &Goal, snapshot: &ProgressSnapshot) -> InsightPayload {
    let reduction = snapshot.actual_reduction_percent;
    let change_type = if reduction > 0.0 {
        ChangeType::Decrease
    } else if reduction < 0.0 {
        ChangeType::Increase
    } else {
        ChangeType::Neutral
    };

    let message = match change_type {
        ChangeType::Decrease if snapshot.raw_progress_percent >= 100.0 => format!(
            "Emissions down {:.1}% from your baseline, meeting your {}% target",
            reduction, goal.target_reduction_percent
        ),
        ChangeType::Decrease => format!(
            "Emissions down {:.1}% from your baseline, {:.0}% of the way to your {}% target",
            reduction, snapshot.current_progress_percent, goal.target_reduction_percent
        ),
        ChangeType::Increase => format!(
            "Emissions up {:.1}% over your baseline since this goal started",
            reduction.abs()
        ),
        ChangeType::Neutral if snapshot.baseline_daily_avg == 0.0 => {
            "Not enough history before the start date to measure a reduction yet".to_string()
        }
        ChangeType::Neutral => "Emissions are level with your baseline".to_string(),
    };

    let mut payload = InsightPayload::new(
        format!("Since {}", goal.start_date.format("%b %d, %Y")),
        change_type,
        round_to(reduction.abs(), 1),
        message,
    );
    payload.total_emissions = Some(round_to(
        snapshot.current_daily_avg * snapshot.days_active as f64,
        2,
    ));
    payload.current_progress = Some(round_to(snapshot.current_progress_percent, 1));
    payload.actual_reduction = Some(round_to(reduction, 1));
    payload.on_track = Some(snapshot.on_track);
    payload.days_active = Some(snapshot.days_active);
    payload.days_remaining = snapshot.days_remaining;
    payload.current_daily_avg = Some(round_to(snapshot.current_daily_avg, 2));
    payload.baseline_daily_avg = Some(round_to(snapshot.baseline_daily_avg, 2));
    payload
}

/// Trend payload for the trailing window, e.g. "Last 7 Days".
pub fn trend_insight(report: &TrendReport, window_days: i64) -> InsightPayload {
    let change = report.change_percent.abs();
    let message = match report.trend {
        Trend::Decreasing => format!(
            "Reduced by {:.1}% compared to the previous {} days",
            change, window_days
        ),
        Trend::Increasing => format!(
            "Increased by {:.1}% compared to the previous {} days",
            change, window_days
        ),
        Trend::Neutral => format!("Stable emissions compared to the previous {} days", window_days),
    };

    let mut payload = InsightPayload::new(
        format!("Last {} Days", window_days),
        ChangeType::from(report.trend),
        round_to(change, 1),
        message,
    );
    payload.total_emissions = Some(round_to(report.recent_avg * window_days as f64, 2));
    payload.previous_emissions = Some(round_to(report.prior_avg * window_days as f64, 2));
    payload.current_daily_avg = Some(round_to(report.recent_avg, 2));
    payload
}

/// Config-bound entry points used by the HTTP services.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmissionAnalyzer {
    config: AnalyticsConfig,
}

impl EmissionAnalyzer {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        goal: &Goal,
        records: &[ActivityRecord],
        now: NaiveDate,
    ) -> Result<ProgressSnapshot, AnalyticsError> {
        evaluate_progress(goal, records, now, self.config.baseline_window_days)
    }

    pub fn trend(&self, records: &[ActivityRecord], now: NaiveDate) -> Result<TrendReport, AnalyticsError> {
        classify_trend(
            records,
            now,
            self.config.trend_window_days,
            self.config.trend_threshold_percent,
        )
    }

    pub fn compare(&self, recent: f64, prior: f64) -> (Trend, f64) {
        classify_change(recent, prior, self.config.trend_threshold_percent)
    }

    /// Date range a caller must load to evaluate `goal` as of `now`.
    pub fn progress_window(&self, goal: &Goal, now: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = goal.start_date - Duration::days(self.config.baseline_window_days);
        let end = goal.end_date.map_or(now, |end| end.min(now)).max(goal.start_date);
        (start, end)
    }

    /// Date range a caller must load to classify the trend as of `now`.
    pub fn trend_window(&self, now: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = now - Duration::days(2 * self.config.trend_window_days - 1);
        (start, now)
    }
}
