use anyhow::{ensure, Result};
use std::env;

use crate::services::emission_analytics::{
    DEFAULT_BASELINE_WINDOW_DAYS, DEFAULT_TREND_THRESHOLD_PERCENT, DEFAULT_TREND_WINDOW_DAYS,
};

/// Tuning knobs for goal progress and trend analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticsConfig {
    /// Days before a goal's start date used for its baseline
    pub baseline_window_days: i64,
    /// Length of each of the two windows compared by the trend classifier
    pub trend_window_days: i64,
    /// Changes within +/- this percentage are reported as neutral
    pub trend_threshold_percent: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            baseline_window_days: DEFAULT_BASELINE_WINDOW_DAYS,
            trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
            trend_threshold_percent: DEFAULT_TREND_THRESHOLD_PERCENT,
        }
    }
}

impl AnalyticsConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let baseline_window_days = env::var("BASELINE_WINDOW_DAYS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.baseline_window_days);

        let trend_window_days = env::var("TREND_WINDOW_DAYS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.trend_window_days);

        let trend_threshold_percent = env::var("TREND_THRESHOLD_PERCENT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.trend_threshold_percent);

        let config = Self {
            baseline_window_days,
            trend_window_days,
            trend_threshold_percent,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.baseline_window_days > 0, "BASELINE_WINDOW_DAYS must be positive");
        ensure!(self.trend_window_days > 0, "TREND_WINDOW_DAYS must be positive");
        ensure!(
            self.trend_threshold_percent.is_finite() && self.trend_threshold_percent >= 0.0,
            "TREND_THRESHOLD_PERCENT must be a non-negative number"
        );
        Ok(())
    }
}
