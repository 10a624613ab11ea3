use chrono::Duration;
use uuid::Uuid;

use carbon_iq::config::AnalyticsConfig;
use carbon_iq::models::{ActivityRecord, ChangeType, Trend};
use carbon_iq::services::emission_analytics::{
    classify_change, classify_trend, evaluate_progress, progress_insight, trend_insight,
};
use carbon_iq::services::EmissionAnalyzer;

use crate::common::{daily_records, date, goal};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} but got {}",
        expected,
        actual
    );
}

#[cfg(test)]
mod progress_scenarios {
    use super::*;

    /// 300kg over the 30 days before Jan 1, then `current_kg` per day for Jan 1-10
    fn january_records(current_kg: f64) -> Vec<ActivityRecord> {
        let user_id = Uuid::new_v4();
        let mut records = daily_records(user_id, date(2023, 12, 2), date(2023, 12, 31), 10.0);
        records.extend(daily_records(user_id, date(2024, 1, 1), date(2024, 1, 10), current_kg));
        records
    }

    #[test]
    fn test_reduction_beyond_target_is_clamped_for_display() {
        let goal = goal(20.0, date(2024, 1, 1), None);
        let snapshot = evaluate_progress(&goal, &january_records(7.0), date(2024, 1, 10), 30).unwrap();

        assert_close(snapshot.baseline_daily_avg, 10.0);
        assert_close(snapshot.current_daily_avg, 7.0);
        assert_close(snapshot.actual_reduction_percent, 30.0);
        assert_close(snapshot.raw_progress_percent, 150.0);
        assert_eq!(snapshot.current_progress_percent, 100.0);
        assert!(snapshot.on_track);
        assert_eq!(snapshot.days_active, 10);
        assert_eq!(snapshot.days_remaining, None);
    }

    #[test]
    fn test_rising_emissions_show_negative_reduction() {
        let goal = goal(20.0, date(2024, 1, 1), None);
        let snapshot = evaluate_progress(&goal, &january_records(12.0), date(2024, 1, 10), 30).unwrap();

        assert_close(snapshot.actual_reduction_percent, -20.0);
        assert_close(snapshot.raw_progress_percent, -100.0);
        assert_eq!(snapshot.current_progress_percent, 0.0);
        assert!(!snapshot.on_track);
    }

    #[test]
    fn test_missing_history_reports_zero_reduction() {
        let user_id = Uuid::new_v4();
        let records = daily_records(user_id, date(2024, 1, 1), date(2024, 1, 10), 5.0);
        let goal = goal(20.0, date(2024, 1, 1), None);

        let snapshot = evaluate_progress(&goal, &records, date(2024, 1, 10), 30).unwrap();

        assert_eq!(snapshot.baseline_daily_avg, 0.0);
        assert_eq!(snapshot.current_daily_avg, 5.0);
        assert_eq!(snapshot.actual_reduction_percent, 0.0);
        assert_eq!(snapshot.current_progress_percent, 0.0);
        assert!(!snapshot.on_track);

        let insight = progress_insight(&goal, &snapshot);
        assert_eq!(insight.change_type, ChangeType::Neutral);
        assert_eq!(
            insight.message,
            "Not enough history before the start date to measure a reduction yet"
        );
    }

    #[test]
    fn test_small_drop_beyond_threshold_is_decreasing() {
        let (trend, change) = classify_change(9.5, 10.0, 1.0);
        assert_eq!(trend, Trend::Decreasing);
        assert_close(change, -5.0);
    }

    #[test]
    fn test_change_inside_threshold_is_neutral() {
        let (trend, change) = classify_change(10.05, 10.0, 1.0);
        assert_eq!(trend, Trend::Neutral);
        assert!((change - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_weekly_trend_from_records() {
        let user_id = Uuid::new_v4();
        let mut records = daily_records(user_id, date(2024, 1, 1), date(2024, 1, 7), 10.0);
        records.extend(daily_records(user_id, date(2024, 1, 8), date(2024, 1, 14), 9.5));

        let report = classify_trend(&records, date(2024, 1, 14), 7, 1.0).unwrap();
        assert_eq!(report.trend, Trend::Decreasing);
        assert_close(report.recent_avg, 9.5);
        assert_close(report.prior_avg, 10.0);
        assert_close(report.change_percent, -5.0);

        let insight = trend_insight(&report, 7);
        assert_eq!(insight.period, "Last 7 Days");
        assert_eq!(insight.change_type, ChangeType::Decrease);
        assert_eq!(insight.change_percent, 5.0);
        assert_eq!(insight.total_emissions, Some(66.5));
        assert_eq!(insight.previous_emissions, Some(70.0));
        assert_eq!(
            insight.message,
            "Reduced by 5.0% compared to the previous 7 days"
        );
    }

    #[test]
    fn test_dated_goal_behind_schedule() {
        // Halfway through a 20-day goal with only a quarter of the target reached
        let user_id = Uuid::new_v4();
        let mut records = daily_records(user_id, date(2023, 12, 2), date(2023, 12, 31), 10.0);
        records.extend(daily_records(user_id, date(2024, 1, 1), date(2024, 1, 11), 9.5));
        let goal = goal(20.0, date(2024, 1, 1), Some(date(2024, 1, 21)));

        let snapshot = evaluate_progress(&goal, &records, date(2024, 1, 11), 30).unwrap();

        assert_close(snapshot.actual_reduction_percent, 5.0);
        assert_close(snapshot.current_progress_percent, 25.0);
        assert!(!snapshot.on_track);
        assert_eq!(snapshot.days_remaining, Some(10));
    }

    #[test]
    fn test_analyzer_windows_follow_config() {
        let analyzer = EmissionAnalyzer::new(AnalyticsConfig {
            baseline_window_days: 14,
            trend_window_days: 30,
            trend_threshold_percent: 2.0,
        });
        let goal = goal(10.0, date(2024, 3, 1), Some(date(2024, 3, 31)));

        let (start, end) = analyzer.progress_window(&goal, date(2024, 4, 15));
        assert_eq!(start, date(2024, 2, 16));
        assert_eq!(end, date(2024, 3, 31));

        let (start, end) = analyzer.trend_window(date(2024, 3, 31));
        assert_eq!(end - start, Duration::days(59));

        assert_eq!(analyzer.compare(101.5, 100.0).0, Trend::Neutral);
        assert_eq!(analyzer.compare(103.0, 100.0).0, Trend::Increasing);
    }
}
