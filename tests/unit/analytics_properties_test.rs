use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use uuid::Uuid;

use carbon_iq::models::{ActivityRecord, Trend};
use carbon_iq::services::emission_analytics::{
    average_daily_emission, baseline, classify_change, evaluate_progress,
};

use crate::common::{date, goal};

fn window_start() -> NaiveDate {
    date(2024, 1, 1)
}

/// Records scattered over the 60 days starting Jan 1, 2024
fn records_strategy() -> impl Strategy<Value = Vec<ActivityRecord>> {
    prop::collection::vec((0i64..60, 0.0f64..500.0), 0..80).prop_map(|entries| {
        let user_id = Uuid::new_v4();
        entries
            .into_iter()
            .map(|(offset, kg)| ActivityRecord::new(user_id, window_start() + Duration::days(offset), kg))
            .collect()
    })
}

#[cfg(test)]
mod analytics_properties {
    use super::*;

    proptest! {
        #[test]
        fn doubling_emissions_doubles_the_average(
            records in records_strategy(),
            start_offset in 0i64..30,
            length in 0i64..30,
        ) {
            let start = window_start() + Duration::days(start_offset);
            let end = start + Duration::days(length);
            let doubled: Vec<ActivityRecord> = records
                .iter()
                .map(|record| ActivityRecord { emission_kg: record.emission_kg * 2.0, ..record.clone() })
                .collect();

            let single = average_daily_emission(&records, start, end).unwrap();
            let double = average_daily_emission(&doubled, start, end).unwrap();
            prop_assert!((double - 2.0 * single).abs() < 1e-9);
        }

        #[test]
        fn single_day_average_is_that_days_total(records in records_strategy(), offset in 0i64..60) {
            let day = window_start() + Duration::days(offset);
            let expected: f64 = records
                .iter()
                .filter(|record| record.date == day)
                .map(|record| record.emission_kg)
                .sum();

            let average = average_daily_emission(&records, day, day).unwrap();
            prop_assert!((average - expected).abs() < 1e-9);
        }

        #[test]
        fn inverted_ranges_are_rejected(records in records_strategy(), gap in 1i64..100) {
            let end = window_start();
            let start = end + Duration::days(gap);
            prop_assert!(average_daily_emission(&records, start, end).is_err());
        }

        #[test]
        fn displayed_progress_is_clamped_raw_progress(
            records in records_strategy(),
            target in 1.0f64..100.0,
            start_offset in 0i64..60,
            now_offset in 0i64..60,
        ) {
            let goal = goal(target, window_start() + Duration::days(start_offset), None);
            let now = window_start() + Duration::days(now_offset);

            let snapshot = evaluate_progress(&goal, &records, now, 30).unwrap();
            prop_assert!(snapshot.actual_reduction_percent.is_finite());
            prop_assert!((0.0..=100.0).contains(&snapshot.current_progress_percent));
            prop_assert_eq!(
                snapshot.current_progress_percent,
                snapshot.raw_progress_percent.clamp(0.0, 100.0)
            );
        }

        #[test]
        fn zero_baseline_never_reports_a_reduction(
            kg in 0.0f64..500.0,
            days in 1i64..30,
            target in 1.0f64..100.0,
        ) {
            // Nothing logged before the goal starts
            let user_id = Uuid::new_v4();
            let start = window_start();
            let records: Vec<ActivityRecord> = (0..days)
                .map(|offset| ActivityRecord::new(user_id, start + Duration::days(offset), kg))
                .collect();
            let goal = goal(target, start, None);

            prop_assert_eq!(baseline(&records, start, 30).unwrap(), 0.0);
            let snapshot = evaluate_progress(&goal, &records, start + Duration::days(days - 1), 30).unwrap();
            prop_assert_eq!(snapshot.actual_reduction_percent, 0.0);
            prop_assert!(!snapshot.on_track);
        }

        #[test]
        fn trend_label_matches_the_threshold_band(
            recent in 0.0f64..1000.0,
            prior in 0.01f64..1000.0,
            threshold in 0.0f64..10.0,
        ) {
            let (trend, change) = classify_change(recent, prior, threshold);
            match trend {
                Trend::Decreasing => prop_assert!(change < -threshold),
                Trend::Increasing => prop_assert!(change > threshold),
                Trend::Neutral => prop_assert!(change.abs() <= threshold),
            }
            prop_assert_eq!(recent < prior, change < 0.0);
        }

        #[test]
        fn equal_windows_are_neutral(value in 0.0f64..1000.0, threshold in 0.0f64..10.0) {
            let (trend, change) = classify_change(value, value, threshold);
            prop_assert_eq!(trend, Trend::Neutral);
            prop_assert_eq!(change, 0.0);
        }
    }

    #[test]
    fn test_no_current_emissions_is_full_reduction() {
        let user_id = Uuid::new_v4();
        let records = vec![ActivityRecord::new(user_id, date(2023, 12, 15), 90.0)];
        let goal = goal(50.0, date(2024, 1, 1), None);

        let snapshot = evaluate_progress(&goal, &records, date(2024, 1, 5), 30).unwrap();
        assert_eq!(snapshot.baseline_daily_avg, 3.0);
        assert_eq!(snapshot.actual_reduction_percent, 100.0);
        assert_eq!(snapshot.current_progress_percent, 100.0);
    }
}
