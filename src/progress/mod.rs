//! Pure aggregation over already-loaded records and measurements.
//!
//! Nothing in here touches the database. Handlers load the rows for a
//! [`DateRange`] and hand them to these functions, which run in a single
//! linear pass over the input.

pub mod body_weight;
pub mod buckets;
pub mod exercise;
pub mod range;
pub mod strike;
pub mod totals;

pub use body_weight::{summarize_body_weight, BodyWeightSummary, WeightPoint};
pub use buckets::{buckets, Bucket, Period};
pub use exercise::{exercise_progress, ExerciseProgressPoint};
pub use range::{DateRange, RangeQuery, DEFAULT_RANGE_DAYS, MAX_RANGE_DAYS};
pub use strike::{strikes, summarize_strikes, StreakSummary, Strike, StrikeKind};
pub use totals::{totals, Totals};

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::models::{ExerciseRecord, ExerciseRecordGroup, ExerciseType, SetValues, WorkoutRecord};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn weighted(reps: i32, weight: f64) -> SetValues {
        SetValues {
            reps: Some(reps),
            weight: Some(weight),
            time_secs: None,
        }
    }

    pub fn reps(reps: i32) -> SetValues {
        SetValues {
            reps: Some(reps),
            weight: None,
            time_secs: None,
        }
    }

    pub fn timed(secs: i32) -> SetValues {
        SetValues {
            reps: None,
            weight: None,
            time_secs: Some(secs),
        }
    }

    pub fn weighted_time(weight: f64, secs: i32) -> SetValues {
        SetValues {
            reps: None,
            weight: Some(weight),
            time_secs: Some(secs),
        }
    }

    pub fn group(exercise_id: &str, exercise_type: ExerciseType, sets: &[SetValues]) -> ExerciseRecordGroup {
        ExerciseRecordGroup {
            id: format!("group-{}", exercise_id),
            exercise_id: exercise_id.to_string(),
            exercise_name: exercise_id.to_string(),
            exercise_type,
            position: 0,
            records: sets
                .iter()
                .enumerate()
                .map(|(i, values)| ExerciseRecord {
                    id: format!("record-{}", i),
                    position: i as i32,
                    values: *values,
                })
                .collect(),
        }
    }

    pub fn record(
        date: NaiveDate,
        duration_secs: Option<i64>,
        groups: Vec<ExerciseRecordGroup>,
    ) -> WorkoutRecord {
        WorkoutRecord {
            id: format!("wr-{}", date),
            user_id: "user1".to_string(),
            workout_id: None,
            date,
            duration_secs,
            notes: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            groups,
        }
    }
}
