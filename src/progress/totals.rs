use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{ExerciseType, WorkoutRecord};

/// Aggregates over a set of workout records. Averages are per workout and
/// `None` when there are no workouts.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub workouts: i64,
    pub training_days: i64,
    /// Sum of weight times reps over weight-and-reps sets.
    pub total_weight: f64,
    pub total_reps: i64,
    pub total_time_secs: i64,
    pub total_duration_secs: i64,
    pub avg_weight: Option<f64>,
    pub avg_reps: Option<f64>,
    pub avg_time_secs: Option<f64>,
    pub avg_duration_secs: Option<f64>,
}

pub fn totals<'a, I>(records: I) -> Totals
where
    I: IntoIterator<Item = &'a WorkoutRecord>,
{
    let mut result = Totals::default();
    let mut days = BTreeSet::new();

    for record in records {
        result.workouts += 1;
        days.insert(record.date);
        result.total_duration_secs = result
            .total_duration_secs
            .saturating_add(record.duration_secs.unwrap_or(0));

        for group in &record.groups {
            for set in group.records.iter().map(|r| &r.values) {
                if group.exercise_type.uses_reps() {
                    result.total_reps = result
                        .total_reps
                        .saturating_add(i64::from(set.reps.unwrap_or(0)));
                }
                if group.exercise_type.uses_time() {
                    result.total_time_secs = result
                        .total_time_secs
                        .saturating_add(i64::from(set.time_secs.unwrap_or(0)));
                }
                if group.exercise_type == ExerciseType::WeightAndReps {
                    result.total_weight +=
                        set.weight.unwrap_or(0.0) * f64::from(set.reps.unwrap_or(0));
                }
            }
        }
    }

    result.training_days = days.len() as i64;

    if result.workouts > 0 {
        let n = result.workouts as f64;
        result.avg_weight = Some(result.total_weight / n);
        result.avg_reps = Some(result.total_reps as f64 / n);
        result.avg_time_secs = Some(result.total_time_secs as f64 / n);
        result.avg_duration_secs = Some(result.total_duration_secs as f64 / n);
    }

    result
}
