use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::WorkoutRecord;

/// How one exercise went on one day, across every record of that day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseProgressPoint {
    pub date: NaiveDate,
    pub sets: i64,
    pub best_weight: Option<f64>,
    pub total_reps: Option<i64>,
    /// Sum of weight times reps.
    pub volume: Option<f64>,
    pub best_time_secs: Option<i32>,
}

impl ExerciseProgressPoint {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            sets: 0,
            best_weight: None,
            total_reps: None,
            volume: None,
            best_time_secs: None,
        }
    }
}

/// Points in date order for every day on which `exercise_id` was performed.
pub fn exercise_progress(records: &[WorkoutRecord], exercise_id: &str) -> Vec<ExerciseProgressPoint> {
    let mut by_date: BTreeMap<NaiveDate, ExerciseProgressPoint> = BTreeMap::new();

    for record in records {
        for group in record.groups.iter().filter(|g| g.exercise_id == exercise_id) {
            let point = by_date
                .entry(record.date)
                .or_insert_with(|| ExerciseProgressPoint::new(record.date));

            for values in group.records.iter().map(|r| r.values) {
                point.sets += 1;
                if let Some(weight) = values.weight {
                    point.best_weight = Some(point.best_weight.map_or(weight, |b| b.max(weight)));
                }
                if let Some(reps) = values.reps {
                    point.total_reps = Some(point.total_reps.unwrap_or(0) + i64::from(reps));
                }
                if let (Some(weight), Some(reps)) = (values.weight, values.reps) {
                    point.volume = Some(point.volume.unwrap_or(0.0) + weight * f64::from(reps));
                }
                if let Some(secs) = values.time_secs {
                    point.best_time_secs = Some(point.best_time_secs.map_or(secs, |b| b.max(secs)));
                }
            }
        }
    }

    by_date.into_values().collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::super::fixtures::*;
    use super::*;
    use crate::models::ExerciseType;

    #[test]
    fn test_merges_records_of_the_same_day() {
        let records = vec![
            record(
                date(2024, 1, 8),
                None,
                vec![group(
                    "squat",
                    ExerciseType::WeightAndReps,
                    &[weighted(5, 100.0), weighted(3, 120.0)],
                )],
            ),
            record(
                date(2024, 1, 1),
                None,
                vec![
                    group("squat", ExerciseType::WeightAndReps, &[weighted(5, 90.0)]),
                    group("plank", ExerciseType::Time, &[timed(60)]),
                ],
            ),
            record(
                date(2024, 1, 8),
                None,
                vec![group("squat", ExerciseType::WeightAndReps, &[weighted(8, 60.0)])],
            ),
        ];

        let points = exercise_progress(&records, "squat");

        assert_eq!(
            points,
            vec![
                ExerciseProgressPoint {
                    date: date(2024, 1, 1),
                    sets: 1,
                    best_weight: Some(90.0),
                    total_reps: Some(5),
                    volume: Some(450.0),
                    best_time_secs: None,
                },
                ExerciseProgressPoint {
                    date: date(2024, 1, 8),
                    sets: 3,
                    best_weight: Some(120.0),
                    total_reps: Some(16),
                    volume: Some(1340.0),
                    best_time_secs: None,
                },
            ]
        );
    }

    #[test]
    fn test_time_only_exercise() {
        let records = vec![record(
            date(2024, 1, 1),
            None,
            vec![group("plank", ExerciseType::Time, &[timed(45), timed(90), timed(60)])],
        )];

        let points = exercise_progress(&records, "plank");

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].best_time_secs, Some(90));
        assert_eq!(points[0].best_weight, None);
        assert_eq!(points[0].volume, None);
    }

    #[test]
    fn test_unknown_exercise_is_empty() {
        let records = vec![record(
            date(2024, 1, 1),
            None,
            vec![group("plank", ExerciseType::Time, &[timed(45)])],
        )];

        assert!(exercise_progress(&records, "squat").is_empty());
    }
}
