pub mod auth;
pub mod body_weights;
pub mod equipment;
pub mod exercises;
pub mod health;
pub mod muscle_sizes;
pub mod muscles;
pub mod progress;
pub mod workout_records;
pub mod workouts;

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use crate::error::{AppError, Result};
use crate::models::{ExerciseType, GroupInput};
use crate::repositories::ExerciseRepository;
use crate::validation;

/// Checks every group's sets against the type of its exercise. Exercises the
/// caller can't see count as missing.
pub(crate) async fn check_groups(
    exercise_repo: &ExerciseRepository,
    user_id: &str,
    groups: &[GroupInput],
) -> Result<()> {
    let mut ids: Vec<String> = groups.iter().map(|g| g.exercise_id.clone()).collect();
    ids.sort();
    ids.dedup();

    let types: HashMap<String, ExerciseType> = exercise_repo
        .find_many(&ids)
        .await?
        .into_iter()
        .filter(|e| e.is_visible_to(user_id))
        .map(|e| (e.id, e.exercise_type))
        .collect();

    validation::groups(groups, |id| types.get(id).copied())
}

/// Rejects an explicit `from` that lies after `to`.
pub(crate) fn check_order(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(AppError::BadRequest(
            "'from' must not be after 'to'".to_string(),
        )),
        _ => Ok(()),
    }
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
