//! Field rules applied to request bodies before anything touches the database.
//!
//! Every failure is an [`AppError::Validation`] naming the offending field, so
//! the client can point at it.

use crate::error::{AppError, Result};
use crate::models::{ExerciseType, GroupInput, SetValues};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_NOTES_LEN: usize = 2000;
pub const MAX_GROUPS: usize = 50;
pub const MAX_SETS_PER_GROUP: usize = 100;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_DURATION_SECS: i64 = 24 * 60 * 60;

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Validation(message.into())
}

/// Trims a required name and checks its length.
pub fn name(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(format!("{} is required", field)));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(invalid(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// Optional free text: blank becomes `None`.
pub fn optional_text(field: &str, value: Option<&str>, max_len: usize) -> Result<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > max_len => Err(invalid(format!(
            "{} must be at most {} characters",
            field, max_len
        ))),
        Some(text) => Ok(Some(text.to_string())),
    }
}

pub fn description(value: Option<&str>) -> Result<Option<String>> {
    optional_text("Description", value, MAX_DESCRIPTION_LEN)
}

pub fn notes(value: Option<&str>) -> Result<Option<String>> {
    optional_text("Notes", value, MAX_NOTES_LEN)
}

pub fn username(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if !(3..=32).contains(&len) {
        return Err(invalid("Username must be between 3 and 32 characters"));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(invalid(
            "Username may only contain letters, digits, '_', '-' and '.'",
        ));
    }
    Ok(trimmed.to_string())
}

pub fn email(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !domain.ends_with('.')
                && !trimmed.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(invalid("Email is not a valid address"));
    }
    Ok(trimmed.to_lowercase())
}

pub fn password(value: &str) -> Result<()> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Checks that a set carries exactly the fields its exercise type uses.
pub fn set_values(exercise_type: ExerciseType, values: &SetValues) -> Result<()> {
    match (exercise_type.uses_reps(), values.reps) {
        (true, None) => return Err(invalid("reps is required")),
        (true, Some(reps)) if reps <= 0 => return Err(invalid("reps must be positive")),
        (false, Some(_)) => {
            return Err(invalid(format!(
                "reps is not allowed for {} exercises",
                exercise_type.as_str()
            )))
        }
        _ => {}
    }

    match (exercise_type.uses_weight(), values.weight) {
        (true, None) => return Err(invalid("weight is required")),
        (true, Some(weight)) if !weight.is_finite() || weight < 0.0 => {
            return Err(invalid("weight must be a non-negative number"))
        }
        (false, Some(_)) => {
            return Err(invalid(format!(
                "weight is not allowed for {} exercises",
                exercise_type.as_str()
            )))
        }
        _ => {}
    }

    match (exercise_type.uses_time(), values.time_secs) {
        (true, None) => Err(invalid("time_secs is required")),
        (true, Some(secs)) if secs <= 0 => Err(invalid("time_secs must be positive")),
        (false, Some(_)) => Err(invalid(format!(
            "time_secs is not allowed for {} exercises",
            exercise_type.as_str()
        ))),
        _ => Ok(()),
    }
}

/// Validates every group against the type of its exercise.
///
/// `exercise_type` resolves an exercise id to its type, or `None` when the
/// exercise doesn't exist or isn't visible to the caller.
pub fn groups<F>(groups: &[GroupInput], mut exercise_type: F) -> Result<()>
where
    F: FnMut(&str) -> Option<ExerciseType>,
{
    if groups.len() > MAX_GROUPS {
        return Err(invalid(format!(
            "A workout can contain at most {} exercises",
            MAX_GROUPS
        )));
    }

    for (group_index, group) in groups.iter().enumerate() {
        let kind = exercise_type(&group.exercise_id).ok_or_else(|| {
            AppError::NotFound(format!("Exercise {} not found", group.exercise_id))
        })?;

        if group.sets.is_empty() {
            return Err(invalid(format!(
                "groups[{}]: at least one set is required",
                group_index
            )));
        }
        if group.sets.len() > MAX_SETS_PER_GROUP {
            return Err(invalid(format!(
                "groups[{}]: at most {} sets are allowed",
                group_index, MAX_SETS_PER_GROUP
            )));
        }

        for (set_index, values) in group.sets.iter().enumerate() {
            set_values(kind, values).map_err(|e| match e {
                AppError::Validation(msg) => invalid(format!(
                    "groups[{}].sets[{}]: {}",
                    group_index, set_index, msg
                )),
                other => other,
            })?;
        }
    }

    Ok(())
}

pub fn duration_secs(value: Option<i64>) -> Result<Option<i64>> {
    match value {
        Some(secs) if secs < 0 => Err(invalid("duration_secs must not be negative")),
        Some(secs) if secs > MAX_DURATION_SECS => Err(invalid(format!(
            "duration_secs must not exceed {}",
            MAX_DURATION_SECS
        ))),
        other => Ok(other),
    }
}

pub fn body_weight(weight: f64) -> Result<f64> {
    if !weight.is_finite() || weight <= 0.0 || weight >= 1000.0 {
        return Err(invalid("weight must be between 0 and 1000"));
    }
    Ok(weight)
}

pub fn muscle_size(size: f64) -> Result<f64> {
    if !size.is_finite() || size <= 0.0 || size >= 500.0 {
        return Err(invalid("size must be between 0 and 500"));
    }
    Ok(size)
}
