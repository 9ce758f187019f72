use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::from_row::invalid_column;
use super::{Equipment, FromSqliteRow};

/// Decides which of reps, weight and time a set of the exercise carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Reps,
    Time,
    WeightAndReps,
    WeightAndTime,
}

impl ExerciseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Reps => "reps",
            ExerciseType::Time => "time",
            ExerciseType::WeightAndReps => "weight_and_reps",
            ExerciseType::WeightAndTime => "weight_and_time",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reps" => Some(ExerciseType::Reps),
            "time" => Some(ExerciseType::Time),
            "weight_and_reps" => Some(ExerciseType::WeightAndReps),
            "weight_and_time" => Some(ExerciseType::WeightAndTime),
            _ => None,
        }
    }

    pub fn uses_reps(&self) -> bool {
        matches!(self, ExerciseType::Reps | ExerciseType::WeightAndReps)
    }

    pub fn uses_weight(&self) -> bool {
        matches!(
            self,
            ExerciseType::WeightAndReps | ExerciseType::WeightAndTime
        )
    }

    pub fn uses_time(&self) -> bool {
        matches!(self, ExerciseType::Time | ExerciseType::WeightAndTime)
    }

    pub(crate) fn from_column(row: &Row, column: &str) -> rusqlite::Result<Self> {
        let value: String = row.get(column)?;
        let index = row.as_ref().column_index(column)?;
        Self::parse(&value).ok_or_else(|| invalid_column(index, &value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseMuscle {
    pub muscle_id: String,
    pub name: String,
    pub is_primary: bool,
}

impl FromSqliteRow for ExerciseMuscle {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            muscle_id: row.get("muscle_id")?,
            name: row.get("name")?,
            is_primary: row.get("is_primary")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub exercise_type: ExerciseType,
    /// `None` for exercises in the global catalog.
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub muscles: Vec<ExerciseMuscle>,
    pub equipment: Vec<Equipment>,
}

impl Exercise {
    pub fn is_global(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.user_id.as_deref().map_or(true, |owner| owner == user_id)
    }
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            exercise_type: ExerciseType::from_column(row, "exercise_type")?,
            user_id: row.get("user_id")?,
            created_at: row.get("created_at")?,
            muscles: Vec::new(),
            equipment: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseMuscleInput {
    pub muscle_id: String,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateExercise {
    pub name: String,
    pub description: Option<String>,
    pub exercise_type: ExerciseType,
    #[serde(default)]
    pub muscles: Vec<ExerciseMuscleInput>,
    #[serde(default)]
    pub equipment_ids: Vec<String>,
    /// Only honoured for admins.
    #[serde(default)]
    pub global: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExercise {
    pub name: String,
    pub description: Option<String>,
    pub exercise_type: ExerciseType,
    #[serde(default)]
    pub muscles: Vec<ExerciseMuscleInput>,
    #[serde(default)]
    pub equipment_ids: Vec<String>,
}
