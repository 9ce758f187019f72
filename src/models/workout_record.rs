use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{ExerciseType, FromSqliteRow, GroupInput, SetValues};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: String,
    pub position: i32,
    #[serde(flatten)]
    pub values: SetValues,
}

impl FromSqliteRow for ExerciseRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            position: row.get("position")?,
            values: SetValues::from_row(row)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRecordGroup {
    pub id: String,
    pub exercise_id: String,
    pub exercise_name: String,
    pub exercise_type: ExerciseType,
    pub position: i32,
    pub records: Vec<ExerciseRecord>,
}

impl FromSqliteRow for ExerciseRecordGroup {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            exercise_type: ExerciseType::from_column(row, "exercise_type")?,
            position: row.get("position")?,
            records: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: String,
    pub user_id: String,
    pub workout_id: Option<String>,
    pub date: NaiveDate,
    pub duration_secs: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub groups: Vec<ExerciseRecordGroup>,
}

impl FromSqliteRow for WorkoutRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            workout_id: row.get("workout_id")?,
            date: row.get("date")?,
            duration_secs: row.get("duration_secs")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            groups: Vec::new(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WorkoutRecordInput {
    pub workout_id: Option<String>,
    pub date: NaiveDate,
    pub duration_secs: Option<i64>,
    pub notes: Option<String>,
    #[serde(default)]
    pub groups: Vec<GroupInput>,
}

/// Logs a workout template as performed, copying its planned sets.
#[derive(Debug, Deserialize)]
pub struct RecordFromWorkout {
    pub date: NaiveDate,
    pub duration_secs: Option<i64>,
    pub notes: Option<String>,
}
