use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{ExerciseType, FromSqliteRow};

/// Reps, weight and time of one set; which fields are present depends on the
/// exercise type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SetValues {
    pub reps: Option<i32>,
    pub weight: Option<f64>,
    pub time_secs: Option<i32>,
}

impl SetValues {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            reps: row.get("reps")?,
            weight: row.get("weight")?,
            time_secs: row.get("time_secs")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub id: String,
    pub position: i32,
    #[serde(flatten)]
    pub values: SetValues,
}

impl FromSqliteRow for ExerciseSet {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            position: row.get("position")?,
            values: SetValues::from_row(row)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSetGroup {
    pub id: String,
    pub exercise_id: String,
    pub exercise_name: String,
    pub exercise_type: ExerciseType,
    pub position: i32,
    pub sets: Vec<ExerciseSet>,
}

impl FromSqliteRow for ExerciseSetGroup {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            exercise_type: ExerciseType::from_column(row, "exercise_type")?,
            position: row.get("position")?,
            sets: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub groups: Vec<ExerciseSetGroup>,
}

impl FromSqliteRow for Workout {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            groups: Vec::new(),
        })
    }
}

/// One exercise with its sets, as submitted for workouts and records alike.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupInput {
    pub exercise_id: String,
    #[serde(default, alias = "records")]
    pub sets: Vec<SetValues>,
}

/// Body of both create and update requests; an update replaces every group.
#[derive(Debug, Deserialize)]
pub struct WorkoutInput {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub groups: Vec<GroupInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_set_flattens_values() {
        let set = ExerciseSet {
            id: "s1".to_string(),
            position: 0,
            values: SetValues {
                reps: Some(8),
                weight: Some(60.0),
                time_secs: None,
            },
        };

        let json = serde_json::to_value(&set).unwrap();

        assert_eq!(json["reps"], 8);
        assert_eq!(json["weight"], 60.0);
        assert!(json["time_secs"].is_null());
    }

    #[test]
    fn test_group_input_accepts_records_alias() {
        let group: GroupInput = serde_json::from_str(
            r#"{"exercise_id": "e1", "records": [{"reps": 5}, {"reps": 6}]}"#,
        )
        .unwrap();

        assert_eq!(group.sets.len(), 2);
        assert_eq!(group.sets[1].reps, Some(6));
        assert_eq!(group.sets[1].weight, None);
    }
}
