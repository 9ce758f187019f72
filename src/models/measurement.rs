use chrono::NaiveDate;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyWeight {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub weight: f64,
}

impl FromSqliteRow for BodyWeight {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            weight: row.get("weight")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BodyWeightInput {
    pub date: NaiveDate,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleSize {
    pub id: String,
    pub user_id: String,
    pub muscle_id: String,
    pub muscle_name: String,
    pub date: NaiveDate,
    pub size: f64,
}

impl FromSqliteRow for MuscleSize {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            muscle_id: row.get("muscle_id")?,
            muscle_name: row.get("muscle_name")?,
            date: row.get("date")?,
            size: row.get("size")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MuscleSizeInput {
    pub muscle_id: String,
    pub date: NaiveDate,
    pub size: f64,
}
