use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Muscle {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
}

impl FromSqliteRow for Muscle {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            parent_id: row.get("parent_id")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MuscleWithChildren {
    #[serde(flatten)]
    pub muscle: Muscle,
    pub children: Vec<Muscle>,
}

/// Body of both create and update requests.
#[derive(Debug, Deserialize)]
pub struct MuscleInput {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
}
