use rusqlite::OptionalExtension;
use uuid::Uuid;

use super::{blocking, placeholders};
use crate::db::DbPool;
use crate::error::{unique_violation, Result};
use crate::models::{FromSqliteRow, Muscle};

const DUPLICATE_MUSCLE: &str = "A muscle with this name already exists";

#[derive(Clone)]
pub struct MuscleRepository {
    pool: DbPool,
}

impl MuscleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Muscle>> {
        blocking(&self.pool, |conn| {
            let mut stmt = conn.prepare("SELECT * FROM muscles ORDER BY name")?;
            let muscles = stmt
                .query_map([], Muscle::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(muscles)
        })
        .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Muscle>> {
        let id = id.to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM muscles WHERE id = ?")?;
            Ok(stmt.query_row([&id], Muscle::from_row).optional()?)
        })
        .await
    }

    /// Case-insensitive lookup.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Muscle>> {
        let name = name.trim().to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM muscles WHERE name = ?")?;
            Ok(stmt.query_row([&name], Muscle::from_row).optional()?)
        })
        .await
    }

    pub async fn find_children(&self, parent_id: &str) -> Result<Vec<Muscle>> {
        let parent_id = parent_id.to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM muscles WHERE parent_id = ? ORDER BY name")?;
            let muscles = stmt
                .query_map([&parent_id], Muscle::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(muscles)
        })
        .await
    }

    /// The muscle itself followed by every ancestor up to the root.
    pub async fn find_lineage(&self, id: &str) -> Result<Vec<String>> {
        let id = id.to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "WITH RECURSIVE lineage(id, parent_id) AS (
                     SELECT id, parent_id FROM muscles WHERE id = ?
                     UNION
                     SELECT m.id, m.parent_id FROM muscles m JOIN lineage l ON m.id = l.parent_id
                 )
                 SELECT id FROM lineage",
            )?;
            let ids = stmt
                .query_map([&id], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(ids)
        })
        .await
    }

    /// Ids from `ids` that don't exist.
    pub async fn find_missing(&self, ids: &[String]) -> Result<Vec<String>> {
        let ids = ids.to_vec();
        blocking(&self.pool, move |conn| {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let mut stmt = conn.prepare(&format!(
                "SELECT id FROM muscles WHERE id IN ({})",
                placeholders(ids.len())
            ))?;
            let found = stmt
                .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
                    row.get::<_, String>(0)
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(ids.into_iter().filter(|id| !found.contains(id)).collect())
        })
        .await
    }

    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        parent_id: Option<&str>,
    ) -> Result<Muscle> {
        let muscle = Muscle {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            parent_id: parent_id.map(str::to_string),
        };
        let muscle_clone = muscle.clone();

        blocking(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO muscles (id, name, description, parent_id) VALUES (?, ?, ?, ?)",
                rusqlite::params![
                    muscle_clone.id,
                    muscle_clone.name,
                    muscle_clone.description,
                    muscle_clone.parent_id
                ],
            )
            .map_err(|e| unique_violation(e, DUPLICATE_MUSCLE))?;
            Ok(())
        })
        .await?;

        Ok(muscle)
    }

    pub async fn update(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
        parent_id: Option<&str>,
    ) -> Result<bool> {
        let id = id.to_string();
        let name = name.to_string();
        let description = description.map(str::to_string);
        let parent_id = parent_id.map(str::to_string);
        blocking(&self.pool, move |conn| {
            let rows = conn
                .execute(
                    "UPDATE muscles SET name = ?, description = ?, parent_id = ? WHERE id = ?",
                    rusqlite::params![name, description, parent_id, id],
                )
                .map_err(|e| unique_violation(e, DUPLICATE_MUSCLE))?;
            Ok(rows > 0)
        })
        .await
    }

    /// Children are detached, not deleted.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        blocking(&self.pool, move |conn| {
            let rows = conn.execute("DELETE FROM muscles WHERE id = ?", [&id])?;
            Ok(rows > 0)
        })
        .await
    }
}
