use rusqlite::OptionalExtension;
use uuid::Uuid;

use super::{blocking, placeholders};
use crate::db::DbPool;
use crate::error::{unique_violation, Result};
use crate::models::{Equipment, FromSqliteRow};

const DUPLICATE_EQUIPMENT: &str = "Equipment with this name already exists";

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: DbPool,
}

impl EquipmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Equipment>> {
        blocking(&self.pool, |conn| {
            let mut stmt = conn.prepare("SELECT * FROM equipment ORDER BY name")?;
            let equipment = stmt
                .query_map([], Equipment::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(equipment)
        })
        .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Equipment>> {
        let id = id.to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM equipment WHERE id = ?")?;
            let result = stmt.query_row([&id], Equipment::from_row).optional()?;
            Ok(result)
        })
        .await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Equipment>> {
        let name = name.trim().to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM equipment WHERE name = ?")?;
            let result = stmt.query_row([&name], Equipment::from_row).optional()?;
            Ok(result)
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
                "SELECT id FROM equipment WHERE id IN ({})",
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

    pub async fn create(&self, name: &str, description: Option<&str>) -> Result<Equipment> {
        let equipment = Equipment {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        let equipment_clone = equipment.clone();

        blocking(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO equipment (id, name, description) VALUES (?, ?, ?)",
                rusqlite::params![
                    equipment_clone.id,
                    equipment_clone.name,
                    equipment_clone.description
                ],
            )
            .map_err(|e| unique_violation(e, DUPLICATE_EQUIPMENT))?;
            Ok(())
        })
        .await?;

        Ok(equipment)
    }

    pub async fn update(&self, id: &str, name: &str, description: Option<&str>) -> Result<bool> {
        let id = id.to_string();
        let name = name.to_string();
        let description = description.map(str::to_string);
        blocking(&self.pool, move |conn| {
            let rows = conn
                .execute(
                    "UPDATE equipment SET name = ?, description = ? WHERE id = ?",
                    rusqlite::params![name, description, id],
                )
                .map_err(|e| unique_violation(e, DUPLICATE_EQUIPMENT))?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        blocking(&self.pool, move |conn| {
            let rows = conn.execute("DELETE FROM equipment WHERE id = ?", [&id])?;
            Ok(rows > 0)
        })
        .await
    }
}
