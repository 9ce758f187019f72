use chrono::NaiveDate;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use super::blocking;
use crate::db::DbPool;
use crate::error::{unique_violation, Result};
use crate::models::{BodyWeight, FromSqliteRow};

const DUPLICATE_DAY: &str = "A body weight is already recorded for this date";

/// One body weight entry per user per day.
#[derive(Clone)]
pub struct BodyWeightRepository {
    pool: DbPool,
}

impl BodyWeightRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: &str, date: NaiveDate, weight: f64) -> Result<BodyWeight> {
        let entry = BodyWeight {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            date,
            weight,
        };
        let entry_clone = entry.clone();

        blocking(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO body_weights (id, user_id, date, weight) VALUES (?, ?, ?, ?)",
                rusqlite::params![
                    entry_clone.id,
                    entry_clone.user_id,
                    entry_clone.date,
                    entry_clone.weight
                ],
            )
            .map_err(|e| unique_violation(e, DUPLICATE_DAY))?;
            Ok(())
        })
        .await?;

        Ok(entry)
    }

    pub async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<BodyWeight>> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM body_weights WHERE id = ? AND user_id = ?")?;
            Ok(stmt
                .query_row([&id, &user_id], BodyWeight::from_row)
                .optional()?)
        })
        .await
    }

    /// Oldest first, optionally limited to an inclusive date range.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<BodyWeight>> {
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM body_weights
                 WHERE user_id = ?1
                   AND (?2 IS NULL OR date >= ?2)
                   AND (?3 IS NULL OR date <= ?3)
                 ORDER BY date",
            )?;
            let entries = stmt
                .query_map(rusqlite::params![user_id, from, to], BodyWeight::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
        .await
    }

    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        date: NaiveDate,
        weight: f64,
    ) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| {
            let rows = conn
                .execute(
                    "UPDATE body_weights SET date = ?, weight = ? WHERE id = ? AND user_id = ?",
                    rusqlite::params![date, weight, id, user_id],
                )
                .map_err(|e| unique_violation(e, DUPLICATE_DAY))?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM body_weights WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }
}
