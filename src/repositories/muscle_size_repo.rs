use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use super::blocking;
use crate::db::DbPool;
use crate::error::{unique_violation, AppError, Result};
use crate::models::{FromSqliteRow, MuscleSize};

const DUPLICATE_DAY: &str = "A size for this muscle is already recorded for this date";

const SELECT_SIZES: &str = "SELECT s.id, s.user_id, s.muscle_id, m.name AS muscle_name, s.date, s.size
     FROM muscle_sizes s
     JOIN muscles m ON m.id = s.muscle_id";

/// One measurement per user, muscle and day.
#[derive(Clone)]
pub struct MuscleSizeRepository {
    pool: DbPool,
}

impl MuscleSizeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: &str,
        muscle_id: &str,
        date: NaiveDate,
        size: f64,
    ) -> Result<MuscleSize> {
        let id = Uuid::new_v4().to_string();
        let user_id = user_id.to_string();
        let muscle_id = muscle_id.to_string();

        blocking(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO muscle_sizes (id, user_id, muscle_id, date, size) VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![id, user_id, muscle_id, date, size],
            )
            .map_err(|e| unique_violation(e, DUPLICATE_DAY))?;
            load_size(conn, &id, &user_id)?
                .ok_or_else(|| AppError::Internal("created muscle size vanished".to_string()))
        })
        .await
    }

    pub async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<MuscleSize>> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| Ok(load_size(conn, &id, &user_id)?)).await
    }

    /// Oldest first, optionally for one muscle and an inclusive date range.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        muscle_id: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<MuscleSize>> {
        let user_id = user_id.to_string();
        let muscle_id = muscle_id.map(str::to_string);
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_SIZES}
                 WHERE s.user_id = ?1
                   AND (?2 IS NULL OR s.muscle_id = ?2)
                   AND (?3 IS NULL OR s.date >= ?3)
                   AND (?4 IS NULL OR s.date <= ?4)
                 ORDER BY s.date, m.name"
            ))?;
            let sizes = stmt
                .query_map(
                    rusqlite::params![user_id, muscle_id, from, to],
                    MuscleSize::from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(sizes)
        })
        .await
    }

    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        muscle_id: &str,
        date: NaiveDate,
        size: f64,
    ) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        let muscle_id = muscle_id.to_string();
        blocking(&self.pool, move |conn| {
            let rows = conn
                .execute(
                    "UPDATE muscle_sizes SET muscle_id = ?, date = ?, size = ?
                     WHERE id = ? AND user_id = ?",
                    rusqlite::params![muscle_id, date, size, id, user_id],
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
                "DELETE FROM muscle_sizes WHERE id = ? AND user_id = ?",
                [&id, &user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }
}

fn load_size(conn: &Connection, id: &str, user_id: &str) -> rusqlite::Result<Option<MuscleSize>> {
    conn.query_row(
        &format!("{SELECT_SIZES} WHERE s.id = ? AND s.user_id = ?"),
        [id, user_id],
        MuscleSize::from_row,
    )
    .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::repositories::test_support::{create_test_user, setup_test_db};

    const BICEPS: &str = "seed-muscle-biceps";
    const QUADS: &str = "seed-muscle-quadriceps";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_joins_muscle_name() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = MuscleSizeRepository::new(pool);

        let size = repo
            .create("user1", BICEPS, date(2024, 1, 1), 38.5)
            .await
            .unwrap();

        assert_eq!(size.muscle_name, "Biceps");
        assert_eq!(size.size, 38.5);
    }

    #[tokio::test]
    async fn test_duplicate_day_per_muscle() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = MuscleSizeRepository::new(pool);

        repo.create("user1", BICEPS, date(2024, 1, 1), 38.0)
            .await
            .unwrap();
        // Same day, different muscle is fine.
        repo.create("user1", QUADS, date(2024, 1, 1), 60.0)
            .await
            .unwrap();

        let result = repo.create("user1", BICEPS, date(2024, 1, 1), 38.2).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_filter_by_muscle_and_range() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = MuscleSizeRepository::new(pool);

        for day in [1, 15, 28] {
            repo.create("user1", BICEPS, date(2024, 2, day), 38.0)
                .await
                .unwrap();
            repo.create("user1", QUADS, date(2024, 2, day), 60.0)
                .await
                .unwrap();
        }

        let all = repo.find_by_user("user1", None, None, None).await.unwrap();
        assert_eq!(all.len(), 6);

        let biceps = repo
            .find_by_user("user1", Some(BICEPS), Some(date(2024, 2, 10)), None)
            .await
            .unwrap();
        let days: Vec<_> = biceps.iter().map(|s| s.date).collect();
        assert_eq!(days, vec![date(2024, 2, 15), date(2024, 2, 28)]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = MuscleSizeRepository::new(pool);

        let size = repo
            .create("user1", BICEPS, date(2024, 3, 1), 38.0)
            .await
            .unwrap();

        assert!(repo
            .update(&size.id, "user1", QUADS, date(2024, 3, 1), 61.0)
            .await
            .unwrap());
        let found = repo.find_by_id(&size.id, "user1").await.unwrap().unwrap();
        assert_eq!(found.muscle_name, "Quadriceps");

        assert!(repo.find_by_id(&size.id, "other").await.unwrap().is_none());
        assert!(repo.delete(&size.id, "user1").await.unwrap());
        assert!(!repo.delete(&size.id, "user1").await.unwrap());
    }
}
