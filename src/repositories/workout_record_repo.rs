use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use super::blocking;
use super::set_groups::{delete_groups, insert_groups, load_groups, RECORD_SETS};
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{ExerciseRecord, ExerciseRecordGroup, FromSqliteRow, GroupInput, WorkoutRecord};

/// Validated values for creating or replacing a record.
#[derive(Debug, Clone)]
pub struct RecordFields {
    pub workout_id: Option<String>,
    pub date: NaiveDate,
    pub duration_secs: Option<i64>,
    pub notes: Option<String>,
    pub groups: Vec<GroupInput>,
}

#[derive(Clone)]
pub struct WorkoutRecordRepository {
    pool: DbPool,
}

impl WorkoutRecordRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: &str, fields: RecordFields) -> Result<WorkoutRecord> {
        let id = Uuid::new_v4().to_string();
        let user_id = user_id.to_string();
        let now = Utc::now();

        blocking(&self.pool, move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO workout_records (id, user_id, workout_id, date, duration_secs, notes, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    id,
                    user_id,
                    fields.workout_id,
                    fields.date,
                    fields.duration_secs,
                    fields.notes,
                    now
                ],
            )?;
            insert_groups(&tx, &RECORD_SETS, &id, &fields.groups)?;
            let record = load_record(&tx, &id, &user_id)?;
            tx.commit()?;
            record.ok_or_else(|| AppError::Internal("created record vanished".to_string()))
        })
        .await
    }

    /// Only returns the record when `user_id` owns it.
    pub async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<WorkoutRecord>> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| Ok(load_record(conn, &id, &user_id)?)).await
    }

    /// Newest first, optionally limited to an inclusive date range.
    pub async fn find_by_user_paginated(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkoutRecord>> {
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM workout_records
                 WHERE user_id = ?1
                   AND (?2 IS NULL OR date >= ?2)
                   AND (?3 IS NULL OR date <= ?3)
                 ORDER BY date DESC, created_at DESC
                 LIMIT ?4 OFFSET ?5",
            )?;
            let records = stmt
                .query_map(
                    rusqlite::params![user_id, from, to, limit, offset],
                    WorkoutRecord::from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(with_groups(&*conn, records)?)
        })
        .await
    }

    pub async fn count_by_user(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<i64> {
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM workout_records
                 WHERE user_id = ?1
                   AND (?2 IS NULL OR date >= ?2)
                   AND (?3 IS NULL OR date <= ?3)",
                rusqlite::params![user_id, from, to],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
    }

    /// Every record in the inclusive range, oldest first, with full graphs.
    pub async fn find_in_range(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WorkoutRecord>> {
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM workout_records
                 WHERE user_id = ? AND date >= ? AND date <= ?
                 ORDER BY date, created_at",
            )?;
            let records = stmt
                .query_map(rusqlite::params![user_id, from, to], WorkoutRecord::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(with_groups(&*conn, records)?)
        })
        .await
    }

    /// Replaces every field and the whole record graph.
    pub async fn update(&self, id: &str, user_id: &str, fields: RecordFields) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| {
            let tx = conn.transaction()?;
            let rows = tx.execute(
                "UPDATE workout_records SET workout_id = ?, date = ?, duration_secs = ?, notes = ?
                 WHERE id = ? AND user_id = ?",
                rusqlite::params![
                    fields.workout_id,
                    fields.date,
                    fields.duration_secs,
                    fields.notes,
                    id,
                    user_id
                ],
            )?;
            if rows == 0 {
                return Ok(false);
            }
            delete_groups(&tx, &RECORD_SETS, &id)?;
            insert_groups(&tx, &RECORD_SETS, &id, &fields.groups)?;
            tx.commit()?;
            Ok(true)
        })
        .await
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM workout_records WHERE id = ? AND user_id = ?",
                rusqlite::params![id, user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }
}

fn load_record(
    conn: &Connection,
    id: &str,
    user_id: &str,
) -> rusqlite::Result<Option<WorkoutRecord>> {
    let record = conn
        .query_row(
            "SELECT * FROM workout_records WHERE id = ? AND user_id = ?",
            [id, user_id],
            WorkoutRecord::from_row,
        )
        .optional()?;

    match record {
        Some(record) => Ok(with_groups(conn, vec![record])?.pop()),
        None => Ok(None),
    }
}

fn with_groups(
    conn: &Connection,
    records: Vec<WorkoutRecord>,
) -> rusqlite::Result<Vec<WorkoutRecord>> {
    records
        .into_iter()
        .map(|mut record| {
            record.groups =
                load_groups::<ExerciseRecordGroup, ExerciseRecord>(conn, &RECORD_SETS, &record.id)?
                    .into_iter()
                    .map(|(group, records)| ExerciseRecordGroup { records, ..group })
                    .collect();
            Ok(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SetValues;
    use crate::repositories::test_support::{create_test_user, setup_test_db};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pushups(date: NaiveDate, reps: &[i32]) -> RecordFields {
        RecordFields {
            workout_id: None,
            date,
            duration_secs: Some(600),
            notes: None,
            groups: vec![GroupInput {
                exercise_id: "seed-exercise-push-up".to_string(),
                sets: reps
                    .iter()
                    .map(|r| SetValues {
                        reps: Some(*r),
                        weight: None,
                        time_secs: None,
                    })
                    .collect(),
            }],
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = WorkoutRecordRepository::new(pool);

        let record = repo
            .create("user1", pushups(date(2024, 3, 1), &[20, 15, 12]))
            .await
            .unwrap();

        assert_eq!(record.date, date(2024, 3, 1));
        assert_eq!(record.groups.len(), 1);
        assert_eq!(record.groups[0].exercise_name, "Push-up");
        assert_eq!(record.groups[0].records.len(), 3);
        assert_eq!(record.groups[0].records[2].values.reps, Some(12));

        let found = repo.find_by_id(&record.id, "user1").await.unwrap();
        assert!(found.is_some());
        assert!(repo.find_by_id(&record.id, "other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_paginated_and_filtered() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = WorkoutRecordRepository::new(pool);

        for day in 1..=5 {
            repo.create("user1", pushups(date(2024, 3, day), &[10]))
                .await
                .unwrap();
        }

        let first_page = repo
            .find_by_user_paginated("user1", None, None, 2, 0)
            .await
            .unwrap();
        assert_eq!(first_page.len(), 2);
        assert_eq!(first_page[0].date, date(2024, 3, 5));
        assert_eq!(first_page[1].date, date(2024, 3, 4));

        let filtered = repo
            .find_by_user_paginated(
                "user1",
                Some(date(2024, 3, 2)),
                Some(date(2024, 3, 3)),
                10,
                0,
            )
            .await
            .unwrap();
        assert_eq!(filtered.len(), 2);

        assert_eq!(repo.count_by_user("user1", None, None).await.unwrap(), 5);
        assert_eq!(
            repo.count_by_user("user1", Some(date(2024, 3, 4)), None)
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_find_in_range_is_inclusive_and_ascending() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = WorkoutRecordRepository::new(pool);

        for day in [1, 10, 20, 30] {
            repo.create("user1", pushups(date(2024, 4, day), &[10]))
                .await
                .unwrap();
        }

        let records = repo
            .find_in_range("user1", date(2024, 4, 10), date(2024, 4, 20))
            .await
            .unwrap();

        let dates: Vec<_> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 4, 10), date(2024, 4, 20)]);
        assert_eq!(records[0].groups.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = WorkoutRecordRepository::new(pool);

        let record = repo
            .create("user1", pushups(date(2024, 5, 1), &[10, 10]))
            .await
            .unwrap();

        let updated = repo
            .update(&record.id, "user1", pushups(date(2024, 5, 2), &[25]))
            .await
            .unwrap();
        assert!(updated);

        let found = repo.find_by_id(&record.id, "user1").await.unwrap().unwrap();
        assert_eq!(found.date, date(2024, 5, 2));
        assert_eq!(found.groups[0].records.len(), 1);

        assert!(!repo.delete(&record.id, "other").await.unwrap());
        assert!(repo.delete(&record.id, "user1").await.unwrap());
        assert!(repo.find_by_id(&record.id, "user1").await.unwrap().is_none());
    }
}
