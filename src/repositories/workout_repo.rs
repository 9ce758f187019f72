use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use super::blocking;
use super::set_groups::{delete_groups, insert_groups, load_groups, WORKOUT_SETS};
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{ExerciseSet, ExerciseSetGroup, FromSqliteRow, GroupInput, Workout};

/// Workout templates. Deleted workouts keep their row (records may still point
/// at them) but are invisible to every query here.
#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: &str,
        name: &str,
        description: Option<&str>,
        groups: Vec<GroupInput>,
    ) -> Result<Workout> {
        let id = Uuid::new_v4().to_string();
        let user_id = user_id.to_string();
        let name = name.to_string();
        let description = description.map(str::to_string);
        let now = Utc::now();

        blocking(&self.pool, move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO workouts (id, user_id, name, description, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![id, user_id, name, description, now, now],
            )?;
            insert_groups(&tx, &WORKOUT_SETS, &id, &groups)?;
            let workout = load_workout(&tx, &id, &user_id)?;
            tx.commit()?;
            workout.ok_or_else(|| AppError::Internal("created workout vanished".to_string()))
        })
        .await
    }

    /// Only returns the workout when `user_id` owns it.
    pub async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<Workout>> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| Ok(load_workout(conn, &id, &user_id)?)).await
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<Workout>> {
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM workouts
                 WHERE user_id = ? AND deleted_at IS NULL
                 ORDER BY updated_at DESC",
            )?;
            let workouts = stmt
                .query_map([&user_id], Workout::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let mut loaded = Vec::with_capacity(workouts.len());
            for mut workout in workouts {
                workout.groups = load_set_groups(&*conn, &workout.id)?;
                loaded.push(workout);
            }
            Ok(loaded)
        })
        .await
    }

    pub async fn count_by_user(&self, user_id: &str) -> Result<i64> {
        let user_id = user_id.to_string();
        blocking(&self.pool, move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM workouts WHERE user_id = ? AND deleted_at IS NULL",
                [&user_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
    }

    /// Replaces name, description and the whole set graph.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        name: &str,
        description: Option<&str>,
        groups: Vec<GroupInput>,
    ) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        let name = name.to_string();
        let description = description.map(str::to_string);
        let now = Utc::now();

        blocking(&self.pool, move |conn| {
            let tx = conn.transaction()?;
            let rows = tx.execute(
                "UPDATE workouts SET name = ?, description = ?, updated_at = ?
                 WHERE id = ? AND user_id = ? AND deleted_at IS NULL",
                rusqlite::params![name, description, now, id, user_id],
            )?;
            if rows == 0 {
                return Ok(false);
            }
            delete_groups(&tx, &WORKOUT_SETS, &id)?;
            insert_groups(&tx, &WORKOUT_SETS, &id, &groups)?;
            tx.commit()?;
            Ok(true)
        })
        .await
    }

    pub async fn soft_delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        let now = Utc::now();
        blocking(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE workouts SET deleted_at = ?
                 WHERE id = ? AND user_id = ? AND deleted_at IS NULL",
                rusqlite::params![now, id, user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }
}

fn load_workout(conn: &Connection, id: &str, user_id: &str) -> rusqlite::Result<Option<Workout>> {
    let workout = conn
        .query_row(
            "SELECT * FROM workouts WHERE id = ? AND user_id = ? AND deleted_at IS NULL",
            [id, user_id],
            Workout::from_row,
        )
        .optional()?;

    match workout {
        Some(mut workout) => {
            workout.groups = load_set_groups(conn, &workout.id)?;
            Ok(Some(workout))
        }
        None => Ok(None),
    }
}

fn load_set_groups(conn: &Connection, workout_id: &str) -> rusqlite::Result<Vec<ExerciseSetGroup>> {
    Ok(
        load_groups::<ExerciseSetGroup, ExerciseSet>(conn, &WORKOUT_SETS, workout_id)?
            .into_iter()
            .map(|(group, sets)| ExerciseSetGroup { sets, ..group })
            .collect(),
    )
}
