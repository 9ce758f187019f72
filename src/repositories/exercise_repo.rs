use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use uuid::Uuid;

use super::set_groups::{references_exercise, RECORD_SETS, WORKOUT_SETS};
use super::{blocking, placeholders};
use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{Equipment, Exercise, ExerciseMuscle, ExerciseMuscleInput, ExerciseType, FromSqliteRow};

const IN_USE: &str = "Exercise is used by a workout or record";
const TYPE_IN_USE: &str = "Cannot change the type of an exercise that is in use";

/// Validated values for creating or updating an exercise.
#[derive(Debug, Clone)]
pub struct ExerciseFields {
    pub name: String,
    pub description: Option<String>,
    pub exercise_type: ExerciseType,
    pub muscles: Vec<ExerciseMuscleInput>,
    pub equipment_ids: Vec<String>,
}

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Exercise>> {
        let id = id.to_string();
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?")?;
            let exercise = stmt.query_row([&id], Exercise::from_row).optional()?;
            match exercise {
                Some(exercise) => Ok(Some(with_relations(&*conn, exercise)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Several exercises at once; unknown ids are skipped.
    pub async fn find_many(&self, ids: &[String]) -> Result<Vec<Exercise>> {
        let ids = ids.to_vec();
        blocking(&self.pool, move |conn| {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let mut stmt = conn.prepare(&format!(
                "SELECT * FROM exercises WHERE id IN ({})",
                placeholders(ids.len())
            ))?;
            let exercises = stmt
                .query_map(rusqlite::params_from_iter(ids.iter()), Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            exercises
                .into_iter()
                .map(|e| with_relations(&*conn, e))
                .collect()
        })
        .await
    }

    /// Global exercises plus those created by `user_id`.
    pub async fn find_available_for_user(
        &self,
        user_id: &str,
        exercise_type: Option<ExerciseType>,
    ) -> Result<Vec<Exercise>> {
        let user_id = user_id.to_string();
        let exercise_type = exercise_type.map(|t| t.as_str());
        blocking(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM exercises
                 WHERE (user_id IS NULL OR user_id = ?1)
                   AND (?2 IS NULL OR exercise_type = ?2)
                 ORDER BY name",
            )?;
            let exercises = stmt
                .query_map(rusqlite::params![user_id, exercise_type], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            exercises
                .into_iter()
                .map(|e| with_relations(&*conn, e))
                .collect()
        })
        .await
    }

    /// `user_id = None` creates a global exercise.
    pub async fn create(&self, user_id: Option<&str>, fields: ExerciseFields) -> Result<Exercise> {
        let id = Uuid::new_v4().to_string();
        let user_id = user_id.map(str::to_string);
        let now = Utc::now();

        blocking(&self.pool, move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO exercises (id, name, description, exercise_type, user_id, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    id,
                    fields.name,
                    fields.description,
                    fields.exercise_type.as_str(),
                    user_id,
                    now
                ],
            )?;
            insert_relations(&tx, &id, &fields)?;
            let exercise = tx.query_row("SELECT * FROM exercises WHERE id = ?", [&id], Exercise::from_row)?;
            let exercise = with_relations(&tx, exercise)?;
            tx.commit()?;
            Ok(exercise)
        })
        .await
    }

    /// Replaces every field, including the muscle and equipment links.
    /// Fails with `Conflict` when the type changes while sets still use it.
    pub async fn update(&self, id: &str, fields: ExerciseFields) -> Result<bool> {
        let id = id.to_string();
        blocking(&self.pool, move |conn| {
            // Immediate, so no workout can start using the exercise between
            // the check and the write.
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let current = tx
                .query_row(
                    "SELECT exercise_type FROM exercises WHERE id = ?",
                    [&id],
                    |row| ExerciseType::from_column(row, "exercise_type"),
                )
                .optional()?;
            let Some(current) = current else {
                return Ok(false);
            };
            if current != fields.exercise_type && in_use(&tx, &id)? {
                return Err(AppError::Conflict(TYPE_IN_USE.to_string()));
            }

            tx.execute(
                "UPDATE exercises SET name = ?, description = ?, exercise_type = ? WHERE id = ?",
                rusqlite::params![
                    fields.name,
                    fields.description,
                    fields.exercise_type.as_str(),
                    id
                ],
            )?;
            tx.execute("DELETE FROM exercise_muscles WHERE exercise_id = ?", [&id])?;
            tx.execute("DELETE FROM exercise_equipment WHERE exercise_id = ?", [&id])?;
            insert_relations(&tx, &id, &fields)?;
            tx.commit()?;
            Ok(true)
        })
        .await
    }

    /// Fails with `Conflict` while a workout template (deleted ones
    /// included) or a record refers to the exercise.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        blocking(&self.pool, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            if in_use(&tx, &id)? {
                return Err(AppError::Conflict(IN_USE.to_string()));
            }
            let rows = tx.execute("DELETE FROM exercises WHERE id = ?", [&id])?;
            tx.commit()?;
            Ok(rows > 0)
        })
        .await
    }
}

fn in_use(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    Ok(references_exercise(conn, &WORKOUT_SETS, id)? || references_exercise(conn, &RECORD_SETS, id)?)
}

fn insert_relations(conn: &Connection, exercise_id: &str, fields: &ExerciseFields) -> rusqlite::Result<()> {
    let mut insert_muscle = conn.prepare(
        "INSERT INTO exercise_muscles (exercise_id, muscle_id, is_primary) VALUES (?, ?, ?)
         ON CONFLICT(exercise_id, muscle_id) DO UPDATE SET is_primary = MAX(is_primary, excluded.is_primary)",
    )?;
    for muscle in &fields.muscles {
        insert_muscle.execute(rusqlite::params![exercise_id, muscle.muscle_id, muscle.is_primary])?;
    }

    let mut insert_equipment = conn.prepare(
        "INSERT OR IGNORE INTO exercise_equipment (exercise_id, equipment_id) VALUES (?, ?)",
    )?;
    for equipment_id in &fields.equipment_ids {
        insert_equipment.execute(rusqlite::params![exercise_id, equipment_id])?;
    }

    Ok(())
}

fn with_relations(conn: &Connection, mut exercise: Exercise) -> Result<Exercise> {
    let mut muscles_stmt = conn.prepare_cached(
        "SELECT em.muscle_id, m.name, em.is_primary
         FROM exercise_muscles em
         JOIN muscles m ON em.muscle_id = m.id
         WHERE em.exercise_id = ?
         ORDER BY em.is_primary DESC, m.name",
    )?;
    exercise.muscles = muscles_stmt
        .query_map([&exercise.id], ExerciseMuscle::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut equipment_stmt = conn.prepare_cached(
        "SELECT eq.* FROM exercise_equipment ee
         JOIN equipment eq ON ee.equipment_id = eq.id
         WHERE ee.exercise_id = ?
         ORDER BY eq.name",
    )?;
    exercise.equipment = equipment_stmt
        .query_map([&exercise.id], Equipment::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(exercise)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupInput, SetValues};
    use crate::repositories::test_support::{create_test_user, setup_test_db};
    use crate::repositories::WorkoutRepository;

    fn fields(name: &str, exercise_type: ExerciseType) -> ExerciseFields {
        ExerciseFields {
            name: name.to_string(),
            description: None,
            exercise_type,
            muscles: Vec::new(),
            equipment_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_exercise_with_relations() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = ExerciseRepository::new(pool);

        let mut input = fields("Goblet Squat", ExerciseType::WeightAndReps);
        input.muscles = vec![
            ExerciseMuscleInput {
                muscle_id: "seed-muscle-glutes".to_string(),
                is_primary: false,
            },
            ExerciseMuscleInput {
                muscle_id: "seed-muscle-quadriceps".to_string(),
                is_primary: true,
            },
        ];
        input.equipment_ids = vec!["seed-equipment-kettlebell".to_string()];

        let exercise = repo.create(Some("user1"), input).await.unwrap();

        assert_eq!(exercise.name, "Goblet Squat");
        assert_eq!(exercise.user_id.as_deref(), Some("user1"));
        assert_eq!(exercise.muscles.len(), 2);
        // Primary muscles come first.
        assert_eq!(exercise.muscles[0].name, "Quadriceps");
        assert!(exercise.muscles[0].is_primary);
        assert_eq!(exercise.equipment.len(), 1);
        assert_eq!(exercise.equipment[0].name, "Kettlebell");
    }

    #[tokio::test]
    async fn test_find_by_id_not_exists() {
        let repo = ExerciseRepository::new(setup_test_db());

        let found = repo.find_by_id("nonexistent").await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_available_for_user() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        create_test_user(&pool, "user2");
        let repo = ExerciseRepository::new(pool);

        let global = repo
            .find_available_for_user("user1", None)
            .await
            .unwrap()
            .len();

        repo.create(Some("user1"), fields("Cossack Squat", ExerciseType::Reps))
            .await
            .unwrap();
        repo.create(Some("user2"), fields("Nordic Curl", ExerciseType::Reps))
            .await
            .unwrap();

        let user1 = repo.find_available_for_user("user1", None).await.unwrap();
        assert_eq!(user1.len(), global + 1);
        assert!(user1.iter().any(|e| e.name == "Cossack Squat"));
        assert!(!user1.iter().any(|e| e.name == "Nordic Curl"));

        let timed = repo
            .find_available_for_user("user1", Some(ExerciseType::Time))
            .await
            .unwrap();
        assert!(timed.iter().all(|e| e.exercise_type == ExerciseType::Time));
        assert!(timed.iter().any(|e| e.name == "Plank"));
    }

    #[tokio::test]
    async fn test_update_replaces_relations() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = ExerciseRepository::new(pool);

        let mut input = fields("Row", ExerciseType::WeightAndReps);
        input.equipment_ids = vec!["seed-equipment-barbell".to_string()];
        let exercise = repo.create(Some("user1"), input).await.unwrap();

        let mut update = fields("Dumbbell Row", ExerciseType::WeightAndReps);
        update.equipment_ids = vec!["seed-equipment-dumbbell".to_string()];
        assert!(repo.update(&exercise.id, update).await.unwrap());

        let found = repo.find_by_id(&exercise.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Dumbbell Row");
        assert_eq!(found.equipment.len(), 1);
        assert_eq!(found.equipment[0].name, "Dumbbell");

        assert!(!repo
            .update("missing", fields("x", ExerciseType::Reps))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_delete_unused() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = ExerciseRepository::new(pool);

        let exercise = repo
            .create(Some("user1"), fields("Dragon Flag", ExerciseType::Reps))
            .await
            .unwrap();

        assert!(repo.delete(&exercise.id).await.unwrap());
        assert!(repo.find_by_id(&exercise.id).await.unwrap().is_none());
        assert!(!repo.delete(&exercise.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_in_use_exercise_is_protected() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = ExerciseRepository::new(pool.clone());
        let workouts = WorkoutRepository::new(pool);

        let exercise = repo
            .create(Some("user1"), fields("Dragon Flag", ExerciseType::Reps))
            .await
            .unwrap();
        let workout = workouts
            .create(
                "user1",
                "Core",
                None,
                vec![GroupInput {
                    exercise_id: exercise.id.clone(),
                    sets: vec![SetValues {
                        reps: Some(5),
                        weight: None,
                        time_secs: None,
                    }],
                }],
            )
            .await
            .unwrap();
        // Soft-deleted templates still hold their sets.
        workouts.soft_delete(&workout.id, "user1").await.unwrap();

        let deleted = repo.delete(&exercise.id).await;
        assert!(matches!(deleted, Err(AppError::Conflict(_))));

        let retyped = repo
            .update(&exercise.id, fields("Dragon Flag", ExerciseType::Time))
            .await;
        assert!(matches!(retyped, Err(AppError::Conflict(_))));

        // Same type, new name is fine.
        assert!(repo
            .update(&exercise.id, fields("Dragon Flag Negative", ExerciseType::Reps))
            .await
            .unwrap());
        assert!(repo.find_by_id(&exercise.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_many_skips_unknown() {
        let repo = ExerciseRepository::new(setup_test_db());

        let found = repo
            .find_many(&[
                "seed-exercise-squat".to_string(),
                "unknown".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].exercise_type, ExerciseType::WeightAndReps);
    }
}
