pub mod body_weight_repo;
pub mod equipment_repo;
pub mod exercise_repo;
pub mod muscle_repo;
pub mod muscle_size_repo;
mod set_groups;
pub mod user_repo;
pub mod workout_record_repo;
pub mod workout_repo;

pub use body_weight_repo::BodyWeightRepository;
pub use equipment_repo::EquipmentRepository;
pub use exercise_repo::ExerciseRepository;
pub use muscle_repo::MuscleRepository;
pub use muscle_size_repo::MuscleSizeRepository;
pub use user_repo::UserRepository;
pub use workout_record_repo::WorkoutRecordRepository;
pub use workout_repo::WorkoutRepository;

use crate::db::{DbConnection, DbPool};
use crate::error::{AppError, Result};

/// Runs `f` with a pooled connection on the blocking thread pool.
async fn blocking<T, F>(pool: &DbPool, f: F) -> Result<T>
where
    F: FnOnce(&mut DbConnection) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
}

/// `?, ?, ?` for an `IN (...)` clause with `n` parameters.
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::{create_memory_pool, DbPool};
    use crate::migrations::run_migrations_for_tests;

    pub fn setup_test_db() -> DbPool {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        pool
    }

    pub fn create_test_user(pool: &DbPool, user_id: &str) {
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO users (id, username, email, password_hash, role, created_at)
             VALUES (?, ?, ?, 'hash', 'user', '2024-01-01 00:00:00+00:00')",
            rusqlite::params![
                user_id,
                format!("user_{}", user_id),
                format!("{}@example.com", user_id)
            ],
        )
        .unwrap();
    }
}
