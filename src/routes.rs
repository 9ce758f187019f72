use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Extension, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::db::DbPool;
use crate::handlers::{
    auth, body_weights, equipment, exercises, health, muscle_sizes, muscles, progress,
    workout_records, workouts,
};
use crate::repositories::{
    BodyWeightRepository, EquipmentRepository, ExerciseRepository, MuscleRepository,
    MuscleSizeRepository, UserRepository, WorkoutRecordRepository, WorkoutRepository,
};
use crate::token::TokenService;

pub fn create_router(pool: DbPool, tokens: TokenService, cors: CorsLayer) -> Router {
    // Repositories
    let user_repo = UserRepository::new(pool.clone());
    let muscle_repo = MuscleRepository::new(pool.clone());
    let equipment_repo = EquipmentRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let record_repo = WorkoutRecordRepository::new(pool.clone());
    let body_weight_repo = BodyWeightRepository::new(pool.clone());
    let muscle_size_repo = MuscleSizeRepository::new(pool.clone());

    // Handler states
    let auth_state = auth::AuthState {
        user_repo: user_repo.clone(),
        tokens: tokens.clone(),
    };
    let muscles_state = muscles::MusclesState {
        muscle_repo: muscle_repo.clone(),
    };
    let equipment_state = equipment::EquipmentState {
        equipment_repo: equipment_repo.clone(),
    };
    let exercises_state = exercises::ExercisesState {
        exercise_repo: exercise_repo.clone(),
        muscle_repo: muscle_repo.clone(),
        equipment_repo,
    };
    let workouts_state = workouts::WorkoutsState {
        workout_repo: workout_repo.clone(),
        exercise_repo: exercise_repo.clone(),
        record_repo: record_repo.clone(),
    };
    let records_state = workout_records::WorkoutRecordsState {
        record_repo: record_repo.clone(),
        workout_repo,
        exercise_repo: exercise_repo.clone(),
    };
    let body_weights_state = body_weights::BodyWeightsState { body_weight_repo };
    let muscle_sizes_state = muscle_sizes::MuscleSizesState {
        muscle_size_repo,
        muscle_repo,
    };
    let progress_state = progress::ProgressState {
        record_repo,
        exercise_repo,
    };

    let health = Router::new()
        .route("/health", get(health::health_check))
        .with_state(pool);

    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/users", get(auth::list_users).post(auth::create_user))
        .route("/api/users/{id}", delete(auth::delete_user))
        .route("/api/users/{id}/promote", post(auth::promote_user))
        .route("/api/users/{id}/impersonate", post(auth::impersonate))
        .with_state(auth_state)
        // Muscles
        .route("/api/muscles", get(muscles::list).post(muscles::create))
        .route("/api/muscles/by-name/{name}", get(muscles::show_by_name))
        .route(
            "/api/muscles/{id}",
            get(muscles::show).put(muscles::update).delete(muscles::delete),
        )
        .route("/api/muscles/{id}/children", get(muscles::children))
        .with_state(muscles_state)
        // Equipment
        .route("/api/equipment", get(equipment::list).post(equipment::create))
        .route("/api/equipment/by-name/{name}", get(equipment::show_by_name))
        .route(
            "/api/equipment/{id}",
            get(equipment::show)
                .put(equipment::update)
                .delete(equipment::delete),
        )
        .with_state(equipment_state)
        // Exercises
        .route("/api/exercises", get(exercises::list).post(exercises::create))
        .route(
            "/api/exercises/{id}",
            get(exercises::show)
                .put(exercises::update)
                .delete(exercises::delete),
        )
        .with_state(exercises_state)
        // Workouts
        .route("/api/workouts", get(workouts::list).post(workouts::create))
        .route("/api/workouts/count", get(workouts::count))
        .route(
            "/api/workouts/{id}",
            get(workouts::show)
                .put(workouts::update)
                .delete(workouts::delete),
        )
        .route("/api/workouts/{id}/records", post(workouts::create_record))
        .with_state(workouts_state)
        // Workout records
        .route(
            "/api/workout-records",
            get(workout_records::list).post(workout_records::create),
        )
        .route(
            "/api/workout-records/{id}",
            get(workout_records::show)
                .put(workout_records::update)
                .delete(workout_records::delete),
        )
        .with_state(records_state)
        // Body measurements
        .route(
            "/api/body-weights",
            get(body_weights::list).post(body_weights::create),
        )
        .route("/api/body-weights/summary", get(body_weights::summary))
        .route(
            "/api/body-weights/{id}",
            get(body_weights::show)
                .put(body_weights::update)
                .delete(body_weights::delete),
        )
        .with_state(body_weights_state)
        .route(
            "/api/muscle-sizes",
            get(muscle_sizes::list).post(muscle_sizes::create),
        )
        .route(
            "/api/muscle-sizes/{id}",
            get(muscle_sizes::show)
                .put(muscle_sizes::update)
                .delete(muscle_sizes::delete),
        )
        .with_state(muscle_sizes_state)
        // Progress
        .route("/api/progress", get(progress::overview))
        .route("/api/progress/strikes", get(progress::strikes))
        .route("/api/progress/buckets", get(progress::buckets))
        .route("/api/progress/exercises/{id}", get(progress::exercise))
        .with_state(progress_state)
        .merge(health)
        // The auth extractors look these up per request
        .layer(Extension(tokens))
        .layer(Extension(user_repo))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Allows only `origin` when set, any origin otherwise.
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match origin.map(|o| o.parse::<HeaderValue>()) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            tracing::warn!("Ignoring invalid CORS_ORIGIN; cross-origin requests are refused");
            layer
        }
        None => layer.allow_origin(Any),
    }
}
