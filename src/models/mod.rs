pub mod equipment;
pub mod exercise;
pub mod from_row;
pub mod measurement;
pub mod muscle;
pub mod page;
pub mod user;
pub mod workout;
pub mod workout_record;

pub use equipment::{Equipment, EquipmentInput};
pub use exercise::{
    CreateExercise, Exercise, ExerciseMuscle, ExerciseMuscleInput, ExerciseType, UpdateExercise,
};
pub use from_row::FromSqliteRow;
pub use measurement::{BodyWeight, BodyWeightInput, MuscleSize, MuscleSizeInput};
pub use muscle::{Muscle, MuscleInput, MuscleWithChildren};
pub use page::{Page, PageQuery};
pub use user::{AuthResponse, CreateUser, LoginCredentials, User, UserRole};
pub use workout::{ExerciseSet, ExerciseSetGroup, GroupInput, SetValues, Workout, WorkoutInput};
pub use workout_record::{
    ExerciseRecord, ExerciseRecordGroup, RecordFromWorkout, WorkoutRecord, WorkoutRecordInput,
};
