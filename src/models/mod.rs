pub mod exercise;
pub mod patch;
pub mod program;
pub mod stats;

pub use exercise::{ConditioningEntry, ExerciseEntry, ExerciseKind, IntensityUnit};
pub use patch::{DayPatch, ExercisePatch, ProgramInfoPatch, StatsPatch};
pub use program::{DayLocation, TrainingCycle, TrainingDay, TrainingProgram, TrainingWeek};
pub use stats::{AthleteStats, MovementPattern};

/// Fresh globally unique identifier for a new entity
pub fn new_id() -> String {
  uuid::Uuid::new_v4().to_string()
}

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> i64 {
  chrono::Utc::now().timestamp_millis()
}
