//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - An in-memory program store
//! - Sample program factories

use std::sync::{Arc, Mutex};
use std::time::Duration;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db::AppState;
use crate::models::{
  AthleteStats, ConditioningEntry, ExerciseEntry, TrainingCycle, TrainingDay, TrainingProgram,
  TrainingWeek,
};
use crate::store::{PersistedState, ProgramStore, StoreError};

// ---------------------------------------------------------------------------
/// Database Test Utilities
// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

// ---------------------------------------------------------------------------
/// In-memory Store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryInner {
  state: PersistedState,
  saves: usize,
  fail: bool,
}

/// Store that keeps the last saved state and counts writes
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
  pub fn with_state(state: PersistedState) -> Self {
    let store = Self::default();
    store.inner.lock().unwrap().state = state;
    store
  }

  /// Every save fails with an I/O error
  pub fn failing() -> Self {
    let store = Self::default();
    store.inner.lock().unwrap().fail = true;
    store
  }

  pub fn snapshot(&self) -> PersistedState {
    self.inner.lock().unwrap().state.clone()
  }

  pub fn save_count(&self) -> usize {
    self.inner.lock().unwrap().saves
  }
}

impl ProgramStore for MemoryStore {
  async fn load(&self) -> Result<PersistedState, StoreError> {
    Ok(self.snapshot())
  }

  async fn save(&self, state: PersistedState) -> Result<(), StoreError> {
    let mut inner = self.inner.lock().unwrap();
    if inner.fail {
      return Err(StoreError::Io(std::io::Error::other("disk full")));
    }
    inner.state = state;
    inner.saves += 1;
    Ok(())
  }

  async fn clear(&self) -> Result<(), StoreError> {
    self.inner.lock().unwrap().state = PersistedState::default();
    Ok(())
  }
}

/// App state over an empty in-memory store, with a short save debounce
pub async fn setup_test_state() -> (AppState<MemoryStore>, MemoryStore) {
  setup_test_state_with(Vec::new()).await
}

/// App state holding `programs`, the first one active
pub async fn setup_test_state_with(
  programs: Vec<TrainingProgram>,
) -> (AppState<MemoryStore>, MemoryStore) {
  let store = MemoryStore::with_state(PersistedState {
    active_program_id: programs.first().map(|p| p.id.clone()),
    programs,
  });
  let mut config = AppConfig::in_dir(std::env::temp_dir());
  config.save_debounce = Duration::from_millis(20);

  let state = AppState::load(store.clone(), config)
    .await
    .expect("Failed to load test state");
  (state, store)
}

// ---------------------------------------------------------------------------
/// Sample Program Factories
// ---------------------------------------------------------------------------

/// Strength row with the given movement, prescription and % 1RM
pub fn strength(name: &str, category: &str, sets: u32, reps: &str, intensity: &str) -> ExerciseEntry {
  ExerciseEntry {
    name: name.to_string(),
    category: category.to_string(),
    sets,
    reps: reps.to_string(),
    intensity: intensity.to_string(),
    ..ExerciseEntry::new_strength()
  }
}

/// Conditioning row at a MAS zone over `distance` meters
pub fn intervals(zone: &str, sets: u32, distance: f64) -> ConditioningEntry {
  let mut ex = ConditioningEntry::new_conditioning();
  ex.entry.name = "Intervals".to_string();
  ex.entry.intensity = zone.to_string();
  ex.entry.sets = sets;
  ex.distance = Some(distance);
  ex
}

fn day(position: usize, strength: Vec<ExerciseEntry>, conditioning: Vec<ConditioningEntry>) -> TrainingDay {
  let mut day = TrainingDay::new(position);
  day.strength_exercises = strength.into_iter().map(Arc::new).collect();
  day.conditioning_exercises = conditioning.into_iter().map(Arc::new).collect();
  day
}

fn week(week_number: u32, days: Vec<TrainingDay>) -> TrainingWeek {
  let mut week = TrainingWeek::new(week_number);
  week.days = days.into_iter().map(Arc::new).collect();
  week
}

/// Two cycles: C1 has weeks 1 and 2 (week 2 with two days), C2 has week 1.
///
/// C1 squat 1RM is 100 and C2's is 120; the first day of each cycle opens
/// with a back squat at 80% 1RM.
pub fn sample_program() -> TrainingProgram {
  let mut first = TrainingCycle::new(1);
  first.name = "Accumulation".to_string();
  first.stats = AthleteStats {
    mas: 4.5,
    squat_1rm: Some(100.0),
    deadlift_1rm: Some(140.0),
    ..AthleteStats::zeroed()
  };
  first.weeks = vec![
    Arc::new(week(
      1,
      vec![day(
        1,
        vec![
          strength("Back Squat", "Squat", 4, "5", "80"),
          strength("Romanian Deadlift", "Hinge", 3, "8", "60"),
        ],
        vec![intervals("MAS", 6, 200.0)],
      )],
    )),
    Arc::new(week(
      2,
      vec![
        day(1, vec![strength("Back Squat", "Squat", 5, "5", "82")], Vec::new()),
        day(2, Vec::new(), vec![intervals("MAS+20%", 8, 100.0)]),
      ],
    )),
  ];

  let mut second = TrainingCycle::new(2);
  second.name = "Intensification".to_string();
  second.stats = AthleteStats {
    mas: 4.8,
    squat_1rm: Some(120.0),
    ..AthleteStats::zeroed()
  };
  second.weeks = vec![Arc::new(week(
    1,
    vec![day(1, vec![strength("Back Squat", "Squat", 3, "3", "80")], Vec::new())],
  ))];

  let mut program = TrainingProgram::new();
  program.athlete_name = "Sample Athlete".to_string();
  program.goal = "Rugby pre-season".to_string();
  program.cycles = vec![Arc::new(first), Arc::new(second)];
  program
}

// ---------------------------------------------------------------------------
/// Test Macros
// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> =
      sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = 'storage'")
        .fetch_all(&pool)
        .await
        .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_sample_program_shape() {
    let program = sample_program();
    assert_eq!(program.cycles.len(), 2);
    assert_eq!(program.cycles[0].weeks.len(), 2);
    assert_eq!(program.cycles[0].weeks[1].days.len(), 2);
    assert_eq!(program.cycles[1].weeks[0].week_number, 1);
    assert_eq!(program.cycles[0].weeks[0].days[0].strength_exercises[0].intensity, "80");
  }

  #[tokio::test]
  async fn test_memory_store_counts_saves() {
    let store = MemoryStore::default();
    store.save(PersistedState::default()).await.unwrap();
    assert_eq!(store.save_count(), 1);
    assert!(MemoryStore::failing().save(PersistedState::default()).await.is_err());
  }
}
