//! Cycle, week and day commands on the active program

use crate::db::AppState;
use crate::lens::{CyclePath, DayPath, WeekPath};
use crate::models::{DayLocation, DayPatch, StatsPatch, TrainingProgram};
use crate::store::ProgramStore;

use super::{apply_edit, edit_program};

/// Path to a day anywhere in the program
pub(crate) fn day_path(program: &TrainingProgram, day_id: &str) -> Option<DayPath> {
  program.locate_day(day_id).map(|loc| DayPath::from(&loc))
}

// ---------------------------------------------------------------------------
/// Cycles
// ---------------------------------------------------------------------------

/// Returns the new cycle's id
pub async fn add_cycle<S: ProgramStore>(state: &AppState<S>) -> Result<Option<String>, String> {
  Ok(apply_edit(state, "add_cycle", |p| Some(p.add_cycle())).await)
}

pub async fn remove_cycle<S: ProgramStore>(
  state: &AppState<S>,
  cycle_id: String,
) -> Result<Option<TrainingProgram>, String> {
  edit_program(state, "remove_cycle", |p| p.remove_cycle(&cycle_id)).await
}

pub async fn rename_cycle<S: ProgramStore>(
  state: &AppState<S>,
  cycle_id: String,
  name: String,
) -> Result<Option<TrainingProgram>, String> {
  edit_program(state, "rename_cycle", |p| {
    p.rename_cycle(&CyclePath::new(cycle_id), &name)
  })
  .await
}

pub async fn update_cycle_stats<S: ProgramStore>(
  state: &AppState<S>,
  cycle_id: String,
  patch: StatsPatch,
) -> Result<Option<TrainingProgram>, String> {
  edit_program(state, "update_cycle_stats", |p| {
    p.update_cycle_stats(&CyclePath::new(cycle_id), patch)
  })
  .await
}

// ---------------------------------------------------------------------------
/// Weeks
// ---------------------------------------------------------------------------

/// Returns the new week's id
pub async fn add_week<S: ProgramStore>(
  state: &AppState<S>,
  cycle_id: String,
) -> Result<Option<String>, String> {
  Ok(apply_edit(state, "add_week", |p| p.add_week(&CyclePath::new(cycle_id))).await)
}

pub async fn remove_week<S: ProgramStore>(
  state: &AppState<S>,
  cycle_id: String,
  week_id: String,
) -> Result<Option<TrainingProgram>, String> {
  edit_program(state, "remove_week", |p| {
    p.remove_week(&WeekPath::new(cycle_id, week_id))
  })
  .await
}

pub async fn rename_week<S: ProgramStore>(
  state: &AppState<S>,
  cycle_id: String,
  week_id: String,
  title: String,
) -> Result<Option<TrainingProgram>, String> {
  edit_program(state, "rename_week", |p| {
    p.rename_week(&WeekPath::new(cycle_id, week_id), &title)
  })
  .await
}

// ---------------------------------------------------------------------------
/// Days
// ---------------------------------------------------------------------------

/// Returns the new day's id
pub async fn add_day<S: ProgramStore>(
  state: &AppState<S>,
  cycle_id: String,
  week_id: String,
) -> Result<Option<String>, String> {
  Ok(apply_edit(state, "add_day", |p| p.add_day(&WeekPath::new(cycle_id, week_id))).await)
}

pub async fn remove_day<S: ProgramStore>(
  state: &AppState<S>,
  day_id: String,
) -> Result<Option<TrainingProgram>, String> {
  edit_program(state, "remove_day", |p| p.remove_day(&day_path(p, &day_id)?)).await
}

pub async fn update_day<S: ProgramStore>(
  state: &AppState<S>,
  day_id: String,
  patch: DayPatch,
) -> Result<Option<TrainingProgram>, String> {
  edit_program(state, "update_day", |p| p.update_day(&day_path(p, &day_id)?, patch)).await
}

pub async fn toggle_fatigue_check<S: ProgramStore>(
  state: &AppState<S>,
  day_id: String,
  key: String,
) -> Result<Option<TrainingProgram>, String> {
  if !crate::catalog::is_fatigue_marker(&key) {
    return Err(format!("Unknown fatigue marker: {}", key));
  }
  edit_program(state, "toggle_fatigue_check", |p| {
    p.toggle_fatigue_check(&day_path(p, &day_id)?, &key)
  })
  .await
}

pub async fn locate_day<S: ProgramStore>(
  state: &AppState<S>,
  day_id: String,
) -> Result<Option<DayLocation>, String> {
  let library = state.library.lock().await;
  Ok(library.active().and_then(|p| p.locate_day(&day_id)))
}
