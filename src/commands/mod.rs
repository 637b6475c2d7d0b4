//! Command surface: every user action as one operation on shared state.
//!
//! Edits go through [`apply_edit`], which holds the library lock for the
//! whole edit, commits the new snapshot and schedules a debounced save.
//! A target that does not exist is a no-op reported as `Ok(None)`.

pub mod backup;
pub mod exercise;
pub mod generate;
pub mod report;
pub mod tree;

use serde::Serialize;
use tracing::{debug, info};

use crate::db::AppState;
use crate::library::ProgramLibrary;
use crate::models::{ProgramInfoPatch, TrainingProgram};
use crate::store::{PersistedState, ProgramStore};

/// Program list entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSummary {
  pub id: String,
  pub athlete_name: String,
  pub goal: String,
  pub cycle_count: usize,
  pub last_modified: i64,
  pub active: bool,
}

/// Run `f` against the active program and commit what it returns
pub(crate) async fn apply_edit<S, T, F>(state: &AppState<S>, action: &str, f: F) -> Option<T>
where
  S: ProgramStore,
  F: FnOnce(&TrainingProgram) -> Option<(TrainingProgram, T)>,
{
  let mut library = state.library.lock().await;
  let Some(active) = library.active() else {
    debug!("{}: no active program", action);
    return None;
  };
  let Some((next, out)) = f(active) else {
    debug!("{}: target not found", action);
    return None;
  };
  library.commit(next);
  state.saver.schedule(PersistedState::from(&*library)).await;
  Some(out)
}

/// [`apply_edit`] for edits that only produce a new program
pub(crate) async fn edit_program<S, F>(
  state: &AppState<S>,
  action: &str,
  f: F,
) -> Result<Option<TrainingProgram>, String>
where
  S: ProgramStore,
  F: FnOnce(&TrainingProgram) -> Option<TrainingProgram>,
{
  Ok(
    apply_edit(state, action, |program| {
      f(program).map(|next| {
        let out = next.clone();
        (next, out)
      })
    })
    .await,
  )
}

async fn schedule_save<S: ProgramStore>(state: &AppState<S>, library: &ProgramLibrary) {
  state.saver.schedule(PersistedState::from(library)).await;
}

pub async fn list_programs<S: ProgramStore>(
  state: &AppState<S>,
) -> Result<Vec<ProgramSummary>, String> {
  let library = state.library.lock().await;
  let active = library.active_program_id.as_deref();
  Ok(
    library
      .programs
      .iter()
      .map(|p| ProgramSummary {
        id: p.id.clone(),
        athlete_name: p.athlete_name.clone(),
        goal: p.goal.clone(),
        cycle_count: p.cycles.len(),
        last_modified: p.last_modified,
        active: active == Some(p.id.as_str()),
      })
      .collect(),
  )
}

pub async fn get_active_program<S: ProgramStore>(
  state: &AppState<S>,
) -> Result<Option<TrainingProgram>, String> {
  Ok(state.library.lock().await.active().cloned())
}

/// New seeded program, made active
pub async fn create_program<S: ProgramStore>(
  state: &AppState<S>,
) -> Result<TrainingProgram, String> {
  let mut library = state.library.lock().await;
  let id = library.create_program();
  schedule_save(state, &library).await;
  library
    .get(&id)
    .cloned()
    .ok_or_else(|| format!("Failed to create program {}", id))
}

pub async fn select_program<S: ProgramStore>(
  state: &AppState<S>,
  program_id: String,
) -> Result<bool, String> {
  let mut library = state.library.lock().await;
  let selected = library.select_program(&program_id);
  if selected {
    schedule_save(state, &library).await;
  }
  Ok(selected)
}

pub async fn delete_program<S: ProgramStore>(
  state: &AppState<S>,
  program_id: String,
) -> Result<bool, String> {
  let mut library = state.library.lock().await;
  let deleted = library.delete_program(&program_id);
  if deleted {
    schedule_save(state, &library).await;
  }
  Ok(deleted)
}

/// Athlete name and goal of the active program
pub async fn update_program_info<S: ProgramStore>(
  state: &AppState<S>,
  patch: ProgramInfoPatch,
) -> Result<Option<TrainingProgram>, String> {
  edit_program(state, "update_program_info", |p| Some(p.update_info(patch))).await
}

/// Write the current state now instead of waiting for the debounce
pub async fn save_now<S: ProgramStore>(state: &AppState<S>) -> Result<(), String> {
  let snapshot = PersistedState::from(&*state.library.lock().await);
  state
    .saver
    .flush(snapshot)
    .await
    .map_err(|e| format!("Failed to save programs: {}", e))
}

/// Delete every program, in memory and on disk
pub async fn reset_all<S: ProgramStore>(state: &AppState<S>) -> Result<(), String> {
  let mut library = state.library.lock().await;
  library.reset();
  state
    .saver
    .flush(PersistedState::default())
    .await
    .map_err(|e| format!("Failed to reset saved data: {}", e))?;
  state
    .saver
    .store()
    .clear()
    .await
    .map_err(|e| format!("Failed to reset saved data: {}", e))?;
  info!("All programs deleted");
  Ok(())
}
