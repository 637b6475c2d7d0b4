//! Exercise commands. Each one replaces one exercise list of a day.

use crate::db::AppState;
use crate::models::{ExerciseKind, ExercisePatch, TrainingProgram};
use crate::store::ProgramStore;

use super::tree::day_path;
use super::{apply_edit, edit_program};

/// Append a default exercise; returns its id
pub async fn add_exercise<S: ProgramStore>(
  state: &AppState<S>,
  day_id: String,
  kind: ExerciseKind,
) -> Result<Option<String>, String> {
  Ok(
    apply_edit(state, "add_exercise", |p| {
      p.add_exercise(&day_path(p, &day_id)?, kind)
    })
    .await,
  )
}

/// Partial update of whichever list holds `exercise_id`
pub async fn update_exercise<S: ProgramStore>(
  state: &AppState<S>,
  day_id: String,
  exercise_id: String,
  patch: ExercisePatch,
) -> Result<Option<TrainingProgram>, String> {
  edit_program(state, "update_exercise", |p| {
    let path = day_path(p, &day_id)?;
    let kind = p.exercise_kind(&path, &exercise_id)?;
    p.update_exercise(&path, kind, &exercise_id, &patch)
  })
  .await
}

pub async fn remove_exercise<S: ProgramStore>(
  state: &AppState<S>,
  day_id: String,
  exercise_id: String,
) -> Result<Option<TrainingProgram>, String> {
  edit_program(state, "remove_exercise", |p| {
    let path = day_path(p, &day_id)?;
    let kind = p.exercise_kind(&path, &exercise_id)?;
    p.remove_exercise(&path, kind, &exercise_id)
  })
  .await
}
