//! AI program generation command

use tracing::{info, warn};

use crate::db::AppState;
use crate::llm::ClaudeClient;
use crate::models::TrainingProgram;
use crate::store::ProgramStore;

use super::apply_edit;

/// Generate a microcycle and append it to the program active at the call.
///
/// The network call runs without holding the library lock; the result is
/// merged as one edit afterwards. If another program was selected in the
/// meantime nothing is added. Any failure leaves the program unchanged.
pub async fn generate_cycle<S: ProgramStore>(
  state: &AppState<S>,
  goal: String,
  experience: String,
) -> Result<TrainingProgram, String> {
  let program_id = state
    .library
    .lock()
    .await
    .active()
    .map(|p| p.id.clone())
    .ok_or_else(|| "No active program to add the generated cycle to".to_string())?;

  let client = ClaudeClient::from_config(&state.config.llm)
    .map_err(|e| format!("Failed to generate program: {}", e))?;

  let (generated, _usage) = client
    .generate_program(&goal, &experience)
    .await
    .map_err(|e| {
      warn!("Program generation failed: {}", e);
      format!("Failed to generate program: {}", e)
    })?;

  let mut failure = None;
  let merged = apply_edit(state, "generate_cycle", |p| {
    if p.id != program_id {
      return None;
    }
    match generated.into_cycle(p.cycles.len() + 1) {
      Ok(cycle) => {
        let (next, _) = p.push_cycle(cycle);
        let out = next.clone();
        Some((next, out))
      }
      Err(e) => {
        failure = Some(e);
        None
      }
    }
  })
  .await;

  let program = match (merged, failure) {
    (Some(program), _) => program,
    (None, Some(e)) => return Err(format!("Failed to generate program: {}", e)),
    (None, None) => {
      warn!("Program {} is no longer active; generated cycle dropped", program_id);
      return Err(format!(
        "Failed to generate program: program {} is no longer active",
        program_id
      ));
    }
  };

  info!("Added generated cycle to program {}", program.id);
  Ok(program)
}
