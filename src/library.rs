//! The program collection and which program is being edited.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{ProgramInfoPatch, TrainingProgram};

// ---------------------------------------------------------------------------
/// Error Types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
  #[error("Backup must contain a list of programs")]
  NotASequence,

  #[error("Backup could not be read: {0}")]
  Malformed(String),
}

impl Serialize for ImportError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

// ---------------------------------------------------------------------------
/// Program Library
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramLibrary {
  pub programs: Vec<TrainingProgram>,
  pub active_program_id: Option<String>,
}

impl ProgramLibrary {
  pub fn new(programs: Vec<TrainingProgram>, active_program_id: Option<String>) -> Self {
    Self {
      programs,
      active_program_id,
    }
  }

  pub fn get(&self, id: &str) -> Option<&TrainingProgram> {
    self.programs.iter().find(|p| p.id == id)
  }

  /// The program being edited, if the active id still resolves
  pub fn active(&self) -> Option<&TrainingProgram> {
    self.get(self.active_program_id.as_deref()?)
  }

  /// Append a seeded program and make it active; returns its id
  pub fn create_program(&mut self) -> String {
    let program = TrainingProgram::new();
    let id = program.id.clone();
    info!("Created program {}", id);
    self.programs.push(program);
    self.active_program_id = Some(id.clone());
    id
  }

  /// Remove a program; false when no such program exists
  pub fn delete_program(&mut self, id: &str) -> bool {
    let before = self.programs.len();
    self.programs.retain(|p| p.id != id);
    if self.programs.len() == before {
      debug!("Delete skipped, no program {}", id);
      return false;
    }
    if self.active_program_id.as_deref() == Some(id) {
      self.active_program_id = None;
    }
    info!("Deleted program {}", id);
    true
  }

  /// Make `id` active if it exists
  pub fn select_program(&mut self, id: &str) -> bool {
    if self.get(id).is_none() {
      debug!("Select skipped, no program {}", id);
      return false;
    }
    self.active_program_id = Some(id.to_string());
    true
  }

  /// Swap in a new snapshot of an existing program
  pub fn commit(&mut self, program: TrainingProgram) -> bool {
    match self.programs.iter_mut().find(|p| p.id == program.id) {
      Some(slot) => {
        *slot = program;
        true
      }
      None => false,
    }
  }

  /// Header edit on the active program; None when nothing is active
  pub fn update_program_info(&mut self, patch: ProgramInfoPatch) -> Option<&TrainingProgram> {
    let next = self.active()?.update_info(patch);
    let id = next.id.clone();
    self.commit(next);
    self.get(&id)
  }

  /// Replace every program from a backup document.
  ///
  /// On error the library is left exactly as it was.
  pub fn import_json(&mut self, text: &str) -> Result<usize, ImportError> {
    let doc: serde_json::Value =
      serde_json::from_str(text).map_err(|e| ImportError::Malformed(e.to_string()))?;
    if !doc.is_array() {
      return Err(ImportError::NotASequence);
    }
    let programs: Vec<TrainingProgram> =
      serde_json::from_value(doc).map_err(|e| ImportError::Malformed(e.to_string()))?;

    self.active_program_id = programs.first().map(|p| p.id.clone());
    self.programs = programs;
    info!("Imported {} programs", self.programs.len());
    Ok(self.programs.len())
  }

  /// All programs as an indented JSON array
  pub fn export_json(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&self.programs)
  }

  /// Drop everything, saved state included once persisted
  pub fn reset(&mut self) {
    self.programs.clear();
    self.active_program_id = None;
    info!("Program library reset");
  }
}

/// `StandardForce_Backup_YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
  format!("StandardForce_Backup_{}.json", date.format("%Y-%m-%d"))
}
