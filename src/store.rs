//! Persistence port: the only way saved state is read or written.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::library::ProgramLibrary;
use crate::models::TrainingProgram;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Storage error: {0}")]
  Io(#[from] std::io::Error),
}

impl Serialize for StoreError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// Everything that survives a restart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
  pub programs: Vec<TrainingProgram>,
  pub active_program_id: Option<String>,
}

impl From<&ProgramLibrary> for PersistedState {
  fn from(lib: &ProgramLibrary) -> Self {
    Self {
      programs: lib.programs.clone(),
      active_program_id: lib.active_program_id.clone(),
    }
  }
}

impl From<PersistedState> for ProgramLibrary {
  fn from(state: PersistedState) -> Self {
    ProgramLibrary::new(state.programs, state.active_program_id)
  }
}

/// Load/save of the whole program collection
pub trait ProgramStore: Send + Sync + 'static {
  fn load(&self) -> impl Future<Output = Result<PersistedState, StoreError>> + Send;

  fn save(&self, state: PersistedState) -> impl Future<Output = Result<(), StoreError>> + Send;

  fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
