//! Backup import and export

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::db::AppState;
use crate::library::export_file_name;
use crate::store::ProgramStore;

use super::schedule_save;

/// Replace every program with the contents of a backup document
pub async fn import_programs<S: ProgramStore>(
  state: &AppState<S>,
  json: String,
) -> Result<usize, String> {
  let mut library = state.library.lock().await;
  let count = library.import_json(&json).map_err(|e| {
    warn!("Import rejected: {}", e);
    format!("Failed to import programs: {}", e)
  })?;
  schedule_save(state, &library).await;
  Ok(count)
}

pub async fn import_file<S: ProgramStore>(state: &AppState<S>, path: &Path) -> Result<usize, String> {
  let json = fs::read_to_string(path)
    .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
  import_programs(state, json).await
}

/// Every program as an indented JSON array
pub async fn export_programs<S: ProgramStore>(state: &AppState<S>) -> Result<String, String> {
  state
    .library
    .lock()
    .await
    .export_json()
    .map_err(|e| format!("Failed to export programs: {}", e))
}

/// Write a dated backup file; returns its path
pub async fn export_to_dir<S: ProgramStore>(
  state: &AppState<S>,
  dir: Option<PathBuf>,
) -> Result<PathBuf, String> {
  let dir = dir.unwrap_or_else(|| state.config.export_dir.clone());
  let json = export_programs(state).await?;

  fs::create_dir_all(&dir)
    .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
  let path = dir.join(export_file_name(chrono::Utc::now().date_naive()));
  fs::write(&path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

  info!("Exported programs to {}", path.display());
  Ok(path)
}
