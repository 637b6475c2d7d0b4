use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::library::ProgramLibrary;
use crate::models::TrainingProgram;
use crate::persist::SaveDebouncer;
use crate::store::{PersistedState, ProgramStore, StoreError};

pub type DbPool = SqlitePool;

const PROGRAMS_KEY: &str = "programs";
const ACTIVE_PROGRAM_KEY: &str = "active_program_id";

/// Application state shared by every command
pub struct AppState<S: ProgramStore = SqliteStore> {
  /// One mutation at a time; the lock is held for the whole edit
  pub library: Mutex<ProgramLibrary>,
  pub saver: SaveDebouncer<S>,
  pub config: AppConfig,
}

impl<S: ProgramStore> AppState<S> {
  /// Load saved state through `store` and wire up the debounced writer
  pub async fn load(store: S, config: AppConfig) -> Result<Self, StoreError> {
    let state = store.load().await?;
    info!(
      "Loaded {} programs (active: {})",
      state.programs.len(),
      state.active_program_id.as_deref().unwrap_or("none")
    );
    let saver = SaveDebouncer::new(store, config.save_debounce);
    Ok(Self {
      library: Mutex::new(state.into()),
      saver,
      config,
    })
  }
}

/// Open (creating if needed) the database at `path` and run migrations
pub async fn init_pool(path: &Path) -> Result<DbPool, StoreError> {
  if let Some(dir) = path.parent() {
    if !dir.as_os_str().is_empty() {
      fs::create_dir_all(dir)?;
    }
  }
  let db_url = format!("sqlite://{}?mode=rwc", path.display());

  info!("Initializing database at: {}", path.display());

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("Database initialized successfully");

  Ok(pool)
}

// ---------------------------------------------------------------------------
/// SQLite Store
// ---------------------------------------------------------------------------

/// Key/value persistence in the `storage` table
#[derive(Clone)]
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  pub async fn open(path: &Path) -> Result<Self, StoreError> {
    Ok(Self::new(init_pool(path).await?))
  }

  async fn get_value(&self, key: &str) -> Result<Option<String>, StoreError> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM storage WHERE key = ?1")
      .bind(key)
      .fetch_optional(&self.pool)
      .await?;
    Ok(value)
  }
}

impl ProgramStore for SqliteStore {
  async fn load(&self) -> Result<PersistedState, StoreError> {
    let programs = match self.get_value(PROGRAMS_KEY).await? {
      Some(raw) => match serde_json::from_str::<Vec<TrainingProgram>>(&raw) {
        Ok(programs) => programs,
        Err(e) => {
          // A damaged blob must not keep the app from starting
          error!("Saved programs unreadable, starting empty: {}", e);
          Vec::new()
        }
      },
      None => Vec::new(),
    };

    let active_program_id = self
      .get_value(ACTIVE_PROGRAM_KEY)
      .await?
      .filter(|id| !id.is_empty());

    if let Some(id) = &active_program_id {
      if !programs.iter().any(|p| &p.id == id) {
        warn!("Saved active program {} not found", id);
      }
    }

    Ok(PersistedState {
      programs,
      active_program_id,
    })
  }

  async fn save(&self, state: PersistedState) -> Result<(), StoreError> {
    let programs = serde_json::to_string(&state.programs)?;
    let mut tx = self.pool.begin().await?;

    sqlx::query(
      r#"
      INSERT INTO storage (key, value, updated_at)
      VALUES (?1, ?2, CURRENT_TIMESTAMP)
      ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(PROGRAMS_KEY)
    .bind(&programs)
    .execute(&mut *tx)
    .await?;

    match &state.active_program_id {
      Some(id) => {
        sqlx::query(
          r#"
          INSERT INTO storage (key, value, updated_at)
          VALUES (?1, ?2, CURRENT_TIMESTAMP)
          ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
          "#,
        )
        .bind(ACTIVE_PROGRAM_KEY)
        .bind(id)
        .execute(&mut *tx)
        .await?;
      }
      None => {
        sqlx::query("DELETE FROM storage WHERE key = ?1")
          .bind(ACTIVE_PROGRAM_KEY)
          .execute(&mut *tx)
          .await?;
      }
    }

    tx.commit().await?;
    Ok(())
  }

  async fn clear(&self) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM storage").execute(&self.pool).await?;
    info!("Cleared saved state");
    Ok(())
  }
}
