//! Debounced persistence.
//!
//! Edits are applied immediately in memory; only the write to the store is
//! delayed. A newer schedule cancels a pending write that has not fired
//! yet. Once a write has started it runs to completion, and writes never
//! overlap.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::store::{PersistedState, ProgramStore, StoreError};

/// What the last save attempt did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum SaveStatus {
  Idle,
  Pending,
  Saved,
  Failed(String),
}

pub struct SaveDebouncer<S: ProgramStore> {
  store: Arc<S>,
  delay: Duration,
  pending: Mutex<Option<JoinHandle<()>>>,
  write_lock: Arc<Mutex<()>>,
  status: Arc<watch::Sender<SaveStatus>>,
}

impl<S: ProgramStore> SaveDebouncer<S> {
  pub fn new(store: S, delay: Duration) -> Self {
    let (status, _) = watch::channel(SaveStatus::Idle);
    Self {
      store: Arc::new(store),
      delay,
      pending: Mutex::new(None),
      write_lock: Arc::new(Mutex::new(())),
      status: Arc::new(status),
    }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn delay(&self) -> Duration {
    self.delay
  }

  /// Watch save outcomes
  pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
    self.status.subscribe()
  }

  pub fn status(&self) -> SaveStatus {
    self.status.borrow().clone()
  }

  /// Write `state` after the debounce delay, replacing any pending write
  pub async fn schedule(&self, state: PersistedState) {
    let mut pending = self.pending.lock().await;
    if let Some(handle) = pending.take() {
      if !handle.is_finished() {
        debug!("Cancelled pending save");
        handle.abort();
      }
    }

    self.status.send_replace(SaveStatus::Pending);

    let store = Arc::clone(&self.store);
    let status = Arc::clone(&self.status);
    let write_lock = Arc::clone(&self.write_lock);
    let delay = self.delay;

    *pending = Some(tokio::spawn(async move {
      tokio::time::sleep(delay).await;
      let guard = write_lock.lock_owned().await;
      // Detached so a later schedule cannot abort a write halfway
      tokio::spawn(async move {
        let _guard = guard;
        let _ = write(&*store, &status, state).await;
      });
    }));
  }

  /// Cancel any pending write and write `state` now
  pub async fn flush(&self, state: PersistedState) -> Result<(), StoreError> {
    if let Some(handle) = self.pending.lock().await.take() {
      handle.abort();
    }
    let _guard = self.write_lock.lock().await;
    write(&*self.store, &self.status, state).await
  }

  /// Wait for any write already in progress
  pub async fn settle(&self) {
    let _guard = self.write_lock.lock().await;
  }
}

async fn write<S: ProgramStore>(
  store: &S,
  status: &watch::Sender<SaveStatus>,
  state: PersistedState,
) -> Result<(), StoreError> {
  let count = state.programs.len();
  match store.save(state).await {
    Ok(()) => {
      info!("Saved {} programs", count);
      status.send_replace(SaveStatus::Saved);
      Ok(())
    }
    Err(e) => {
      error!("Failed to save programs: {}", e);
      status.send_replace(SaveStatus::Failed(e.to_string()));
      Err(e)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{sample_program, MemoryStore};

  fn state_named(name: &str) -> PersistedState {
    let mut program = sample_program();
    program.athlete_name = name.to_string();
    PersistedState {
      active_program_id: Some(program.id.clone()),
      programs: vec![program],
    }
  }

  #[tokio::test]
  async fn test_burst_of_edits_writes_once_with_latest_state() {
    let store = MemoryStore::default();
    let saver = SaveDebouncer::new(store.clone(), Duration::from_millis(40));

    saver.schedule(state_named("a")).await;
    saver.schedule(state_named("b")).await;
    saver.schedule(state_named("c")).await;
    assert_eq!(saver.status(), SaveStatus::Pending);
    assert_eq!(store.save_count(), 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    saver.settle().await;

    assert_eq!(store.save_count(), 1);
    assert_eq!(store.snapshot().programs[0].athlete_name, "c");
    assert_eq!(saver.status(), SaveStatus::Saved);
  }

  #[tokio::test]
  async fn test_flush_writes_immediately_and_cancels_pending() {
    let store = MemoryStore::default();
    let saver = SaveDebouncer::new(store.clone(), Duration::from_millis(40));

    saver.schedule(state_named("stale")).await;
    saver.flush(state_named("fresh")).await.unwrap();
    assert_eq!(store.save_count(), 1);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.snapshot().programs[0].athlete_name, "fresh");
  }

  #[tokio::test]
  async fn test_failed_write_is_reported() {
    let store = MemoryStore::failing();
    let saver = SaveDebouncer::new(store.clone(), Duration::from_millis(10));
    let mut rx = saver.subscribe();

    assert!(saver.flush(state_named("x")).await.is_err());
    rx.changed().await.unwrap();
    assert!(matches!(&*rx.borrow(), SaveStatus::Failed(msg) if msg.contains("disk full")));
  }
}
