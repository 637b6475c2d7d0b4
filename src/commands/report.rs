//! Read-only views: volume chart, resolved day, reference tables

use serde::Serialize;

use crate::catalog::{FatigueMarker, LibraryExercise, CATEGORIES, EXERCISE_LIBRARY, FATIGUE_MARKERS};
use crate::db::AppState;
use crate::intensity::{resolve_day, DayReport, MasZone, MAS_ZONES};
use crate::models::IntensityUnit;
use crate::store::ProgramStore;
use crate::volume::{aggregate, WeeklyVolume};

/// Weekly series for the active program (empty when none is active)
pub async fn weekly_volume<S: ProgramStore>(
  state: &AppState<S>,
) -> Result<Vec<WeeklyVolume>, String> {
  let library = state.library.lock().await;
  Ok(library.active().map(aggregate).unwrap_or_default())
}

pub async fn day_report<S: ProgramStore>(
  state: &AppState<S>,
  day_id: String,
) -> Result<Option<DayReport>, String> {
  let library = state.library.lock().await;
  Ok(library.active().and_then(|p| resolve_day(p, &day_id)))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
  pub categories: Vec<&'static str>,
  pub units: Vec<&'static str>,
  pub exercises: Vec<LibraryExercise>,
  pub fatigue_markers: Vec<FatigueMarker>,
  pub mas_zones: Vec<MasZone>,
}

pub fn catalog() -> Catalog {
  Catalog {
    categories: CATEGORIES.to_vec(),
    units: IntensityUnit::ALL.iter().map(|u| u.as_str()).collect(),
    exercises: EXERCISE_LIBRARY.to_vec(),
    fatigue_markers: FATIGUE_MARKERS.to_vec(),
    mas_zones: MAS_ZONES.to_vec(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{sample_program, setup_test_state, setup_test_state_with};

  #[tokio::test]
  async fn test_reports_follow_active_program() {
    let (empty, _) = setup_test_state().await;
    assert!(weekly_volume(&empty).await.unwrap().is_empty());

    let program = sample_program();
    let day_id = program.cycles[1].weeks[0].days[0].id.clone();
    let (state, _) = setup_test_state_with(vec![program]).await;

    assert_eq!(weekly_volume(&state).await.unwrap().len(), 3);

    let report = day_report(&state, day_id).await.unwrap().unwrap();
    assert_eq!(report.location.cycle_number, 2);
    let squat = report.rows[0].strength.as_ref().unwrap();
    assert_eq!(squat.load_kg, Some(96.0));
    assert!(day_report(&state, "missing".into()).await.unwrap().is_none());
  }

  #[test]
  fn test_catalog_contents() {
    let catalog = catalog();
    assert_eq!(catalog.categories.len(), 10);
    assert_eq!(catalog.units, vec!["RPE", "% 1RM", "RIR", "% MAS", "% MSS"]);
    assert_eq!(catalog.mas_zones.len(), 7);
    assert_eq!(catalog.fatigue_markers[0].key, "sleep");
  }
}
