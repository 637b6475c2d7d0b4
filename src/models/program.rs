use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{new_id, now_millis, AthleteStats, ConditioningEntry, ExerciseEntry, IntensityUnit};

/// Readiness score given to a new day (scale 1-10)
pub const DEFAULT_FATIGUE_INTENSITY: u8 = 5;

/// Name of the first cycle of a new program
pub const INITIAL_CYCLE_NAME: &str = "New Training Cycle";
/// Title of the week seeded into a new program
pub const INITIAL_WEEK_TITLE: &str = "Initial Phase";
/// Title of the week seeded into an appended cycle
pub const CYCLE_SEED_WEEK_TITLE: &str = "Block 1";

// ---------------------------------------------------------------------------
/// Training Day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDay {
  pub id: String,
  #[serde(default)]
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub warmup: Option<String>,
  #[serde(default)]
  pub strength_exercises: Vec<Arc<ExerciseEntry>>,
  #[serde(default)]
  pub conditioning_exercises: Vec<Arc<ConditioningEntry>>,
  /// Wellness flags keyed by marker name (sleep, stress, ...)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fatigue_checks: Option<BTreeMap<String, bool>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fatigue_intensity: Option<u8>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fatigue_notes: Option<String>,
}

impl TrainingDay {
  /// New day at 1-based `position` within its week
  pub fn new(position: usize) -> Self {
    Self {
      id: new_id(),
      title: format!("Day {}", position),
      warmup: Some(String::new()),
      strength_exercises: Vec::new(),
      conditioning_exercises: Vec::new(),
      fatigue_checks: Some(BTreeMap::new()),
      fatigue_intensity: Some(DEFAULT_FATIGUE_INTENSITY),
      fatigue_notes: Some(String::new()),
    }
  }

  pub fn is_fatigue_checked(&self, key: &str) -> bool {
    self
      .fatigue_checks
      .as_ref()
      .and_then(|checks| checks.get(key).copied())
      .unwrap_or(false)
  }

  pub fn readiness(&self) -> u8 {
    self.fatigue_intensity.unwrap_or(DEFAULT_FATIGUE_INTENSITY)
  }
}

// ---------------------------------------------------------------------------
/// Training Week
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingWeek {
  pub id: String,
  /// Assigned once at creation, never renumbered
  pub week_number: u32,
  #[serde(default)]
  pub title: String,
  // Master settings are stored and round-tripped only; nothing cascades them.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub strength_master_intensity: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub strength_master_unit: Option<IntensityUnit>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_strength_locked: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cond_master_intensity: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cond_master_unit: Option<IntensityUnit>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_cond_locked: Option<bool>,
  #[serde(default)]
  pub days: Vec<Arc<TrainingDay>>,
}

impl TrainingWeek {
  /// New week seeded with one empty day
  pub fn new(week_number: u32) -> Self {
    Self {
      id: new_id(),
      week_number,
      title: format!("Week {}", week_number),
      strength_master_intensity: None,
      strength_master_unit: None,
      is_strength_locked: None,
      cond_master_intensity: None,
      cond_master_unit: None,
      is_cond_locked: None,
      days: vec![Arc::new(TrainingDay::new(1))],
    }
  }

  /// Week 1 under a fixed seed title
  fn seed(title: &str) -> Self {
    Self {
      title: title.to_string(),
      ..Self::new(1)
    }
  }
}

// ---------------------------------------------------------------------------
/// Training Cycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingCycle {
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub weeks: Vec<Arc<TrainingWeek>>,
  /// Baselines for this cycle only; never read across cycles
  #[serde(default)]
  pub stats: AthleteStats,
}

impl TrainingCycle {
  /// New cycle at 1-based `position`, seeded with "Block 1" / "Day 1"
  pub fn new(position: usize) -> Self {
    Self {
      id: new_id(),
      name: format!("{} {}", INITIAL_CYCLE_NAME, position),
      weeks: vec![Arc::new(TrainingWeek::seed(CYCLE_SEED_WEEK_TITLE))],
      stats: AthleteStats::zeroed(),
    }
  }

  /// First cycle of a new program
  fn initial() -> Self {
    Self {
      name: INITIAL_CYCLE_NAME.to_string(),
      weeks: vec![Arc::new(TrainingWeek::seed(INITIAL_WEEK_TITLE))],
      ..Self::new(1)
    }
  }
}

// ---------------------------------------------------------------------------
/// Training Program
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingProgram {
  pub id: String,
  #[serde(default)]
  pub athlete_name: String,
  #[serde(default)]
  pub goal: String,
  #[serde(default)]
  pub cycles: Vec<Arc<TrainingCycle>>,
  /// Milliseconds since the Unix epoch
  #[serde(default)]
  pub last_modified: i64,
}

/// Where a day sits inside a program
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLocation {
  pub cycle_id: String,
  pub week_id: String,
  pub day_id: String,
  /// 1-based position of the cycle
  pub cycle_number: usize,
  /// The week's stored `weekNumber`
  pub week_number: u32,
  /// 1-based position of the day within its week
  pub day_number: usize,
}

impl TrainingProgram {
  /// New program for a new athlete, seeded with one cycle / week / day
  pub fn new() -> Self {
    Self {
      id: new_id(),
      athlete_name: "New Athlete".to_string(),
      goal: String::new(),
      cycles: vec![Arc::new(TrainingCycle::initial())],
      last_modified: now_millis(),
    }
  }

  /// Bump `last_modified`, strictly increasing even within one millisecond
  pub fn touch(&mut self, previous: i64) {
    self.last_modified = now_millis().max(previous.saturating_add(1));
  }

  pub fn cycle(&self, cycle_id: &str) -> Option<&Arc<TrainingCycle>> {
    self.cycles.iter().find(|c| c.id == cycle_id)
  }

  /// Find a day anywhere in the program
  pub fn locate_day(&self, day_id: &str) -> Option<DayLocation> {
    self.cycles.iter().enumerate().find_map(|(c_idx, cycle)| {
      cycle.weeks.iter().find_map(|week| {
        let d_idx = week.days.iter().position(|d| d.id == day_id)?;
        Some(DayLocation {
          cycle_id: cycle.id.clone(),
          week_id: week.id.clone(),
          day_id: day_id.to_string(),
          cycle_number: c_idx + 1,
          week_number: week.week_number,
          day_number: d_idx + 1,
        })
      })
    })
  }

  /// First day of the first week of the first cycle, if any
  pub fn first_day(&self) -> Option<DayLocation> {
    let day_id = self.cycles.first()?.weeks.first()?.days.first()?.id.clone();
    self.locate_day(&day_id)
  }
}

impl Default for TrainingProgram {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_day_defaults() {
    let day = TrainingDay::new(3);
    assert_eq!(day.title, "Day 3");
    assert_eq!(day.warmup.as_deref(), Some(""));
    assert!(day.strength_exercises.is_empty());
    assert!(day.conditioning_exercises.is_empty());
    assert_eq!(day.fatigue_checks, Some(BTreeMap::new()));
    assert_eq!(day.fatigue_intensity, Some(5));
    assert_eq!(day.fatigue_notes.as_deref(), Some(""));
  }

  #[test]
  fn test_new_program_seed() {
    let program = TrainingProgram::new();
    assert_eq!(program.athlete_name, "New Athlete");
    assert_eq!(program.cycles.len(), 1);

    let cycle = &program.cycles[0];
    assert_eq!(cycle.name, "New Training Cycle");
    assert_eq!(cycle.stats, AthleteStats::zeroed());
    assert_eq!(cycle.weeks[0].week_number, 1);
    assert_eq!(cycle.weeks[0].title, "Initial Phase");
    assert_eq!(cycle.weeks[0].days[0].title, "Day 1");
  }

  #[test]
  fn test_appended_cycle_seed() {
    let cycle = TrainingCycle::new(3);
    assert_eq!(cycle.name, "New Training Cycle 3");
    assert_eq!(cycle.weeks.len(), 1);
    assert_eq!(cycle.weeks[0].week_number, 1);
    assert_eq!(cycle.weeks[0].title, "Block 1");
    assert_eq!(cycle.weeks[0].days[0].title, "Day 1");

    assert_eq!(TrainingWeek::new(4).title, "Week 4");
  }

  #[test]
  fn test_day_lists_present_when_missing_on_wire() {
    let day: TrainingDay = serde_json::from_str(r#"{"id": "d1", "title": "Day 1"}"#).unwrap();
    assert!(day.strength_exercises.is_empty());
    assert!(day.conditioning_exercises.is_empty());

    let json = serde_json::to_value(&day).unwrap();
    assert!(json["strengthExercises"].is_array());
    assert!(json["conditioningExercises"].is_array());
  }

  #[test]
  fn test_locate_day() {
    let mut program = TrainingProgram::new();
    let mut cycle = (*program.cycles[0]).clone();
    let mut week = (*cycle.weeks[0]).clone();
    week.days.push(Arc::new(TrainingDay::new(2)));
    let target = week.days[1].id.clone();
    cycle.weeks[0] = Arc::new(week);
    program.cycles[0] = Arc::new(cycle);

    let loc = program.locate_day(&target).unwrap();
    assert_eq!(loc.cycle_number, 1);
    assert_eq!(loc.week_number, 1);
    assert_eq!(loc.day_number, 2);
    assert!(program.locate_day("missing").is_none());
  }

  #[test]
  fn test_touch_strictly_increases() {
    let mut program = TrainingProgram::new();
    let far_future = now_millis() + 60_000;
    program.touch(far_future);
    assert_eq!(program.last_modified, far_future + 1);
  }
}
