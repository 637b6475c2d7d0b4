//! Partial updates. Every field is optional; `None` leaves the target field
//! unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{
  AthleteStats, ConditioningEntry, ExerciseEntry, IntensityUnit, TrainingDay, TrainingProgram,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayPatch {
  pub title: Option<String>,
  pub warmup: Option<String>,
  pub strength_exercises: Option<Vec<Arc<ExerciseEntry>>>,
  pub conditioning_exercises: Option<Vec<Arc<ConditioningEntry>>>,
  pub fatigue_checks: Option<BTreeMap<String, bool>>,
  pub fatigue_intensity: Option<u8>,
  pub fatigue_notes: Option<String>,
}

impl DayPatch {
  pub fn apply(self, day: &mut TrainingDay) {
    if let Some(title) = self.title {
      day.title = title;
    }
    if let Some(warmup) = self.warmup {
      day.warmup = Some(warmup);
    }
    if let Some(list) = self.strength_exercises {
      day.strength_exercises = list;
    }
    if let Some(list) = self.conditioning_exercises {
      day.conditioning_exercises = list;
    }
    if let Some(checks) = self.fatigue_checks {
      day.fatigue_checks = Some(checks);
    }
    if let Some(score) = self.fatigue_intensity {
      day.fatigue_intensity = Some(score.clamp(1, 10));
    }
    if let Some(notes) = self.fatigue_notes {
      day.fatigue_notes = Some(notes);
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsPatch {
  pub mas: Option<f64>,
  pub mss: Option<f64>,
  #[serde(rename = "squat1rm")]
  pub squat_1rm: Option<f64>,
  #[serde(rename = "deadlift1rm")]
  pub deadlift_1rm: Option<f64>,
  #[serde(rename = "push1rm")]
  pub push_1rm: Option<f64>,
  #[serde(rename = "pull1rm")]
  pub pull_1rm: Option<f64>,
  #[serde(rename = "press1rm")]
  pub press_1rm: Option<f64>,
}

impl StatsPatch {
  pub fn apply(self, stats: &mut AthleteStats) {
    // Negative or non-numeric input means "unknown"
    let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };

    if let Some(v) = self.mas {
      stats.mas = clean(v);
    }
    if let Some(v) = self.mss {
      stats.mss = clean(v);
    }
    if let Some(v) = self.squat_1rm {
      stats.squat_1rm = Some(clean(v));
    }
    if let Some(v) = self.deadlift_1rm {
      stats.deadlift_1rm = Some(clean(v));
    }
    if let Some(v) = self.push_1rm {
      stats.push_1rm = Some(clean(v));
    }
    if let Some(v) = self.pull_1rm {
      stats.pull_1rm = Some(clean(v));
    }
    if let Some(v) = self.press_1rm {
      stats.press_1rm = Some(clean(v));
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExercisePatch {
  pub name: Option<String>,
  pub sets: Option<u32>,
  pub reps: Option<String>,
  pub intensity: Option<String>,
  pub unit: Option<IntensityUnit>,
  pub rest: Option<String>,
  pub notes: Option<String>,
  pub category: Option<String>,
  /// Conditioning entries only
  pub distance: Option<f64>,
}

impl ExercisePatch {
  /// Editing intensity or unit by hand marks the entry as customised
  pub fn touches_intensity(&self) -> bool {
    self.intensity.is_some() || self.unit.is_some()
  }

  pub fn apply(&self, entry: &mut ExerciseEntry) {
    if let Some(name) = &self.name {
      entry.name = name.clone();
    }
    if let Some(sets) = self.sets {
      entry.sets = sets;
    }
    if let Some(reps) = &self.reps {
      entry.reps = reps.clone();
    }
    if let Some(intensity) = &self.intensity {
      entry.intensity = intensity.clone();
    }
    if let Some(unit) = self.unit {
      entry.unit = unit;
    }
    if let Some(rest) = &self.rest {
      entry.rest = rest.clone();
    }
    if let Some(notes) = &self.notes {
      entry.notes = notes.clone();
    }
    if let Some(category) = &self.category {
      entry.category = category.clone();
    }
    if self.touches_intensity() {
      entry.is_custom_intensity = Some(true);
    }
  }

  pub fn apply_conditioning(&self, entry: &mut ConditioningEntry) {
    self.apply(&mut entry.entry);
    if let Some(distance) = self.distance {
      entry.distance = Some(if distance.is_finite() && distance > 0.0 { distance } else { 0.0 });
    }
  }
}

/// Program-level header fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramInfoPatch {
  pub athlete_name: Option<String>,
  pub goal: Option<String>,
}

impl ProgramInfoPatch {
  pub fn apply(self, program: &mut TrainingProgram) {
    if let Some(name) = self.athlete_name {
      program.athlete_name = name;
    }
    if let Some(goal) = self.goal {
      program.goal = goal;
    }
  }
}
