//! Weekly training volume across a whole program, for charting.
//!
//! Pure reduction over a snapshot. Unreadable numbers contribute zero.

use serde::{Deserialize, Serialize};

use crate::intensity::strength_load;
use crate::models::{AthleteStats, ConditioningEntry, ExerciseEntry, TrainingProgram, TrainingWeek};
use crate::parse::{float_or_zero, int_or_zero};

/// Totals for one week of one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyVolume {
  /// `C<cycle position>W<weekNumber>`
  pub label: String,
  /// Sum of sets x reps x load (kg when resolvable, raw intensity otherwise)
  pub strength: f64,
  /// Sum of sets x distance, meters
  pub conditioning: f64,
}

/// One strength row's contribution
pub fn strength_volume(entry: &ExerciseEntry, stats: &AthleteStats) -> f64 {
  let load = strength_load(entry, stats).unwrap_or_else(|| float_or_zero(&entry.intensity));
  entry.sets as f64 * int_or_zero(&entry.reps) as f64 * load
}

/// One conditioning row's contribution
pub fn conditioning_distance(entry: &ConditioningEntry) -> f64 {
  entry.entry.sets as f64 * entry.distance_meters()
}

fn week_totals(week: &TrainingWeek, stats: &AthleteStats) -> (f64, f64) {
  week.days.iter().fold((0.0, 0.0), |(strength, conditioning), day| {
    let s: f64 = day
      .strength_exercises
      .iter()
      .map(|ex| strength_volume(ex, stats))
      .sum();
    let c: f64 = day
      .conditioning_exercises
      .iter()
      .map(|ex| conditioning_distance(ex))
      .sum();
    (strength + s, conditioning + c)
  })
}

/// One record per week, cycle order then week order
pub fn aggregate(program: &TrainingProgram) -> Vec<WeeklyVolume> {
  program
    .cycles
    .iter()
    .enumerate()
    .flat_map(|(c_idx, cycle)| {
      cycle.weeks.iter().map(move |week| {
        let (strength, conditioning) = week_totals(week, &cycle.stats);
        WeeklyVolume {
          label: format!("C{}W{}", c_idx + 1, week.week_number),
          strength,
          conditioning,
        }
      })
    })
    .collect()
}
