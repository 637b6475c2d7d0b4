//! Program edits. Each one is a lens edit plus a `last_modified` bump.
//!
//! Every method takes `&self` and returns a new program; the receiver is
//! never changed. `None` means the addressed node was not found and the
//! edit did not happen.

use std::sync::Arc;

use crate::lens::{append_child, remove_child, remove_from, update_in, CyclePath, DayPath, Lens, WeekPath};
use crate::models::{
  ConditioningEntry, DayPatch, ExerciseEntry, ExerciseKind, ExercisePatch, ProgramInfoPatch,
  StatsPatch, TrainingCycle, TrainingDay, TrainingProgram, TrainingWeek,
};

impl TrainingProgram {
  /// Stamp a successful edit
  fn committed(&self, next: Option<TrainingProgram>) -> Option<TrainingProgram> {
    next.map(|mut program| {
      program.touch(self.last_modified);
      program
    })
  }

  /// Edit the node a path points at
  pub fn edit<L, F>(&self, path: &L, f: F) -> Option<TrainingProgram>
  where
    L: Lens,
    F: FnOnce(&mut L::Target),
  {
    self.committed(path.modify(self, f))
  }

  /// Edit the node a path points at; `f` returning None aborts the edit
  pub fn try_edit<L, F>(&self, path: &L, f: F) -> Option<TrainingProgram>
  where
    L: Lens,
    F: FnOnce(&L::Target) -> Option<L::Target>,
  {
    self.committed(path.try_modify(self, f))
  }

  pub fn update_info(&self, patch: ProgramInfoPatch) -> TrainingProgram {
    let mut next = self.clone();
    patch.apply(&mut next);
    next.touch(self.last_modified);
    next
  }

  // -------------------------------------------------------------------------
  // Cycles
  // -------------------------------------------------------------------------

  /// Append "New Training Cycle N"; returns the new program and cycle id
  pub fn add_cycle(&self) -> (TrainingProgram, String) {
    let cycle = TrainingCycle::new(self.cycles.len() + 1);
    self.push_cycle(cycle)
  }

  /// Append an already-built cycle (generated programs)
  pub fn push_cycle(&self, cycle: TrainingCycle) -> (TrainingProgram, String) {
    let id = cycle.id.clone();
    let mut next = append_child(self, cycle);
    next.touch(self.last_modified);
    (next, id)
  }

  pub fn remove_cycle(&self, cycle_id: &str) -> Option<TrainingProgram> {
    self.committed(remove_child::<_, TrainingCycle>(self, cycle_id))
  }

  pub fn rename_cycle(&self, path: &CyclePath, name: &str) -> Option<TrainingProgram> {
    self.edit(path, |cycle| cycle.name = name.to_string())
  }

  pub fn update_cycle_stats(&self, path: &CyclePath, patch: StatsPatch) -> Option<TrainingProgram> {
    self.edit(path, |cycle| patch.apply(&mut cycle.stats))
  }

  // -------------------------------------------------------------------------
  // Weeks
  // -------------------------------------------------------------------------

  /// Append "Week N" with `weekNumber = count + 1`
  pub fn add_week(&self, path: &CyclePath) -> Option<(TrainingProgram, String)> {
    let cycle = path.get(self)?;
    let week = TrainingWeek::new(cycle.weeks.len() as u32 + 1);
    let id = week.id.clone();
    let next = self.try_edit(path, |cycle| Some(append_child(cycle, week)))?;
    Some((next, id))
  }

  pub fn remove_week(&self, path: &WeekPath) -> Option<TrainingProgram> {
    self.try_edit(&path.cycle(), |cycle| {
      remove_child::<_, TrainingWeek>(cycle, &path.week_id)
    })
  }

  pub fn rename_week(&self, path: &WeekPath, title: &str) -> Option<TrainingProgram> {
    self.edit(path, |week| week.title = title.to_string())
  }

  // -------------------------------------------------------------------------
  // Days
  // -------------------------------------------------------------------------

  /// Append "Day N" with default fields
  pub fn add_day(&self, path: &WeekPath) -> Option<(TrainingProgram, String)> {
    let week = path.get(self)?;
    let day = TrainingDay::new(week.days.len() + 1);
    let id = day.id.clone();
    let next = self.try_edit(path, |week| Some(append_child(week, day)))?;
    Some((next, id))
  }

  pub fn remove_day(&self, path: &DayPath) -> Option<TrainingProgram> {
    self.try_edit(&path.week(), |week| {
      remove_child::<_, TrainingDay>(week, &path.day_id)
    })
  }

  /// Merge a partial update into one day
  pub fn update_day(&self, path: &DayPath, patch: DayPatch) -> Option<TrainingProgram> {
    self.edit(path, |day| patch.apply(day))
  }

  /// Flip one wellness marker
  pub fn toggle_fatigue_check(&self, path: &DayPath, key: &str) -> Option<TrainingProgram> {
    let day = path.get(self)?;
    let mut checks = day.fatigue_checks.clone().unwrap_or_default();
    let flipped = !checks.get(key).copied().unwrap_or(false);
    checks.insert(key.to_string(), flipped);

    self.update_day(
      path,
      DayPatch {
        fatigue_checks: Some(checks),
        ..DayPatch::default()
      },
    )
  }

  // -------------------------------------------------------------------------
  // Exercises: every change replaces one of the day's lists
  // -------------------------------------------------------------------------

  /// Append a default exercise of `kind`; returns the new program and exercise id
  pub fn add_exercise(&self, path: &DayPath, kind: ExerciseKind) -> Option<(TrainingProgram, String)> {
    let day = path.get(self)?;
    let (patch, id) = match kind {
      ExerciseKind::Strength => {
        let ex = ExerciseEntry::new_strength();
        let id = ex.id.clone();
        let mut list = day.strength_exercises.clone();
        list.push(Arc::new(ex));
        (
          DayPatch {
            strength_exercises: Some(list),
            ..DayPatch::default()
          },
          id,
        )
      }
      ExerciseKind::Conditioning => {
        let ex = ConditioningEntry::new_conditioning();
        let id = ex.entry.id.clone();
        let mut list = day.conditioning_exercises.clone();
        list.push(Arc::new(ex));
        (
          DayPatch {
            conditioning_exercises: Some(list),
            ..DayPatch::default()
          },
          id,
        )
      }
    };

    let next = self.update_day(path, patch)?;
    Some((next, id))
  }

  pub fn update_exercise(
    &self,
    path: &DayPath,
    kind: ExerciseKind,
    exercise_id: &str,
    patch: &ExercisePatch,
  ) -> Option<TrainingProgram> {
    let day = path.get(self)?;
    let day_patch = match kind {
      ExerciseKind::Strength => DayPatch {
        strength_exercises: Some(update_in(&day.strength_exercises, exercise_id, |ex| {
          patch.apply(ex)
        })?),
        ..DayPatch::default()
      },
      ExerciseKind::Conditioning => DayPatch {
        conditioning_exercises: Some(update_in(&day.conditioning_exercises, exercise_id, |ex| {
          patch.apply_conditioning(ex)
        })?),
        ..DayPatch::default()
      },
    };
    self.update_day(path, day_patch)
  }

  pub fn remove_exercise(
    &self,
    path: &DayPath,
    kind: ExerciseKind,
    exercise_id: &str,
  ) -> Option<TrainingProgram> {
    let day = path.get(self)?;
    let day_patch = match kind {
      ExerciseKind::Strength => DayPatch {
        strength_exercises: Some(remove_from(&day.strength_exercises, exercise_id)?),
        ..DayPatch::default()
      },
      ExerciseKind::Conditioning => DayPatch {
        conditioning_exercises: Some(remove_from(&day.conditioning_exercises, exercise_id)?),
        ..DayPatch::default()
      },
    };
    self.update_day(path, day_patch)
  }

  /// Which list of the day holds `exercise_id`
  pub fn exercise_kind(&self, path: &DayPath, exercise_id: &str) -> Option<ExerciseKind> {
    let day = path.get(self)?;
    if day.strength_exercises.iter().any(|ex| ex.id == exercise_id) {
      Some(ExerciseKind::Strength)
    } else if day.conditioning_exercises.iter().any(|ex| ex.entry.id == exercise_id) {
      Some(ExerciseKind::Conditioning)
    } else {
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::IntensityUnit;
  use crate::test_utils::sample_program;

  fn first_day_path(program: &TrainingProgram) -> DayPath {
    let loc = program.first_day().unwrap();
    DayPath::from(&loc)
  }

  #[test]
  fn test_update_day_bumps_last_modified_and_shares_siblings() {
    let program = sample_program();
    let cycle = &program.cycles[0];
    let week = &cycle.weeks[1];
    let day = &week.days[1];
    let path = DayPath::new(&cycle.id, &week.id, &day.id);

    let next = program
      .update_day(
        &path,
        DayPatch {
          fatigue_notes: Some("Slept badly".to_string()),
          ..DayPatch::default()
        },
      )
      .unwrap();

    assert!(next.last_modified > program.last_modified);
    assert_eq!(
      next.cycles[0].weeks[1].days[1].fatigue_notes.as_deref(),
      Some("Slept badly")
    );

    // Off-path nodes: same allocation, same value
    assert!(Arc::ptr_eq(&program.cycles[1], &next.cycles[1]));
    assert!(Arc::ptr_eq(&program.cycles[0].weeks[0], &next.cycles[0].weeks[0]));
    assert!(Arc::ptr_eq(&program.cycles[0].weeks[1].days[0], &next.cycles[0].weeks[1].days[0]));
    assert_eq!(program.cycles[1], next.cycles[1]);
    // Untouched fields of the edited day survive
    assert_eq!(next.cycles[0].weeks[1].days[1].title, day.title);
    assert_eq!(next.cycles[0].weeks[1].days[1].strength_exercises, day.strength_exercises);
  }

  #[test]
  fn test_update_day_miss_is_noop() {
    let program = sample_program();
    let path = DayPath::new(&program.cycles[0].id, &program.cycles[0].weeks[0].id, "missing");
    assert!(program.update_day(&path, DayPatch::default()).is_none());
  }

  #[test]
  fn test_add_cycle_week_day_append_with_fresh_ids() {
    let program = sample_program();
    let (next, cycle_id) = program.add_cycle();
    assert_eq!(next.cycles.len(), 3);
    assert_eq!(next.cycles[2].id, cycle_id);
    assert_eq!(next.cycles[2].name, "New Training Cycle 3");
    assert_eq!(next.cycles[2].weeks[0].title, "Block 1");
    assert!(next.last_modified > program.last_modified);

    let cycle_path = CyclePath::new(&cycle_id);
    let (next2, week_id) = next.add_week(&cycle_path).unwrap();
    let weeks = &next2.cycles[2].weeks;
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[1].id, week_id);
    assert_eq!(weeks[1].week_number, 2);
    assert_eq!(weeks[1].title, "Week 2");
    assert_eq!(weeks[1].days.len(), 1);

    let (next3, day_id) = next2.add_day(&cycle_path.week(&week_id)).unwrap();
    let days = &next3.cycles[2].weeks[1].days;
    assert_eq!(days.len(), 2);
    assert_eq!(days[1].id, day_id);
    assert_eq!(days[1].title, "Day 2");
    assert_ne!(days[0].id, days[1].id);

    // Adding after a removal never recycles the old id
    let (again, second_id) = next3.remove_cycle(&cycle_id).unwrap().add_cycle();
    assert_ne!(second_id, cycle_id);
    assert_eq!(again.cycles.len(), 3);
  }

  #[test]
  fn test_week_numbers_are_not_renumbered() {
    let program = sample_program();
    let cycle = &program.cycles[0];
    let path = CyclePath::new(&cycle.id);
    let first_week = path.week(&cycle.weeks[0].id);

    let next = program.remove_week(&first_week).unwrap();
    assert_eq!(next.cycles[0].weeks[0].week_number, 2);

    // Count + 1 even when that collides with an existing number
    let (next, _) = next.add_week(&path).unwrap();
    let numbers: Vec<u32> = next.cycles[0].weeks.iter().map(|w| w.week_number).collect();
    assert_eq!(numbers, vec![2, 2]);
  }

  #[test]
  fn test_exercise_lifecycle() {
    let program = sample_program();
    let path = first_day_path(&program);

    let (program, ex_id) = program.add_exercise(&path, ExerciseKind::Strength).unwrap();
    let day = path.get(&program).unwrap();
    let added = day.strength_exercises.last().unwrap();
    assert_eq!(added.id, ex_id);
    assert_eq!(added.reps, "10");

    let patch = ExercisePatch {
      name: Some("Front Squat".to_string()),
      intensity: Some("70".to_string()),
      ..ExercisePatch::default()
    };
    let program = program
      .update_exercise(&path, ExerciseKind::Strength, &ex_id, &patch)
      .unwrap();
    let edited = path.get(&program).unwrap().strength_exercises.last().unwrap().clone();
    assert_eq!(edited.name, "Front Squat");
    assert!(edited.is_custom_intensity());

    assert_eq!(program.exercise_kind(&path, &ex_id), Some(ExerciseKind::Strength));
    let program = program
      .remove_exercise(&path, ExerciseKind::Strength, &ex_id)
      .unwrap();
    assert!(program.exercise_kind(&path, &ex_id).is_none());
    assert!(program
      .remove_exercise(&path, ExerciseKind::Strength, &ex_id)
      .is_none());
  }

  #[test]
  fn test_conditioning_exercise_edit() {
    let program = sample_program();
    let path = first_day_path(&program);
    let (program, ex_id) = program.add_exercise(&path, ExerciseKind::Conditioning).unwrap();

    let patch = ExercisePatch {
      distance: Some(300.0),
      unit: Some(IntensityUnit::PercentMss),
      ..ExercisePatch::default()
    };
    let program = program
      .update_exercise(&path, ExerciseKind::Conditioning, &ex_id, &patch)
      .unwrap();
    let ex = path.get(&program).unwrap().conditioning_exercises.last().unwrap().clone();
    assert_eq!(ex.distance, Some(300.0));
    assert_eq!(ex.entry.unit, IntensityUnit::PercentMss);
    assert_eq!(ex.entry.is_custom_intensity, Some(true));

    // Wrong list is a miss
    assert!(program
      .update_exercise(&path, ExerciseKind::Strength, &ex_id, &patch)
      .is_none());
  }

  #[test]
  fn test_stats_rename_and_fatigue() {
    let program = sample_program();
    let cycle_path = CyclePath::new(&program.cycles[1].id);

    let next = program
      .update_cycle_stats(
        &cycle_path,
        StatsPatch {
          mas: Some(4.8),
          ..StatsPatch::default()
        },
      )
      .unwrap();
    assert_eq!(next.cycles[1].stats.mas, 4.8);
    assert_eq!(next.cycles[0].stats, program.cycles[0].stats);

    let next = next.rename_cycle(&cycle_path, "Peaking").unwrap();
    assert_eq!(next.cycles[1].name, "Peaking");

    let path = first_day_path(&next);
    let next = next.toggle_fatigue_check(&path, "sleep").unwrap();
    assert!(path.get(&next).unwrap().is_fatigue_checked("sleep"));
    let next = next.toggle_fatigue_check(&path, "sleep").unwrap();
    assert!(!path.get(&next).unwrap().is_fatigue_checked("sleep"));
  }

  #[test]
  fn test_sequential_edits_do_not_interact() {
    let base = sample_program();
    let path = first_day_path(&base);

    let a = base.rename_cycle(&CyclePath::new(&base.cycles[0].id), "A").unwrap();
    let b = base
      .update_day(
        &path,
        DayPatch {
          title: Some("B".to_string()),
          ..DayPatch::default()
        },
      )
      .unwrap();

    assert_eq!(a.cycles[0].name, "A");
    assert_ne!(path.get(&a).unwrap().title, "B");
    assert_ne!(b.cycles[0].name, "A");
    assert_eq!(path.get(&b).unwrap().title, "B");
  }
}
