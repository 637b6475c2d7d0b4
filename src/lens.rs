//! Path-addressed copy-on-write edits into the program tree.
//!
//! The tree is Program -> Cycle -> Week -> Day, with every child held as an
//! `Arc`. An edit rebuilds only the nodes on the path from the root to the
//! focused node; every sibling subtree is shared with the previous snapshot
//! (`Arc::ptr_eq` holds for them). A path that does not resolve is a miss
//! and produces `None`, never a partially rebuilt tree.

use std::sync::Arc;

use crate::models::{
  ConditioningEntry, DayLocation, ExerciseEntry, TrainingCycle, TrainingDay, TrainingProgram,
  TrainingWeek,
};

// ---------------------------------------------------------------------------
/// Node identity and containment
// ---------------------------------------------------------------------------

pub trait Identified {
  fn id(&self) -> &str;
}

impl Identified for TrainingProgram {
  fn id(&self) -> &str {
    &self.id
  }
}

impl Identified for TrainingCycle {
  fn id(&self) -> &str {
    &self.id
  }
}

impl Identified for TrainingWeek {
  fn id(&self) -> &str {
    &self.id
  }
}

impl Identified for TrainingDay {
  fn id(&self) -> &str {
    &self.id
  }
}

impl Identified for ExerciseEntry {
  fn id(&self) -> &str {
    &self.id
  }
}

impl Identified for ConditioningEntry {
  fn id(&self) -> &str {
    &self.entry.id
  }
}

/// A node owning an ordered sequence of `C` children
pub trait Parent<C> {
  fn children(&self) -> &[Arc<C>];
  fn children_mut(&mut self) -> &mut Vec<Arc<C>>;
}

impl Parent<TrainingCycle> for TrainingProgram {
  fn children(&self) -> &[Arc<TrainingCycle>] {
    &self.cycles
  }
  fn children_mut(&mut self) -> &mut Vec<Arc<TrainingCycle>> {
    &mut self.cycles
  }
}

impl Parent<TrainingWeek> for TrainingCycle {
  fn children(&self) -> &[Arc<TrainingWeek>] {
    &self.weeks
  }
  fn children_mut(&mut self) -> &mut Vec<Arc<TrainingWeek>> {
    &mut self.weeks
  }
}

impl Parent<TrainingDay> for TrainingWeek {
  fn children(&self) -> &[Arc<TrainingDay>] {
    &self.days
  }
  fn children_mut(&mut self) -> &mut Vec<Arc<TrainingDay>> {
    &mut self.days
  }
}

// ---------------------------------------------------------------------------
/// One-level operations
// ---------------------------------------------------------------------------

/// New parent with child `id` replaced by `f(child)`.
/// None when the child is absent or `f` declines.
pub fn replace_child<P, C, F>(parent: &P, id: &str, f: F) -> Option<P>
where
  P: Parent<C> + Clone,
  C: Identified,
  F: FnOnce(&C) -> Option<C>,
{
  let idx = parent.children().iter().position(|c| c.id() == id)?;
  let child = f(&parent.children()[idx])?;
  let mut next = parent.clone();
  next.children_mut()[idx] = Arc::new(child);
  Some(next)
}

/// New parent without child `id`; None when absent
pub fn remove_child<P, C>(parent: &P, id: &str) -> Option<P>
where
  P: Parent<C> + Clone,
  C: Identified,
{
  let idx = parent.children().iter().position(|c| c.id() == id)?;
  let mut next = parent.clone();
  next.children_mut().remove(idx);
  Some(next)
}

/// New parent with `child` appended
pub fn append_child<P, C>(parent: &P, child: C) -> P
where
  P: Parent<C> + Clone,
{
  let mut next = parent.clone();
  next.children_mut().push(Arc::new(child));
  next
}

/// New list with item `id` edited in place; None when absent
pub fn update_in<T, F>(items: &[Arc<T>], id: &str, f: F) -> Option<Vec<Arc<T>>>
where
  T: Identified + Clone,
  F: FnOnce(&mut T),
{
  let idx = items.iter().position(|item| item.id() == id)?;
  let mut item = (*items[idx]).clone();
  f(&mut item);
  let mut next = items.to_vec();
  next[idx] = Arc::new(item);
  Some(next)
}

/// New list without item `id`; None when absent
pub fn remove_from<T: Identified>(items: &[Arc<T>], id: &str) -> Option<Vec<Arc<T>>> {
  let idx = items.iter().position(|item| item.id() == id)?;
  let mut next = items.to_vec();
  next.remove(idx);
  Some(next)
}

// ---------------------------------------------------------------------------
/// Paths
// ---------------------------------------------------------------------------

/// A focus on one node type somewhere below a program
pub trait Lens {
  type Target: Clone;

  /// Rebuild the path with `f`'s result at the focus
  fn try_modify<F>(&self, program: &TrainingProgram, f: F) -> Option<TrainingProgram>
  where
    F: FnOnce(&Self::Target) -> Option<Self::Target>;

  fn modify<F>(&self, program: &TrainingProgram, f: F) -> Option<TrainingProgram>
  where
    F: FnOnce(&mut Self::Target),
  {
    self.try_modify(program, |node| {
      let mut next = node.clone();
      f(&mut next);
      Some(next)
    })
  }

  fn get<'a>(&self, program: &'a TrainingProgram) -> Option<&'a Self::Target>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePath {
  pub cycle_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekPath {
  pub cycle_id: String,
  pub week_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPath {
  pub cycle_id: String,
  pub week_id: String,
  pub day_id: String,
}

impl CyclePath {
  pub fn new(cycle_id: impl Into<String>) -> Self {
    Self { cycle_id: cycle_id.into() }
  }

  pub fn week(&self, week_id: impl Into<String>) -> WeekPath {
    WeekPath {
      cycle_id: self.cycle_id.clone(),
      week_id: week_id.into(),
    }
  }
}

impl WeekPath {
  pub fn new(cycle_id: impl Into<String>, week_id: impl Into<String>) -> Self {
    Self {
      cycle_id: cycle_id.into(),
      week_id: week_id.into(),
    }
  }

  pub fn cycle(&self) -> CyclePath {
    CyclePath::new(self.cycle_id.clone())
  }

  pub fn day(&self, day_id: impl Into<String>) -> DayPath {
    DayPath {
      cycle_id: self.cycle_id.clone(),
      week_id: self.week_id.clone(),
      day_id: day_id.into(),
    }
  }
}

impl DayPath {
  pub fn new(
    cycle_id: impl Into<String>,
    week_id: impl Into<String>,
    day_id: impl Into<String>,
  ) -> Self {
    Self {
      cycle_id: cycle_id.into(),
      week_id: week_id.into(),
      day_id: day_id.into(),
    }
  }

  pub fn week(&self) -> WeekPath {
    WeekPath::new(self.cycle_id.clone(), self.week_id.clone())
  }
}

impl From<&DayLocation> for DayPath {
  fn from(loc: &DayLocation) -> Self {
    DayPath::new(loc.cycle_id.clone(), loc.week_id.clone(), loc.day_id.clone())
  }
}

impl Lens for CyclePath {
  type Target = TrainingCycle;

  fn try_modify<F>(&self, program: &TrainingProgram, f: F) -> Option<TrainingProgram>
  where
    F: FnOnce(&TrainingCycle) -> Option<TrainingCycle>,
  {
    replace_child(program, &self.cycle_id, f)
  }

  fn get<'a>(&self, program: &'a TrainingProgram) -> Option<&'a TrainingCycle> {
    program.cycles.iter().find(|c| c.id == self.cycle_id).map(|c| &**c)
  }
}

impl Lens for WeekPath {
  type Target = TrainingWeek;

  fn try_modify<F>(&self, program: &TrainingProgram, f: F) -> Option<TrainingProgram>
  where
    F: FnOnce(&TrainingWeek) -> Option<TrainingWeek>,
  {
    self
      .cycle()
      .try_modify(program, |cycle| replace_child(cycle, &self.week_id, f))
  }

  fn get<'a>(&self, program: &'a TrainingProgram) -> Option<&'a TrainingWeek> {
    self
      .cycle()
      .get(program)?
      .weeks
      .iter()
      .find(|w| w.id == self.week_id)
      .map(|w| &**w)
  }
}

impl Lens for DayPath {
  type Target = TrainingDay;

  fn try_modify<F>(&self, program: &TrainingProgram, f: F) -> Option<TrainingProgram>
  where
    F: FnOnce(&TrainingDay) -> Option<TrainingDay>,
  {
    self
      .week()
      .try_modify(program, |week| replace_child(week, &self.day_id, f))
  }

  fn get<'a>(&self, program: &'a TrainingProgram) -> Option<&'a TrainingDay> {
    self
      .week()
      .get(program)?
      .days
      .iter()
      .find(|d| d.id == self.day_id)
      .map(|d| &**d)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::sample_program;

  #[test]
  fn test_day_edit_rebuilds_only_the_path() {
    let program = sample_program();
    let cycle = &program.cycles[0];
    let week = &cycle.weeks[1];
    let path = DayPath::new(&cycle.id, &week.id, &week.days[0].id);

    let next = path
      .modify(&program, |day| day.title = "Heavy lower".to_string())
      .unwrap();

    // Path nodes are new
    assert!(!Arc::ptr_eq(&program.cycles[0], &next.cycles[0]));
    assert!(!Arc::ptr_eq(&program.cycles[0].weeks[1], &next.cycles[0].weeks[1]));
    assert!(!Arc::ptr_eq(
      &program.cycles[0].weeks[1].days[0],
      &next.cycles[0].weeks[1].days[0]
    ));
    assert_eq!(next.cycles[0].weeks[1].days[0].title, "Heavy lower");

    // Everything else is shared
    assert!(Arc::ptr_eq(&program.cycles[1], &next.cycles[1]));
    assert!(Arc::ptr_eq(&program.cycles[0].weeks[0], &next.cycles[0].weeks[0]));
    assert!(Arc::ptr_eq(
      &program.cycles[0].weeks[1].days[1],
      &next.cycles[0].weeks[1].days[1]
    ));

    // The previous snapshot is untouched
    assert_ne!(program.cycles[0].weeks[1].days[0].title, "Heavy lower");
  }

  #[test]
  fn test_miss_at_any_level_is_none() {
    let program = sample_program();
    let cycle = &program.cycles[0];
    let week = &cycle.weeks[0];
    let day = &week.days[0];

    assert!(DayPath::new("nope", &week.id, &day.id).modify(&program, |_| {}).is_none());
    assert!(DayPath::new(&cycle.id, "nope", &day.id).modify(&program, |_| {}).is_none());
    assert!(DayPath::new(&cycle.id, &week.id, "nope").modify(&program, |_| {}).is_none());
    // Week belongs to a different cycle
    let other_week = &program.cycles[1].weeks[0];
    assert!(DayPath::new(&cycle.id, &other_week.id, &day.id)
      .modify(&program, |_| {})
      .is_none());
  }

  #[test]
  fn test_get_follows_path() {
    let program = sample_program();
    let cycle = &program.cycles[1];
    let path = CyclePath::new(&cycle.id).week(&cycle.weeks[0].id);
    assert_eq!(path.get(&program).map(|w| w.week_number), Some(1));
    assert!(CyclePath::new("nope").get(&program).is_none());
  }

  #[test]
  fn test_list_helpers() {
    let a = Arc::new(ExerciseEntry::new_strength());
    let b = Arc::new(ExerciseEntry::new_strength());
    let list = vec![a.clone(), b.clone()];

    let edited = update_in(&list, &b.id, |ex| ex.sets = 5).unwrap();
    assert!(Arc::ptr_eq(&edited[0], &a));
    assert_eq!(edited[1].sets, 5);
    assert_eq!(list[1].sets, 3);

    let removed = remove_from(&list, &a.id).unwrap();
    assert_eq!(removed.len(), 1);
    assert!(remove_from(&list, "missing").is_none());
    assert!(update_in(&list, "missing", |_| {}).is_none());
  }
}
