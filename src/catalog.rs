//! Fixed reference tables the editor offers as choices

use serde::Serialize;

/// Movement-pattern tags an exercise can carry
pub const CATEGORIES: [&str; 10] = [
  "Squat",
  "Hinge",
  "Push",
  "Pull",
  "Press",
  "Single Leg",
  "Core",
  "Carry",
  "Conditioning",
  "Other",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LibraryExercise {
  pub name: &'static str,
  pub category: &'static str,
}

/// Quick-pick exercises
pub const EXERCISE_LIBRARY: [LibraryExercise; 6] = [
  LibraryExercise { name: "Back Squat", category: "Squat" },
  LibraryExercise { name: "Deadlift", category: "Hinge" },
  LibraryExercise { name: "Bench Press", category: "Push" },
  LibraryExercise { name: "Overhead Press", category: "Press" },
  LibraryExercise { name: "Pull Up", category: "Pull" },
  LibraryExercise { name: "MAS Intervals", category: "Conditioning" },
];

/// A wellness flag tracked per day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FatigueMarker {
  pub key: &'static str,
  pub label: &'static str,
}

pub const FATIGUE_MARKERS: [FatigueMarker; 4] = [
  FatigueMarker { key: "sleep", label: "Sleep Quality" },
  FatigueMarker { key: "stress", label: "Stress Levels" },
  FatigueMarker { key: "energy", label: "Energy Levels" },
  FatigueMarker { key: "mood", label: "Mood/Motivation" },
];

pub fn is_fatigue_marker(key: &str) -> bool {
  FATIGUE_MARKERS.iter().any(|m| m.key == key)
}

/// Library entry by case-insensitive name
pub fn find_exercise(name: &str) -> Option<&'static LibraryExercise> {
  EXERCISE_LIBRARY
    .iter()
    .find(|ex| ex.name.eq_ignore_ascii_case(name.trim()))
}
