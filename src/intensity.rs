//! Intensity resolution: relative prescriptions into concrete targets.
//!
//! An exercise says "80% 1RM" or "MAS+20%"; the owning cycle's stats say what
//! 100% is. Everything here is a pure function of the entry and the stats;
//! nothing is cached, so an edit to either side shows up on the next read.

use serde::Serialize;

use crate::models::{
  AthleteStats, ConditioningEntry, DayLocation, ExerciseEntry, ExerciseKind, IntensityUnit,
  MovementPattern, TrainingProgram,
};
use crate::parse::{leading_float, round1};

/// m/s to km/h
const MS_TO_KMH: f64 = 3.6;

// ---------------------------------------------------------------------------
/// Strength Effect Bands (% 1RM)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthEffect {
  RecoveryTechnique,   // < 60%
  EnduranceBase,       // 60-70%
  HypertrophyStrength, // 70-80%
  MaxStrength,         // 80-90%
  PeakPower,           // >= 90%
}

impl StrengthEffect {
  /// Bands are inclusive at their lower bound
  pub fn from_percent(pct: f64) -> Self {
    match pct {
      p if p < 60.0 => StrengthEffect::RecoveryTechnique,
      p if p < 70.0 => StrengthEffect::EnduranceBase,
      p if p < 80.0 => StrengthEffect::HypertrophyStrength,
      p if p < 90.0 => StrengthEffect::MaxStrength,
      _ => StrengthEffect::PeakPower,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      StrengthEffect::RecoveryTechnique => "Recovery/Technique",
      StrengthEffect::EnduranceBase => "Endurance/Hypertrophy base",
      StrengthEffect::HypertrophyStrength => "Hypertrophy/General strength",
      StrengthEffect::MaxStrength => "Max strength",
      StrengthEffect::PeakPower => "Neural recruitment/Peak power",
    }
  }

  pub fn short_label(&self) -> &'static str {
    match self {
      StrengthEffect::RecoveryTechnique => "Recovery",
      StrengthEffect::EnduranceBase => "Endurance",
      StrengthEffect::HypertrophyStrength => "Hypertrophy",
      StrengthEffect::MaxStrength => "Max Strength",
      StrengthEffect::PeakPower => "Peak Power",
    }
  }

  pub fn color(&self) -> &'static str {
    match self {
      StrengthEffect::RecoveryTechnique => "emerald",
      StrengthEffect::EnduranceBase => "green",
      StrengthEffect::HypertrophyStrength => "blue",
      StrengthEffect::MaxStrength => "orange",
      StrengthEffect::PeakPower => "red",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthTarget {
  pub percent: f64,
  /// Pattern whose 1RM was used (None when nothing matched)
  pub pattern: Option<MovementPattern>,
  /// Working load, one decimal; None without a known baseline
  pub load_kg: Option<f64>,
  pub effect: StrengthEffect,
}

impl StrengthTarget {
  pub fn weight_label(&self) -> Option<String> {
    self.load_kg.map(|kg| format!("{:.1} kg", kg))
  }
}

/// Positive percentage from a %-based intensity field
fn percent_of(intensity: &str) -> Option<f64> {
  leading_float(intensity).filter(|p| *p > 0.0)
}

/// Unrounded working load in kg for a % 1RM entry
pub fn strength_load(entry: &ExerciseEntry, stats: &AthleteStats) -> Option<f64> {
  if entry.unit != IntensityUnit::PercentOneRm {
    return None;
  }
  let pct = percent_of(&entry.intensity)?;
  let pattern = MovementPattern::detect(&entry.category, &entry.name)?;
  let base = stats.one_rep_max(pattern)?;
  Some(base * (pct / 100.0))
}

/// Resolve a % 1RM entry. The effect band is reported whenever the
/// percentage is usable, even if no load can be computed.
pub fn resolve_strength(entry: &ExerciseEntry, stats: &AthleteStats) -> Option<StrengthTarget> {
  if entry.unit != IntensityUnit::PercentOneRm {
    return None;
  }
  let percent = percent_of(&entry.intensity)?;
  let pattern = MovementPattern::detect(&entry.category, &entry.name);

  Some(StrengthTarget {
    percent,
    pattern,
    load_kg: strength_load(entry, stats).map(round1),
    effect: StrengthEffect::from_percent(percent),
  })
}

// ---------------------------------------------------------------------------
/// Pace Zones (% MAS)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasZone {
  pub label: &'static str,
  pub percentage: f64,
  pub effect: &'static str,
  pub color: &'static str,
}

pub const MAS_ZONES: [MasZone; 7] = [
  MasZone { label: "MAS-20%", percentage: 80.0, effect: "Recovery aerobic", color: "emerald" },
  MasZone { label: "MAS-10%", percentage: 90.0, effect: "Steady tempo", color: "green" },
  MasZone { label: "MAS", percentage: 100.0, effect: "Threshold speed", color: "blue" },
  MasZone { label: "MAS+20%", percentage: 120.0, effect: "High-intensity intervals", color: "yellow" },
  MasZone { label: "MAS+40%", percentage: 140.0, effect: "Anaerobic endurance", color: "orange" },
  MasZone { label: "MAS+60%", percentage: 160.0, effect: "High-speed running", color: "red" },
  MasZone { label: "MAS+80%", percentage: 180.0, effect: "Max sprint lead-in", color: "purple" },
];

/// Zone whose label equals the intensity text exactly
pub fn find_zone(intensity: &str) -> Option<&'static MasZone> {
  MAS_ZONES.iter().find(|z| z.label == intensity)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedBaseline {
  Mas,
  Mss,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceTarget {
  pub baseline: SpeedBaseline,
  pub percent: f64,
  /// Named zone when the intensity is a zone label
  pub zone: Option<&'static MasZone>,
  pub speed_ms: f64,
  /// One decimal
  pub speed_kmh: f64,
  /// Seconds to cover the rep distance
  pub target_seconds: Option<f64>,
  pub time_label: Option<String>,
}

impl PaceTarget {
  pub fn speed_label(&self) -> String {
    format!("{:.2} m/s ({:.1} km/h)", self.speed_ms, self.speed_kmh)
  }
}

/// Resolve a % MAS or % MSS entry into speed and rep time
pub fn resolve_conditioning(
  entry: &ConditioningEntry,
  stats: &AthleteStats,
) -> Option<PaceTarget> {
  let (baseline, zone, percent) = match entry.entry.unit {
    IntensityUnit::PercentMas => {
      let zone = find_zone(&entry.entry.intensity);
      let percent = match zone {
        Some(z) => z.percentage,
        None => leading_float(&entry.entry.intensity).unwrap_or(0.0),
      };
      (SpeedBaseline::Mas, zone, percent)
    }
    IntensityUnit::PercentMss => (
      SpeedBaseline::Mss,
      None,
      leading_float(&entry.entry.intensity).unwrap_or(0.0),
    ),
    _ => return None,
  };

  if percent <= 0.0 {
    return None;
  }

  let max_speed = match baseline {
    SpeedBaseline::Mas => stats.known_mas()?,
    SpeedBaseline::Mss => stats.known_mss()?,
  };

  let speed_ms = max_speed * (percent / 100.0);
  let distance = entry.distance_meters();
  let target_seconds = (distance > 0.0).then(|| distance / speed_ms);

  Some(PaceTarget {
    baseline,
    percent,
    zone,
    speed_ms,
    speed_kmh: round1(speed_ms * MS_TO_KMH),
    target_seconds,
    time_label: target_seconds.map(format_rep_time),
  })
}

/// "1m 20s" from 80.0, "45s" from 45.2
pub fn format_rep_time(seconds: f64) -> String {
  let mins = (seconds / 60.0).floor() as i64;
  let secs = (seconds % 60.0).round() as i64;

  if mins > 0 {
    format!("{}m {}s", mins, secs)
  } else {
    format!("{}s", secs)
  }
}

// ---------------------------------------------------------------------------
/// Day Report: resolved rows for one day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedRow {
  pub exercise_id: String,
  pub name: String,
  pub kind: ExerciseKind,
  pub prescription: String,
  pub strength: Option<StrengthTarget>,
  pub pace: Option<PaceTarget>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayReport {
  pub location: DayLocation,
  pub title: String,
  pub readiness: u8,
  pub rows: Vec<ResolvedRow>,
}

fn prescription(entry: &ExerciseEntry) -> String {
  format!(
    "{} x {} @ {} {}",
    entry.sets, entry.reps, entry.intensity, entry.unit
  )
}

/// Resolve every exercise of a day against its own cycle's stats
pub fn resolve_day(program: &TrainingProgram, day_id: &str) -> Option<DayReport> {
  let location = program.locate_day(day_id)?;
  let cycle = program.cycle(&location.cycle_id)?;
  let week = cycle.weeks.iter().find(|w| w.id == location.week_id)?;
  let day = week.days.iter().find(|d| d.id == day_id)?;
  let stats = &cycle.stats;

  let strength = day.strength_exercises.iter().map(|ex| ResolvedRow {
    exercise_id: ex.id.clone(),
    name: ex.name.clone(),
    kind: ExerciseKind::Strength,
    prescription: prescription(ex),
    strength: resolve_strength(ex, stats),
    pace: None,
  });

  let conditioning = day.conditioning_exercises.iter().map(|ex| ResolvedRow {
    exercise_id: ex.entry.id.clone(),
    name: ex.entry.name.clone(),
    kind: ExerciseKind::Conditioning,
    prescription: prescription(&ex.entry),
    strength: None,
    pace: resolve_conditioning(ex, stats),
  });

  Some(DayReport {
    title: day.title.clone(),
    readiness: day.readiness(),
    rows: strength.chain(conditioning).collect(),
    location,
  })
}
