use serde::{Deserialize, Deserializer, Serialize};

use super::new_id;

// ---------------------------------------------------------------------------
/// Intensity Unit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntensityUnit {
  #[serde(rename = "RPE")]
  Rpe,
  #[serde(rename = "% 1RM")]
  PercentOneRm,
  #[serde(rename = "RIR")]
  Rir,
  #[serde(rename = "% MAS")]
  PercentMas,
  #[serde(rename = "% MSS")]
  PercentMss,
}

impl IntensityUnit {
  pub const ALL: [IntensityUnit; 5] = [
    IntensityUnit::Rpe,
    IntensityUnit::PercentOneRm,
    IntensityUnit::Rir,
    IntensityUnit::PercentMas,
    IntensityUnit::PercentMss,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      IntensityUnit::Rpe => "RPE",
      IntensityUnit::PercentOneRm => "% 1RM",
      IntensityUnit::Rir => "RIR",
      IntensityUnit::PercentMas => "% MAS",
      IntensityUnit::PercentMss => "% MSS",
    }
  }

  /// Speed-relative units are prescribed as conditioning work
  pub fn is_conditioning(&self) -> bool {
    matches!(self, IntensityUnit::PercentMas | IntensityUnit::PercentMss)
  }
}

impl std::fmt::Display for IntensityUnit {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for IntensityUnit {
  type Err = String;

  /// Accepts the canonical labels plus the loose spellings people (and
  /// generated programs) tend to use: "%1RM", "1rm", "mas", "percent_mss"...
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let key: String = s
      .chars()
      .filter(|c| c.is_ascii_alphanumeric())
      .collect::<String>()
      .to_ascii_lowercase();

    match key.as_str() {
      "rpe" => Ok(Self::Rpe),
      "rir" => Ok(Self::Rir),
      "1rm" | "percent1rm" | "pct1rm" => Ok(Self::PercentOneRm),
      "mas" | "percentmas" | "pctmas" => Ok(Self::PercentMas),
      "mss" | "percentmss" | "pctmss" => Ok(Self::PercentMss),
      _ => Err(format!("Unknown intensity unit: {}", s)),
    }
  }
}

// ---------------------------------------------------------------------------
/// Exercise Entries
// ---------------------------------------------------------------------------

/// One prescribed strength movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default, deserialize_with = "lenient::count")]
  pub sets: u32,
  /// Free text, may be a range ("8-10")
  #[serde(default, deserialize_with = "lenient::text")]
  pub reps: String,
  /// Numeric for percentage units, descriptive for RPE/RIR or a zone label
  #[serde(default, deserialize_with = "lenient::text")]
  pub intensity: String,
  pub unit: IntensityUnit,
  #[serde(default, deserialize_with = "lenient::text")]
  pub rest: String,
  #[serde(default)]
  pub notes: String,
  /// Movement-pattern tag, drives the 1RM lookup
  #[serde(default)]
  pub category: String,
  /// Set once the intensity or unit was edited by hand
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_custom_intensity: Option<bool>,
}

impl ExerciseEntry {
  /// New strength row: 3 x 10 @ 75% 1RM, 90s rest, Squat pattern
  pub fn new_strength() -> Self {
    Self {
      id: new_id(),
      name: String::new(),
      sets: 3,
      reps: "10".to_string(),
      intensity: "75".to_string(),
      unit: IntensityUnit::PercentOneRm,
      rest: "90s".to_string(),
      notes: String::new(),
      category: "Squat".to_string(),
      is_custom_intensity: None,
    }
  }

  pub fn is_custom_intensity(&self) -> bool {
    self.is_custom_intensity.unwrap_or(false)
  }
}

/// A strength entry specialised for aerobic/speed work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditioningEntry {
  #[serde(flatten)]
  pub entry: ExerciseEntry,
  /// Rep distance in meters
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub distance: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target_time: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub work_time: Option<f64>,
}

impl ConditioningEntry {
  /// New conditioning row: 3 x 1 x 100m at MAS, 1:1 work:rest
  pub fn new_conditioning() -> Self {
    Self {
      entry: ExerciseEntry {
        id: new_id(),
        name: String::new(),
        sets: 3,
        reps: "1".to_string(),
        intensity: "MAS".to_string(),
        unit: IntensityUnit::PercentMas,
        rest: "1:1".to_string(),
        notes: String::new(),
        category: "Conditioning".to_string(),
        is_custom_intensity: None,
      },
      distance: Some(100.0),
      target_time: None,
      work_time: None,
    }
  }

  /// Distance in meters, zero when unset or negative
  pub fn distance_meters(&self) -> f64 {
    self
      .distance
      .filter(|d| d.is_finite() && *d > 0.0)
      .unwrap_or(0.0)
  }
}

/// Which of a day's two exercise lists an entry lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
  Strength,
  Conditioning,
}

// ---------------------------------------------------------------------------
/// Lenient field decoding
// ---------------------------------------------------------------------------

/// Saved and generated documents are hand-edited or model-written, so
/// counts may arrive as floats or strings and text fields as numbers.
pub(crate) mod lenient {
  use super::*;
  use serde_json::Value;

  pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
  where
    D: Deserializer<'de>,
  {
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value))
  }

  pub fn count_from_value(value: &Value) -> u32 {
    let raw = match value {
      Value::Number(n) => n.as_f64().unwrap_or(0.0),
      Value::String(s) => crate::parse::float_or_zero(s),
      _ => 0.0,
    };
    if raw.is_finite() && raw > 0.0 {
      raw.trunc().min(u32::MAX as f64) as u32
    } else {
      0
    }
  }

  pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
  where
    D: Deserializer<'de>,
  {
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
  }

  pub fn text_from_value(value: &Value) -> String {
    match value {
      Value::String(s) => s.clone(),
      Value::Number(n) => n.to_string(),
      Value::Bool(b) => b.to_string(),
      _ => String::new(),
    }
  }
}
