use serde::{Deserialize, Serialize};

/// Baseline performance numbers for one training cycle.
///
/// Zero or missing means "unknown": anything derived from an unknown
/// baseline resolves to "no target" instead of a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteStats {
  /// Maximal aerobic speed, m/s
  #[serde(default)]
  pub mas: f64,
  /// Maximal sprint speed, m/s
  #[serde(default)]
  pub mss: f64,
  #[serde(rename = "squat1rm", default, skip_serializing_if = "Option::is_none")]
  pub squat_1rm: Option<f64>,
  #[serde(rename = "deadlift1rm", default, skip_serializing_if = "Option::is_none")]
  pub deadlift_1rm: Option<f64>,
  #[serde(rename = "push1rm", default, skip_serializing_if = "Option::is_none")]
  pub push_1rm: Option<f64>,
  #[serde(rename = "pull1rm", default, skip_serializing_if = "Option::is_none")]
  pub pull_1rm: Option<f64>,
  #[serde(rename = "press1rm", default, skip_serializing_if = "Option::is_none")]
  pub press_1rm: Option<f64>,
}

impl AthleteStats {
  /// Stats for a freshly created cycle: every baseline present and zero
  pub fn zeroed() -> Self {
    Self {
      mas: 0.0,
      mss: 0.0,
      squat_1rm: Some(0.0),
      deadlift_1rm: Some(0.0),
      push_1rm: Some(0.0),
      pull_1rm: Some(0.0),
      press_1rm: Some(0.0),
    }
  }

  /// Known 1RM for a movement pattern (None when missing or not positive)
  pub fn one_rep_max(&self, pattern: MovementPattern) -> Option<f64> {
    let value = match pattern {
      MovementPattern::Squat => self.squat_1rm,
      MovementPattern::Push => self.push_1rm,
      MovementPattern::Hinge => self.deadlift_1rm,
      MovementPattern::Pull => self.pull_1rm,
      MovementPattern::Press => self.press_1rm,
    };
    positive(value.unwrap_or(0.0))
  }

  /// Known maximal aerobic speed
  pub fn known_mas(&self) -> Option<f64> {
    positive(self.mas)
  }

  /// Known maximal sprint speed
  pub fn known_mss(&self) -> Option<f64> {
    positive(self.mss)
  }
}

fn positive(value: f64) -> Option<f64> {
  (value.is_finite() && value > 0.0).then_some(value)
}

// ---------------------------------------------------------------------------
/// Movement Pattern: which 1RM an exercise is loaded from
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
  Squat,
  Push,
  Hinge,
  Pull,
  Press,
}

impl MovementPattern {
  /// Keyword precedence, first match wins
  const KEYWORDS: [(MovementPattern, &'static [&'static str]); 5] = [
    (MovementPattern::Squat, &["squat"]),
    (MovementPattern::Push, &["push", "bench"]),
    (MovementPattern::Hinge, &["hinge", "deadlift"]),
    (MovementPattern::Pull, &["pull", "row"]),
    (MovementPattern::Press, &["press", "overhead"]),
  ];

  /// Detect the pattern from an exercise's category and name
  pub fn detect(category: &str, name: &str) -> Option<Self> {
    let category = category.to_lowercase();
    let name = name.to_lowercase();

    Self::KEYWORDS.iter().find_map(|(pattern, keywords)| {
      keywords
        .iter()
        .any(|kw| category.contains(kw) || name.contains(kw))
        .then_some(*pattern)
    })
  }
}
