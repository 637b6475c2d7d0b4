//! LLM integration for program generation
//!
//! Asks Claude for a one-week microcycle and merges the partial document it
//! returns into a full training cycle using the normal creation defaults.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::find_exercise;
use crate::config::LlmConfig;
use crate::models::exercise::lenient;
use crate::models::{
  ConditioningEntry, ExerciseEntry, IntensityUnit, TrainingCycle, TrainingDay, TrainingWeek,
};

// ---------------------------------------------------------------------------
/// Configuration
// ---------------------------------------------------------------------------

pub const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";
const GENERATION_MAX_TOKENS: u32 = 4000;

// ---------------------------------------------------------------------------
/// Error Types
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum LlmError {
  #[error("API key not configured")]
  MissingApiKey,

  #[error("Request failed: {0}")]
  Request(String),

  #[error("API error: {0}")]
  Api(String),

  #[error("Parse error: {0}")]
  Parse(String),
}

impl Serialize for LlmError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

// ---------------------------------------------------------------------------
/// Claude API Types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ClaudeRequest {
  model: String,
  max_tokens: u32,
  system: String,
  messages: Vec<ClaudeMessage>,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage {
  role: String,
  content: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
  content: Vec<ContentBlock>,
  usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
  #[serde(rename = "type")]
  content_type: String,
  text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Usage {
  pub input_tokens: u32,
  pub output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ClaudeErrorResponse {
  error: ClaudeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ClaudeErrorDetail {
  message: String,
}

// ---------------------------------------------------------------------------
/// Generated Program (partial document from Claude)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedProgram {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub weeks: Vec<GeneratedWeek>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedWeek {
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub days: Vec<GeneratedDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedDay {
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub warmup: Option<String>,
  #[serde(default)]
  pub exercises: Vec<GeneratedExercise>,
}

/// Every field may be missing or oddly typed; scalars stay as raw JSON
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedExercise {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub sets: Option<Value>,
  #[serde(default)]
  pub reps: Option<Value>,
  #[serde(default)]
  pub intensity: Option<Value>,
  #[serde(default)]
  pub unit: Option<String>,
  #[serde(default)]
  pub rest: Option<Value>,
  #[serde(default)]
  pub notes: Option<String>,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub distance: Option<Value>,
}

fn present(text: Option<&str>) -> Option<&str> {
  text.map(str::trim).filter(|t| !t.is_empty())
}

fn present_value(value: Option<&Value>) -> Option<String> {
  let text = lenient::text_from_value(value?);
  let trimmed = text.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl GeneratedExercise {
  fn unit(&self) -> Option<IntensityUnit> {
    let raw = present(self.unit.as_deref())?;
    match raw.parse() {
      Ok(unit) => Some(unit),
      Err(e) => {
        debug!("{}; using default unit", e);
        None
      }
    }
  }

  /// Speed-based work goes in the conditioning list
  pub fn is_conditioning(&self) -> bool {
    self.unit().is_some_and(|u| u.is_conditioning())
      || present(self.category.as_deref()).is_some_and(|c| c.eq_ignore_ascii_case("conditioning"))
  }

  /// Overlay the present fields onto a default entry
  fn fill(&self, entry: &mut ExerciseEntry) {
    if let Some(name) = present(self.name.as_deref()) {
      entry.name = name.to_string();
    }
    if let Some(sets) = self.sets.as_ref().map(lenient::count_from_value).filter(|s| *s > 0) {
      entry.sets = sets;
    }
    if let Some(reps) = present_value(self.reps.as_ref()) {
      entry.reps = reps;
    }
    if let Some(intensity) = present_value(self.intensity.as_ref()) {
      entry.intensity = intensity;
    }
    if let Some(unit) = self.unit() {
      entry.unit = unit;
    }
    if let Some(rest) = present_value(self.rest.as_ref()) {
      entry.rest = rest;
    }
    if let Some(notes) = present(self.notes.as_deref()) {
      entry.notes = notes.to_string();
    }
    if let Some(category) = present(self.category.as_deref()) {
      entry.category = category.to_string();
    } else if let Some(known) = find_exercise(&entry.name) {
      entry.category = known.category.to_string();
    }
  }

  pub fn to_strength(&self) -> ExerciseEntry {
    let mut entry = ExerciseEntry::new_strength();
    self.fill(&mut entry);
    entry
  }

  pub fn to_conditioning(&self) -> ConditioningEntry {
    let mut entry = ConditioningEntry::new_conditioning();
    self.fill(&mut entry.entry);
    if let Some(distance) = self
      .distance
      .as_ref()
      .and_then(|d| crate::parse::leading_float(&lenient::text_from_value(d)))
      .filter(|d| *d > 0.0)
    {
      entry.distance = Some(distance);
    }
    entry
  }
}

impl GeneratedProgram {
  /// Build a new cycle at 1-based `position`; every missing field takes its
  /// creation default
  pub fn into_cycle(self, position: usize) -> Result<TrainingCycle, LlmError> {
    if self.weeks.is_empty() {
      return Err(LlmError::Parse("Generated program has no weeks".to_string()));
    }

    let mut cycle = TrainingCycle::new(position);
    if let Some(name) = present(self.name.as_deref()) {
      cycle.name = name.to_string();
    }

    cycle.weeks = self
      .weeks
      .iter()
      .enumerate()
      .map(|(w_idx, gen_week)| {
        let mut week = TrainingWeek::new(w_idx as u32 + 1);
        if let Some(title) = present(gen_week.title.as_deref()) {
          week.title = title.to_string();
        }
        if !gen_week.days.is_empty() {
          week.days = gen_week
            .days
            .iter()
            .enumerate()
            .map(|(d_idx, gen_day)| Arc::new(build_day(d_idx + 1, gen_day)))
            .collect();
        }
        Arc::new(week)
      })
      .collect();

    Ok(cycle)
  }
}

fn build_day(position: usize, gen_day: &GeneratedDay) -> TrainingDay {
  let mut day = TrainingDay::new(position);
  if let Some(title) = present(gen_day.title.as_deref()) {
    day.title = title.to_string();
  }
  if let Some(warmup) = present(gen_day.warmup.as_deref()) {
    day.warmup = Some(warmup.to_string());
  }

  for ex in &gen_day.exercises {
    if ex.is_conditioning() {
      day.conditioning_exercises.push(Arc::new(ex.to_conditioning()));
    } else {
      day.strength_exercises.push(Arc::new(ex.to_strength()));
    }
  }
  day
}

// ---------------------------------------------------------------------------
/// Claude Client
// ---------------------------------------------------------------------------

pub struct ClaudeClient {
  client: Client,
  api_key: String,
  api_url: String,
  model: String,
}

impl ClaudeClient {
  pub fn new(api_key: impl Into<String>, api_url: impl Into<String>, model: impl Into<String>) -> Self {
    Self {
      client: Client::new(),
      api_key: api_key.into(),
      api_url: api_url.into(),
      model: model.into(),
    }
  }

  /// Build from configuration; fails when no API key is set
  pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
    let api_key = config.api_key.clone().ok_or(LlmError::MissingApiKey)?;
    Ok(Self::new(api_key, config.api_url.clone(), config.model.clone()))
  }

  /// Call Claude with a system prompt and user message
  pub async fn complete(
    &self,
    system_prompt: &str,
    user_message: &str,
    max_tokens: u32,
  ) -> Result<(String, Usage), LlmError> {
    let request = ClaudeRequest {
      model: self.model.clone(),
      max_tokens,
      system: system_prompt.to_string(),
      messages: vec![ClaudeMessage {
        role: "user".to_string(),
        content: user_message.to_string(),
      }],
    };

    let response = self
      .client
      .post(&self.api_url)
      .header("x-api-key", &self.api_key)
      .header("anthropic-version", API_VERSION)
      .header("content-type", "application/json")
      .json(&request)
      .send()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    if !status.is_success() {
      if let Ok(error_resp) = serde_json::from_str::<ClaudeErrorResponse>(&body) {
        return Err(LlmError::Api(error_resp.error.message));
      }
      return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
    }

    let claude_response: ClaudeResponse =
      serde_json::from_str(&body).map_err(|e| LlmError::Parse(e.to_string()))?;

    let text = claude_response
      .content
      .iter()
      .find(|c| c.content_type == "text")
      .and_then(|c| c.text.clone())
      .ok_or_else(|| LlmError::Parse("No text content in response".to_string()))?;

    Ok((text, claude_response.usage))
  }

  /// Ask for a one-week microcycle for `goal` at `experience` level
  pub async fn generate_program(
    &self,
    goal: &str,
    experience: &str,
  ) -> Result<(GeneratedProgram, Usage), LlmError> {
    let system_prompt = include_str!("prompts/program_system.txt");

    let user_message = format!(
      r#"Create a generic 1-week microcycle (designed to be repeated and progressed) for an athlete.

GOAL: {}
EXPERIENCE LEVEL: {}

The program should have 3 distinct training days.
Respond with valid JSON matching the OUTPUT FORMAT specified in your instructions."#,
      goal, experience
    );

    info!("Requesting generated program (goal: {}, level: {})", goal, experience);
    let (response_text, usage) = self
      .complete(system_prompt, &user_message, GENERATION_MAX_TOKENS)
      .await?;
    debug!(
      "Generation used {} input / {} output tokens",
      usage.input_tokens, usage.output_tokens
    );

    let json_str = extract_json(&response_text)?;
    let program: GeneratedProgram = serde_json::from_str(&json_str).map_err(|e| {
      warn!("Generated program did not parse: {}", e);
      LlmError::Parse(format!("{}: {}", e, json_str))
    })?;

    if program.weeks.is_empty() {
      return Err(LlmError::Parse("Generated program has no weeks".to_string()));
    }

    Ok((program, usage))
  }
}

/// Extract JSON from Claude's response (handles markdown code blocks)
fn extract_json(text: &str) -> Result<String, LlmError> {
  if text.trim().starts_with('{') {
    return Ok(text.trim().to_string());
  }

  if let Some(start) = text.find("```json") {
    let start = start + 7;
    if let Some(end) = text[start..].find("```") {
      return Ok(text[start..start + end].trim().to_string());
    }
  }

  if let Some(start) = text.find("```") {
    let start = start + 3;
    // Skip language identifier if present
    let content_start = text[start..]
      .find('\n')
      .map(|i| start + i + 1)
      .unwrap_or(start);
    if let Some(end) = text[content_start..].find("```") {
      return Ok(text[content_start..content_start + end].trim().to_string());
    }
  }

  // Last resort: first { to last }
  if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
    if start < end {
      return Ok(text[start..=end].to_string());
    }
  }

  Err(LlmError::Parse("Could not extract JSON from response".to_string()))
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = r#"{
    "name": "Off-season strength",
    "weeks": [{
      "days": [
        {
          "title": "Lower A",
          "exercises": [
            {"name": "Back Squat", "sets": 5, "reps": 5, "intensity": "80", "unit": "% 1RM", "rest": "3min", "category": "Squat"},
            {"name": "Tempo Runs", "sets": "6", "reps": "1", "intensity": "MAS", "unit": "%MAS", "category": "Conditioning"}
          ]
        },
        {"exercises": [{"name": "Bench Press", "unit": "watts"}]},
        {"title": "Conditioning", "exercises": [{"name": "Bike", "category": "conditioning", "distance": 400}]}
      ]
    }]
  }"#;

  fn client_for(server: &mockito::ServerGuard) -> ClaudeClient {
    ClaudeClient::new("test-key", format!("{}/v1/messages", server.url()), CLAUDE_MODEL)
  }

  fn claude_body(text: &str) -> String {
    serde_json::json!({
      "content": [{"type": "text", "text": text}],
      "model": CLAUDE_MODEL,
      "stop_reason": "end_turn",
      "usage": {"input_tokens": 120, "output_tokens": 480}
    })
    .to_string()
  }

  #[test]
  fn test_extract_json_direct() {
    let input = r#"{"name": "test", "weeks": []}"#;
    let result = extract_json(input).unwrap();
    assert!(result.contains("weeks"));
  }

  #[test]
  fn test_extract_json_code_block() {
    let input = r#"Here's the program:

```json
{"name": "Block A", "weeks": []}
```

Enjoy!"#;
    let result = extract_json(input).unwrap();
    assert!(result.contains("Block A"));
  }

  #[test]
  fn test_extract_json_fallback() {
    let input = r#"The program is {"name": "test"} as shown."#;
    let result = extract_json(input).unwrap();
    assert!(result.contains("name"));
    assert!(extract_json("no json here").is_err());
  }

  #[test]
  fn test_into_cycle_fills_defaults() {
    let program: GeneratedProgram = serde_json::from_str(SAMPLE).unwrap();
    let cycle = program.into_cycle(2).unwrap();

    assert_eq!(cycle.name, "Off-season strength");
    assert_eq!(cycle.weeks.len(), 1);
    let week = &cycle.weeks[0];
    assert_eq!(week.week_number, 1);
    assert_eq!(week.title, "Week 1");
    assert_eq!(week.days.len(), 3);

    let lower = &week.days[0];
    assert_eq!(lower.title, "Lower A");
    assert_eq!(lower.fatigue_intensity, Some(5));
    assert_eq!(lower.strength_exercises.len(), 1);
    let squat = &lower.strength_exercises[0];
    assert_eq!(squat.sets, 5);
    assert_eq!(squat.reps, "5");
    assert_eq!(squat.unit, IntensityUnit::PercentOneRm);
    assert_eq!(squat.rest, "3min");

    assert_eq!(lower.conditioning_exercises.len(), 1);
    let runs = &lower.conditioning_exercises[0];
    assert_eq!(runs.entry.sets, 6);
    assert_eq!(runs.entry.unit, IntensityUnit::PercentMas);
    assert_eq!(runs.distance, Some(100.0));

    // Untitled day and unknown unit take creation defaults
    let second = &week.days[1];
    assert_eq!(second.title, "Day 2");
    let bench = &second.strength_exercises[0];
    assert_eq!(bench.unit, IntensityUnit::PercentOneRm);
    assert_eq!(bench.category, "Push");
    assert_eq!(bench.sets, 3);
    assert_eq!(bench.reps, "10");

    let bike = &week.days[2].conditioning_exercises[0];
    assert_eq!(bike.distance, Some(400.0));
    assert_eq!(bike.entry.category, "conditioning");
  }

  #[test]
  fn test_into_cycle_rejects_empty_weeks() {
    let program: GeneratedProgram = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
    assert!(matches!(program.into_cycle(1), Err(LlmError::Parse(_))));
  }

  #[test]
  fn test_from_config_requires_key() {
    let config = crate::config::AppConfig::in_dir(".").llm;
    assert!(matches!(ClaudeClient::from_config(&config), Err(LlmError::MissingApiKey)));
  }

  #[tokio::test]
  async fn test_generate_program_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/v1/messages")
      .match_header("x-api-key", "test-key")
      .match_header("anthropic-version", API_VERSION)
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(claude_body(&format!("```json\n{}\n```", SAMPLE)))
      .create_async()
      .await;

    let (program, usage) = client_for(&server)
      .generate_program("Rugby pre-season", "Intermediate")
      .await
      .unwrap();

    mock.assert_async().await;
    assert_eq!(program.name.as_deref(), Some("Off-season strength"));
    assert_eq!(program.weeks[0].days.len(), 3);
    assert_eq!(usage.output_tokens, 480);
  }

  #[tokio::test]
  async fn test_generate_program_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("POST", "/v1/messages")
      .with_status(529)
      .with_body(r#"{"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}}"#)
      .create_async()
      .await;

    let err = client_for(&server)
      .generate_program("Strength", "Novice")
      .await
      .unwrap_err();
    assert!(matches!(err, LlmError::Api(ref msg) if msg == "Overloaded"));
  }

  #[tokio::test]
  async fn test_generate_program_malformed_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("POST", "/v1/messages")
      .with_status(200)
      .with_body(claude_body("Sorry, I can't help with that."))
      .create_async()
      .await;

    let err = client_for(&server)
      .generate_program("Strength", "Novice")
      .await
      .unwrap_err();
    assert!(matches!(err, LlmError::Parse(_)));
  }
}
