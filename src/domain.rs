//! Domain models used by the backend: challenge types/templates, instances, and session config.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which kind of coding challenge a stage presents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeType {
  Format,
  Debug,
  Generate,
  Transform,
  Logic,
  Api,
}

impl ChallengeType {
  pub const ALL: [ChallengeType; 6] = [
    ChallengeType::Format,
    ChallengeType::Debug,
    ChallengeType::Generate,
    ChallengeType::Transform,
    ChallengeType::Logic,
    ChallengeType::Api,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ChallengeType::Format => "format",
      ChallengeType::Debug => "debug",
      ChallengeType::Generate => "generate",
      ChallengeType::Transform => "transform",
      ChallengeType::Logic => "logic",
      ChallengeType::Api => "api",
    }
  }
}

impl fmt::Display for ChallengeType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ChallengeType {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "format" => Ok(ChallengeType::Format),
      "debug" => Ok(ChallengeType::Debug),
      "generate" => Ok(ChallengeType::Generate),
      "transform" => Ok(ChallengeType::Transform),
      "logic" => Ok(ChallengeType::Logic),
      "api" => Ok(ChallengeType::Api),
      other => Err(format!("unknown challenge type: {other}")),
    }
  }
}

/// Immutable template defined at process start, one per `ChallengeType`.
#[derive(Clone, Debug, Serialize)]
pub struct ChallengeTemplate {
  pub type_id: ChallengeType,
  pub title: &'static str,
  pub description: &'static str,
  /// Pre-filled editor contents; empty when the task starts from a blank editor.
  pub starter_text: &'static str,
  /// Reference answer compared against user input (exact or substring after
  /// whitespace normalization).
  pub canonical_solution: &'static str,
}

/// Per-session copy of a template, with a stable id derived from its position
/// in the author's selection.
#[derive(Clone, Debug, Serialize)]
pub struct ChallengeInstance {
  pub instance_id: String,
  pub type_id: ChallengeType,
  pub title: String,
  pub description: String,
  pub starter_text: String,
  pub canonical_solution: String,
}

pub const MIN_TIME_LIMIT_MINUTES: u32 = 1;
pub const MAX_TIME_LIMIT_MINUTES: u32 = 60;

/// The author's current room configuration.
/// Invariant: `selected` never becomes empty through UI operations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
  #[serde(rename = "roomName")]
  pub room_name: String,
  #[serde(rename = "timeLimitMinutes")]
  pub time_limit_minutes: u32,
  #[serde(rename = "challenges")]
  pub selected: Vec<ChallengeType>,
}

impl SessionConfig {
  pub fn time_limit_ms(&self) -> u64 {
    self.time_limit_minutes as u64 * 60_000
  }

  /// Validation per the create/generate contract: non-empty name, time limit
  /// within 1..=60 minutes, at least one challenge selected.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.room_name.trim().is_empty() {
      return Err(ConfigError::MissingRoomName);
    }
    if self.time_limit_minutes < MIN_TIME_LIMIT_MINUTES
      || self.time_limit_minutes > MAX_TIME_LIMIT_MINUTES
    {
      return Err(ConfigError::TimeLimitOutOfRange(self.time_limit_minutes));
    }
    if self.selected.is_empty() {
      return Err(ConfigError::NoChallengesSelected);
    }
    Ok(())
  }
}

impl Default for SessionConfig {
  fn default() -> Self {
    Self {
      room_name: "Escape Room".into(),
      time_limit_minutes: 10,
      selected: vec![ChallengeType::Format, ChallengeType::Debug, ChallengeType::Generate],
    }
  }
}

/// Validation failures for author-supplied configuration (error taxonomy
/// class "validation": blocking message, no partial state change).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
  MissingRoomName,
  TimeLimitOutOfRange(u32),
  NoChallengesSelected,
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingRoomName => write!(f, "Room name must not be empty"),
      ConfigError::TimeLimitOutOfRange(m) => {
        write!(f, "Time limit must be between {MIN_TIME_LIMIT_MINUTES} and {MAX_TIME_LIMIT_MINUTES} minutes (got {m})")
      }
      ConfigError::NoChallengesSelected => write!(f, "Select at least one challenge"),
    }
  }
}

impl std::error::Error for ConfigError {}
