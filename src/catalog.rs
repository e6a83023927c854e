//! Built-in challenge bank and difficulty presets.
//!
//! The catalog is fixed at compile time: one template per `ChallengeType`.
//! Lookup is total over the enum, so an undefined type id cannot reach
//! runtime (it simply does not parse / does not exist as a variant).

use crate::domain::{ChallengeTemplate, ChallengeType};

/// Read-only template lookup for a challenge type.
pub fn template(type_id: ChallengeType) -> ChallengeTemplate {
  match type_id {
    ChallengeType::Format => ChallengeTemplate {
      type_id,
      title: "Format the Code",
      description: "Format this JavaScript code correctly with proper indentation.",
      starter_text: "function hello(){console.log(\"Hello\");return true;}",
      canonical_solution: "function hello() {\n  console.log(\"Hello\");\n  return true;\n}",
    },
    ChallengeType::Debug => ChallengeTemplate {
      type_id,
      title: "Debug the Code",
      description: "Fix the bug in this code. The loop should print 0 to 4.",
      starter_text: "for (let i = 0; i <= 5; i++) {\n  console.log(i);\n}",
      canonical_solution: "for (let i = 0; i < 5; i++) {\n  console.log(i);\n}",
    },
    ChallengeType::Generate => ChallengeTemplate {
      type_id,
      title: "Generate Numbers",
      description: "Write code to generate all numbers from 0 to 1000.",
      starter_text: "",
      canonical_solution: "for (let i = 0; i <= 1000; i++) {\n  console.log(i);\n}",
    },
    ChallengeType::Transform => ChallengeTemplate {
      type_id,
      title: "Transform Data",
      description: "Convert this CSV to JSON format: name,age\\nJohn,25\\nJane,30",
      starter_text: "",
      canonical_solution: "[\n  {\"name\": \"John\", \"age\": 25},\n  {\"name\": \"Jane\", \"age\": 30}\n]",
    },
    ChallengeType::Logic => ChallengeTemplate {
      type_id,
      title: "Fix the Logic",
      description: "Write a function that returns true only when n is even.",
      starter_text: "function isEven(n) {\n  return n % 2 === 1;\n}",
      canonical_solution: "function isEven(n) {\n  return n % 2 === 0;\n}",
    },
    ChallengeType::Api => ChallengeTemplate {
      type_id,
      title: "Call the API",
      description: "Write code to fetch JSON from /api/data and log the result.",
      starter_text: "",
      canonical_solution: "fetch('/api/data')\n  .then((res) => res.json())\n  .then((data) => console.log(data));",
    },
  }
}

/// Named difficulty shortcut. Applying one overwrites both the challenge
/// selection and the time limit (never merged with the current config).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
  Easy,
  Medium,
  Hard,
}

impl Preset {
  pub fn challenges(&self) -> Vec<ChallengeType> {
    match self {
      Preset::Easy => vec![ChallengeType::Format, ChallengeType::Debug, ChallengeType::Generate],
      Preset::Medium => vec![
        ChallengeType::Format,
        ChallengeType::Debug,
        ChallengeType::Generate,
        ChallengeType::Transform,
      ],
      Preset::Hard => ChallengeType::ALL.to_vec(),
    }
  }

  pub fn time_limit_minutes(&self) -> u32 {
    match self {
      Preset::Easy => 15,
      Preset::Medium => 10,
      Preset::Hard => 8,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_type_has_a_template_with_a_solution() {
    for t in ChallengeType::ALL {
      let tpl = template(t);
      assert_eq!(tpl.type_id, t);
      assert!(!tpl.title.is_empty());
      assert!(!tpl.description.is_empty());
      assert!(!tpl.canonical_solution.is_empty());
    }
  }

  #[test]
  fn presets_grow_with_difficulty() {
    assert_eq!(Preset::Easy.challenges().len(), 3);
    assert_eq!(Preset::Medium.challenges().len(), 4);
    assert_eq!(Preset::Hard.challenges().len(), 6);
    assert_eq!(Preset::Easy.time_limit_minutes(), 15);
    assert_eq!(Preset::Medium.time_limit_minutes(), 10);
    assert_eq!(Preset::Hard.time_limit_minutes(), 8);
  }

  #[test]
  fn harder_presets_allow_less_time() {
    assert!(Preset::Easy.time_limit_minutes() > Preset::Medium.time_limit_minutes());
    assert!(Preset::Medium.time_limit_minutes() > Preset::Hard.time_limit_minutes());
  }
}
