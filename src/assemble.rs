//! Configuration assembler: turns the author's ordered challenge selection
//! into concrete stage instances.

use crate::catalog::template;
use crate::domain::{ChallengeInstance, ChallengeType};

/// Build one `ChallengeInstance` per selected type, in selection order.
/// Instance ids are `<type>-<index>` with a 0-based index, so the same input
/// always yields the same ids. Duplicate types are representable and produce
/// distinct ids with identical content.
pub fn build_instances(selected: &[ChallengeType]) -> Vec<ChallengeInstance> {
  selected
    .iter()
    .enumerate()
    .map(|(i, &type_id)| {
      let tpl = template(type_id);
      ChallengeInstance {
        instance_id: format!("{}-{}", type_id, i),
        type_id,
        title: tpl.title.to_string(),
        description: tpl.description.to_string(),
        starter_text: tpl.starter_text.to_string(),
        canonical_solution: tpl.canonical_solution.to_string(),
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ids_follow_selection_order() {
    let got = build_instances(&[ChallengeType::Debug, ChallengeType::Format]);
    assert_eq!(got.len(), 2);
    assert_eq!(got[0].instance_id, "debug-0");
    assert_eq!(got[1].instance_id, "format-1");
    assert_eq!(got[0].title, "Debug the Code");
  }

  #[test]
  fn single_format_selection_yields_format_0() {
    let got = build_instances(&[ChallengeType::Format]);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].instance_id, "format-0");
  }

  #[test]
  fn duplicates_get_distinct_ids_with_identical_content() {
    let got = build_instances(&[ChallengeType::Logic, ChallengeType::Logic]);
    assert_eq!(got[0].instance_id, "logic-0");
    assert_eq!(got[1].instance_id, "logic-1");
    assert_eq!(got[0].canonical_solution, got[1].canonical_solution);
  }

  #[test]
  fn assembly_is_deterministic() {
    let sel = [ChallengeType::Api, ChallengeType::Transform, ChallengeType::Api];
    let a: Vec<String> = build_instances(&sel).into_iter().map(|c| c.instance_id).collect();
    let b: Vec<String> = build_instances(&sel).into_iter().map(|c| c.instance_id).collect();
    assert_eq!(a, b);
  }
}
