//! Answer-check and countdown rules, shared by the interactive preview
//! session and the static document generator (the generator emits the same
//! logic in script form, parameterized per room).
//!
//! Keeping these pure keeps the two implementations from drifting apart and
//! makes the boundary cases testable without a browser.

/// Remaining time below this threshold switches the timer to urgent styling.
pub const URGENT_THRESHOLD_MS: u64 = 60_000;

/// Delay between a correct answer and revealing the next stage.
pub const ADVANCE_DELAY_MS: u64 = 900;

/// Trim leading/trailing whitespace and collapse internal whitespace runs to
/// a single space. Collapses but never removes: answers differing only in
/// indentation compare equal, answers with whitespace stripped entirely do not.
pub fn normalize_answer(s: &str) -> String {
  s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// An attempt is correct when the normalized texts are exactly equal, or the
/// normalized solution appears as a substring of the normalized input (extra
/// surrounding text is accepted). Case-sensitive.
pub fn check_answer(input: &str, solution: &str) -> bool {
  let input = normalize_answer(input);
  let solution = normalize_answer(solution);
  input == solution || input.contains(&solution)
}

/// Wall-clock remaining time, recomputed from the start timestamp rather
/// than decremented, so tick scheduling jitter never skews the display.
pub fn compute_remaining(start_ms: u64, limit_ms: u64, now_ms: u64) -> u64 {
  let elapsed = now_ms.saturating_sub(start_ms);
  limit_ms.saturating_sub(elapsed)
}

pub fn is_urgent(remaining_ms: u64) -> bool {
  remaining_ms < URGENT_THRESHOLD_MS
}

/// Render remaining milliseconds as `minutes:seconds`, seconds zero-padded.
pub fn format_clock(remaining_ms: u64) -> String {
  let minutes = remaining_ms / 60_000;
  let seconds = (remaining_ms % 60_000) / 1_000;
  format!("{}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalization_collapses_but_keeps_word_breaks() {
    assert_eq!(normalize_answer("  a\n\tb   c  "), "a b c");
    assert_eq!(normalize_answer(""), "");
    assert_eq!(normalize_answer("one"), "one");
  }

  #[test]
  fn whitespace_insensitive_but_not_whitespace_blind() {
    let solution = "for (let i = 0; i < 5; i++) {\n  console.log(i);\n}";
    // Same tokens, different indentation: equal after collapsing.
    assert!(check_answer("for (let i = 0; i < 5; i++) {\nconsole.log(i);\n}", solution));
    // All internal whitespace removed: the collapsed strings differ, so this
    // must be judged incorrect.
    assert!(!check_answer("for(let i=0;i<5;i++){console.log(i);}", solution));
  }

  #[test]
  fn answer_check_is_case_sensitive() {
    assert!(check_answer("return TRUE;", "return TRUE;"));
    assert!(!check_answer("return true;", "return TRUE;"));
  }

  #[test]
  fn solution_embedded_in_extra_text_counts() {
    let solution = "for (let i = 0; i <= 1000; i++) {\n  console.log(i);\n}";
    let input = format!("ok: {}", solution);
    assert!(check_answer(&input, solution));
  }

  #[test]
  fn remaining_is_clamped_and_drift_free() {
    assert_eq!(compute_remaining(1_000, 60_000, 1_000), 60_000);
    assert_eq!(compute_remaining(1_000, 60_000, 31_000), 30_000);
    assert_eq!(compute_remaining(1_000, 60_000, 61_000), 0);
    assert_eq!(compute_remaining(1_000, 60_000, 999_999), 0);
    // A clock that has not advanced past start must not underflow.
    assert_eq!(compute_remaining(5_000, 60_000, 4_000), 60_000);
  }

  #[test]
  fn urgent_threshold_boundary() {
    assert!(is_urgent(59_999));
    assert!(!is_urgent(60_000));
    assert!(is_urgent(0));
  }

  #[test]
  fn clock_formatting_zero_pads_seconds() {
    assert_eq!(format_clock(60_000), "1:00");
    assert_eq!(format_clock(59_999), "0:59");
    assert_eq!(format_clock(605_000), "10:05");
    assert_eq!(format_clock(0), "0:00");
  }
}
