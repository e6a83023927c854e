//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
///
/// Single pass over the template: substituted values are never rescanned,
/// so a value that itself contains `{key}` text (e.g. a room named
/// "{script}") stays literal instead of re-triggering a placeholder.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = String::with_capacity(tpl.len());
  let mut rest = tpl;
  'scan: while let Some(open) = rest.find('{') {
    out.push_str(&rest[..open]);
    let tail = &rest[open..];
    for (k, v) in pairs {
      if let Some(after_key) = tail[1..].strip_prefix(*k) {
        if let Some(after) = after_key.strip_prefix('}') {
          out.push_str(v);
          rest = after;
          continue 'scan;
        }
      }
    }
    // A brace that opens no known placeholder (CSS/JS) passes through.
    out.push('{');
    rest = &tail[1..];
  }
  out.push_str(rest);
  out
}

/// Escape text for embedding inside HTML element content or attribute values.
/// Replaces the five significant characters with named references; the
/// ampersand goes first so the other substitutions are not re-escaped.
///
/// Not idempotent: applying it twice double-escapes `&`. Callers must escape
/// exactly once, at the point a string enters markup.
pub fn escape_html(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
    .replace('\'', "&#39;")
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge generated-document payloads.
/// The cut point backs off to the nearest char boundary so multi-byte
/// text never splits mid-character.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_each_key() {
    let out = fill_template("a={a} b={b} a={a}", &[("a", "1"), ("b", "2")]);
    assert_eq!(out, "a=1 b=2 a=1");
  }

  #[test]
  fn fill_template_leaves_unknown_braces_alone() {
    let out = fill_template("body { color: red; } x={x}", &[("x", "1")]);
    assert_eq!(out, "body { color: red; } x=1");
  }

  #[test]
  fn fill_template_does_not_rescan_substituted_values() {
    // A value containing placeholder syntax must come through literally.
    let out = fill_template("t={a} s={b}", &[("a", "{b}"), ("b", "X")]);
    assert_eq!(out, "t={b} s=X");
  }

  #[test]
  fn trunc_for_log_respects_char_boundaries() {
    let s = format!("a{}", "é".repeat(40)); // 81 bytes; byte 64 splits an 'é'
    let out = trunc_for_log(&s, 64);
    assert!(out.ends_with("(81 bytes total)"));
    assert!(out.starts_with('a'));
    // Short and exact-boundary inputs are returned untouched.
    assert_eq!(trunc_for_log("short", 64), "short");
    assert_eq!(trunc_for_log("éé", 4), "éé");
  }

  #[test]
  fn escapes_all_five_characters() {
    assert_eq!(escape_html(r#"<a href="x" title='y'>&</a>"#),
      "&lt;a href=&quot;x&quot; title=&#39;y&#39;&gt;&amp;&lt;/a&gt;");
  }

  #[test]
  fn ampersand_substitution_runs_first() {
    // "&lt;" must come from one escape of "<", not from re-escaping.
    assert_eq!(escape_html("<"), "&lt;");
    assert_eq!(escape_html("&lt;"), "&amp;lt;");
  }

  #[test]
  fn double_escaping_is_not_a_noop() {
    let once = escape_html("a & b");
    let twice = escape_html(&once);
    assert_eq!(once, "a &amp; b");
    assert_eq!(twice, "a &amp;amp; b");
  }

  #[test]
  fn safe_text_passes_through() {
    assert_eq!(escape_html(""), "");
    assert_eq!(escape_html("plain text 123"), "plain text 123");
  }
}
