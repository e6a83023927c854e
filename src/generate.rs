//! Static document generator: serializes a session configuration plus its
//! ordered challenge instances into one self-contained HTML string.
//!
//! The emitted document references no external resources and carries its own
//! countdown/answer-check script, so it works offline with no server. Output
//! is deterministic for identical inputs; the runtime clock starts only when
//! the document is opened.
//!
//! Solutions are embedded base64-encoded so they are not plainly readable in
//! the markup. That is obfuscation, not security: anyone inspecting the
//! document can decode them. The file stays a static, server-less artifact
//! on purpose.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::domain::{ChallengeInstance, SessionConfig};
use crate::rules::{ADVANCE_DELAY_MS, URGENT_THRESHOLD_MS};
use crate::util::{escape_html, fill_template};

/// The script packaged into every exported room. It is the compiled form of
/// the rules in `crate::rules`: normalization collapses whitespace runs, an
/// attempt passes on normalized equality or solution-substring, and the
/// timer recomputes remaining time from the load timestamp on every
/// rescheduled one-second tick.
const RUNTIME_SCRIPT: &str = r#"<script>
var totalStages = {stage_count};
var currentStage = 0;
var startTime = Date.now();
var timeLimit = {time_limit_ms};
var timerActive = true;

function decodeSolution(b64) {
  var bytes = Uint8Array.from(atob(b64), function (c) { return c.charCodeAt(0); });
  return new TextDecoder('utf-8').decode(bytes);
}

function normalize(text) {
  return String(text || '').trim().replace(/\s+/g, ' ');
}

function updateTimer() {
  if (!timerActive) return;
  var remaining = Math.max(0, timeLimit - (Date.now() - startTime));
  var minutes = Math.floor(remaining / 60000);
  var seconds = Math.floor((remaining % 60000) / 1000);
  var timer = document.getElementById('timer');
  timer.innerText = minutes + ':' + (seconds < 10 ? '0' : '') + seconds;
  if (remaining < {urgent_ms}) timer.className = 'urgent';
  if (remaining > 0) {
    setTimeout(updateTimer, 1000);
  } else {
    timerActive = false;
    var message = document.getElementById('message');
    message.innerText = '⏰ Time is up! You did not escape!';
    message.className = 'fail';
  }
}

function checkStage(stage) {
  var block = document.getElementById('stage' + stage);
  var input = document.getElementById('code' + stage);
  var feedback = document.getElementById('feedback' + stage);
  if (!block || !input || !feedback) return;
  var solution = normalize(decodeSolution(block.getAttribute('data-solution')));
  var answer = normalize(input.value);
  if (answer === solution || answer.indexOf(solution) !== -1) {
    feedback.innerText = '✅ Correct!';
    feedback.className = 'feedback ok';
    setTimeout(function () { advance(stage); }, {advance_delay_ms});
  } else {
    feedback.innerText = '❌ Not quite right. Try again!';
    feedback.className = 'feedback fail';
  }
}

function advance(stage) {
  var cur = document.getElementById('stage' + stage);
  if (cur) cur.style.display = 'none';
  if (stage + 1 < totalStages) {
    currentStage = stage + 1;
    var next = document.getElementById('stage' + currentStage);
    if (next) next.style.display = 'block';
  } else {
    timerActive = false;
    document.getElementById('stages').style.display = 'none';
    var message = document.getElementById('message');
    message.innerText = '🎉 Congratulations! You escaped the room!';
    message.className = 'ok';
  }
}

updateTimer();
</script>"#;

const DOCUMENT_SHELL: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<title>{title}</title>
<style>
body {
  font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
  margin: 0;
  padding: 20px;
  background: linear-gradient(135deg, #0f2027 0%, #203a43 50%, #2c5364 100%);
  min-height: 100vh;
}
.container {
  max-width: 900px;
  margin: 0 auto;
  background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);
  padding: 40px;
  border-radius: 20px;
  border: 2px solid #ffd700;
}
h1 {
  text-align: center;
  color: #ffd700;
  font-size: 36px;
}
#timer {
  text-align: center;
  font-size: 64px;
  font-weight: bold;
  color: #ffd700;
  margin: 30px 0;
  padding: 30px;
  background: linear-gradient(135deg, #1e3c72 0%, #2a5298 100%);
  border-radius: 15px;
  border: 3px solid #ffd700;
}
#timer.urgent { color: #ff4444; border-color: #ff4444; }
#message {
  text-align: center;
  font-size: 28px;
  margin: 30px 0;
  font-weight: bold;
}
#message.ok, .feedback.ok { color: #00ff00; }
#message.fail, .feedback.fail { color: #ff4444; }
.stage {
  padding: 30px;
  background: linear-gradient(135deg, #1e3c72 0%, #2a5298 100%);
  border: 3px solid #ffd700;
  border-radius: 12px;
  margin: 20px 0;
}
.stage h3 { color: #ffd700; font-size: 24px; }
.stage p { color: #ffffff; font-size: 16px; }
.stage textarea {
  width: 100%;
  font-family: 'Courier New', monospace;
  padding: 12px;
  font-size: 14px;
  border: 2px solid #ffd700;
  border-radius: 8px;
  background: #1a1a2e;
  color: #00ff00;
  resize: vertical;
}
.stage button {
  margin-top: 15px;
  padding: 12px 30px;
  background: linear-gradient(135deg, #ffd700 0%, #ffed4e 100%);
  color: #1a1a2e;
  border: none;
  border-radius: 8px;
  cursor: pointer;
  font-size: 18px;
  font-weight: bold;
}
.feedback { margin-top: 15px; font-weight: bold; font-size: 18px; }
</style>
</head>
<body>
<div class="container">
  <h1>🔐 {title} 🔐</h1>
  <div id="timer">Loading...</div>
  <div id="message"></div>
  <div id="stages">
{stages}
  </div>
</div>
{script}
</body>
</html>
"#;

/// Render one hidden-by-default stage block. Only the first stage is visible
/// when the document loads; the embedded script reveals the rest in order.
fn render_stage(index: usize, challenge: &ChallengeInstance) -> String {
  let display = if index == 0 { "block" } else { "none" };
  let encoded_solution = STANDARD.encode(challenge.canonical_solution.as_bytes());
  format!(
    concat!(
      "<div id=\"stage{i}\" class=\"stage\" data-solution=\"{solution}\" style=\"display:{display};\">\n",
      "  <h3>{title}</h3>\n",
      "  <p>{description}</p>\n",
      "  <textarea id=\"code{i}\" rows=\"8\" spellcheck=\"false\">{starter}</textarea>\n",
      "  <br/>\n",
      "  <button onclick=\"checkStage({i})\">Submit Answer</button>\n",
      "  <p id=\"feedback{i}\" class=\"feedback\"></p>\n",
      "</div>"
    ),
    i = index,
    solution = encoded_solution,
    display = display,
    title = escape_html(&challenge.title),
    description = escape_html(&challenge.description),
    starter = escape_html(&challenge.starter_text),
  )
}

/// Generate the complete standalone document for a room.
///
/// The caller is expected to pass a validated config and the instances
/// produced by `assemble::build_instances` for that config's selection.
pub fn generate_document(config: &SessionConfig, challenges: &[ChallengeInstance]) -> String {
  let stages = challenges
    .iter()
    .enumerate()
    .map(|(i, ch)| render_stage(i, ch))
    .collect::<Vec<_>>()
    .join("\n");

  let script = fill_template(
    RUNTIME_SCRIPT,
    &[
      ("stage_count", &challenges.len().to_string()),
      ("time_limit_ms", &config.time_limit_ms().to_string()),
      ("urgent_ms", &URGENT_THRESHOLD_MS.to_string()),
      ("advance_delay_ms", &ADVANCE_DELAY_MS.to_string()),
    ],
  );

  fill_template(
    DOCUMENT_SHELL,
    &[
      ("title", &escape_html(&config.room_name)),
      ("stages", &stages),
      ("script", &script),
    ],
  )
}
