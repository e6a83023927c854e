//! Authoring preview session: the in-tool mirror of the exported room's
//! timer/stage/answer-check behavior, driven over the WebSocket.
//!
//! The session is a plain state machine. Time enters only as `now_ms`
//! arguments supplied by the caller, so every transition is testable with a
//! fake clock and the one-second tick cadence lives entirely in the client.
//! Plain (non-encoded) instances are used here; obfuscation only matters in
//! the exported artifact.

use serde::Serialize;
use tracing::instrument;

use crate::assemble::build_instances;
use crate::catalog::Preset;
use crate::domain::{
    ChallengeInstance, ChallengeType, ConfigError, SessionConfig, MAX_TIME_LIMIT_MINUTES,
    MIN_TIME_LIMIT_MINUTES,
};
use crate::rules::{check_answer, compute_remaining, format_clock, is_urgent};

/// `setup` edits the config; `game` replays the quiz against the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Setup,
    Game,
}

/// Outcome of one answer submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Correct, more stages remain; `current_stage` has been advanced.
    Advanced,
    /// Correct on the final stage; the room is escaped and the timer stopped.
    Escaped,
    /// Wrong answer; no state changed.
    Incorrect,
    /// The time limit had already elapsed; the attempt is not evaluated.
    TimeUp,
    /// Not in game mode (or the game already ended).
    NotRunning,
}

/// Point-in-time view of the countdown, recomputed from the start timestamp.
#[derive(Clone, Debug, Serialize)]
pub struct TimerSnapshot {
    #[serde(rename = "remainingMs")]
    pub remaining_ms: u64,
    pub display: String,
    pub urgent: bool,
    pub expired: bool,
}

pub struct PreviewSession {
    pub config: SessionConfig,
    mode: Mode,
    challenges: Vec<ChallengeInstance>,
    current_stage: usize,
    started_at_ms: u64,
    timer_active: bool,
    completed: bool,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            mode: Mode::Setup,
            challenges: Vec::new(),
            current_stage: 0,
            started_at_ms: 0,
            timer_active: false,
            completed: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// True once the final stage has been solved; reveals the
    /// generate-and-persist controls in the authoring tool.
    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn current_stage(&self) -> usize {
        self.current_stage
    }

    pub fn challenges(&self) -> &[ChallengeInstance] {
        &self.challenges
    }

    // ---- setup-mode operations ----

    pub fn set_room_name(&mut self, name: String) {
        self.config.room_name = name;
    }

    pub fn set_time_limit(&mut self, minutes: u32) {
        self.config.time_limit_minutes =
            minutes.clamp(MIN_TIME_LIMIT_MINUTES, MAX_TIME_LIMIT_MINUTES);
    }

    /// Add or remove a challenge type. Removing is refused when it would
    /// leave the selection empty: at least one type always stays selected.
    pub fn toggle_challenge(&mut self, type_id: ChallengeType) -> Result<(), ConfigError> {
        if let Some(pos) = self.config.selected.iter().position(|t| *t == type_id) {
            if self.config.selected.len() == 1 {
                return Err(ConfigError::NoChallengesSelected);
            }
            self.config.selected.remove(pos);
        } else {
            self.config.selected.push(type_id);
        }
        Ok(())
    }

    /// Presets replace the selection and the time limit wholesale.
    pub fn apply_preset(&mut self, preset: Preset) {
        self.config.selected = preset.challenges();
        self.config.time_limit_minutes = preset.time_limit_minutes();
    }

    // ---- transitions ----

    /// `setup -> game`: validates the config, assembles fresh instances and
    /// resets stage/timer/completion state.
    #[instrument(level = "debug", skip(self))]
    pub fn start_game(&mut self, now_ms: u64) -> Result<(), ConfigError> {
        self.config.validate()?;
        self.challenges = build_instances(&self.config.selected);
        self.mode = Mode::Game;
        self.current_stage = 0;
        self.started_at_ms = now_ms;
        self.timer_active = true;
        self.completed = false;
        Ok(())
    }

    /// `game -> setup`: always available; halts the timer and discards
    /// in-progress stage state. Unconditional, no confirmation.
    pub fn leave_game(&mut self) {
        self.mode = Mode::Setup;
        self.challenges.clear();
        self.current_stage = 0;
        self.timer_active = false;
        self.completed = false;
    }

    // ---- game-mode operations ----

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        compute_remaining(self.started_at_ms, self.config.time_limit_ms(), now_ms)
    }

    pub fn timer(&mut self, now_ms: u64) -> TimerSnapshot {
        let remaining = if self.mode == Mode::Game {
            self.remaining_ms(now_ms)
        } else {
            0
        };
        if remaining == 0 && self.timer_active {
            self.timer_active = false;
        }
        TimerSnapshot {
            remaining_ms: remaining,
            display: format_clock(remaining),
            urgent: is_urgent(remaining),
            expired: self.mode == Mode::Game && remaining == 0 && !self.completed,
        }
    }

    #[instrument(level = "debug", skip(self, answer), fields(stage = self.current_stage, answer_len = answer.len()))]
    pub fn submit_answer(&mut self, answer: &str, now_ms: u64) -> SubmitOutcome {
        if self.mode != Mode::Game || self.completed {
            return SubmitOutcome::NotRunning;
        }
        if self.remaining_ms(now_ms) == 0 {
            self.timer_active = false;
            return SubmitOutcome::TimeUp;
        }
        let solution = &self.challenges[self.current_stage].canonical_solution;
        if !check_answer(answer, solution) {
            return SubmitOutcome::Incorrect;
        }
        if self.current_stage + 1 < self.challenges.len() {
            self.current_stage += 1;
            SubmitOutcome::Advanced
        } else {
            self.completed = true;
            self.timer_active = false;
            SubmitOutcome::Escaped
        }
    }
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Author-side scratch settings, injected rather than reached for globally
/// so session logic stays testable outside a browser or server context.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

#[derive(Default)]
pub struct MemorySettings {
    entries: std::collections::HashMap<String, String>,
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::template;

    fn solution_for(s: &PreviewSession) -> String {
        s.challenges()[s.current_stage()].canonical_solution.clone()
    }

    #[test]
    fn toggle_never_empties_the_selection() {
        let mut s = PreviewSession::new();
        s.config.selected = vec![ChallengeType::Format];
        assert_eq!(
            s.toggle_challenge(ChallengeType::Format),
            Err(ConfigError::NoChallengesSelected)
        );
        assert_eq!(s.config.selected, vec![ChallengeType::Format]);

        s.toggle_challenge(ChallengeType::Api).unwrap();
        assert_eq!(s.config.selected, vec![ChallengeType::Format, ChallengeType::Api]);
        s.toggle_challenge(ChallengeType::Format).unwrap();
        assert_eq!(s.config.selected, vec![ChallengeType::Api]);
    }

    #[test]
    fn presets_overwrite_selection_and_time_limit() {
        let mut s = PreviewSession::new();
        s.set_time_limit(42);
        s.config.selected = vec![ChallengeType::Api];
        s.apply_preset(Preset::Medium);
        assert_eq!(s.config.selected.len(), 4);
        assert_eq!(s.config.time_limit_minutes, 10);
    }

    #[test]
    fn time_limit_is_clamped() {
        let mut s = PreviewSession::new();
        s.set_time_limit(0);
        assert_eq!(s.config.time_limit_minutes, 1);
        s.set_time_limit(120);
        assert_eq!(s.config.time_limit_minutes, 60);
    }

    #[test]
    fn start_game_assembles_instances_and_resets_state() {
        let mut s = PreviewSession::new();
        s.config.selected = vec![ChallengeType::Debug, ChallengeType::Logic];
        s.start_game(1_000).unwrap();
        assert_eq!(s.mode(), Mode::Game);
        assert_eq!(s.challenges().len(), 2);
        assert_eq!(s.challenges()[0].instance_id, "debug-0");
        assert_eq!(s.current_stage(), 0);
        assert!(!s.completed());
    }

    #[test]
    fn start_game_refuses_invalid_config() {
        let mut s = PreviewSession::new();
        s.config.room_name = "".into();
        assert_eq!(s.start_game(0), Err(ConfigError::MissingRoomName));
        assert_eq!(s.mode(), Mode::Setup);
    }

    #[test]
    fn correct_answers_advance_then_escape() {
        let mut s = PreviewSession::new();
        s.config.selected = vec![ChallengeType::Format, ChallengeType::Debug];
        s.start_game(0).unwrap();

        let first = solution_for(&s);
        assert_eq!(s.submit_answer(&first, 1_000), SubmitOutcome::Advanced);
        assert_eq!(s.current_stage(), 1);

        assert_eq!(s.submit_answer("nope", 2_000), SubmitOutcome::Incorrect);
        assert_eq!(s.current_stage(), 1);

        let second = format!("done: {}", solution_for(&s));
        assert_eq!(s.submit_answer(&second, 3_000), SubmitOutcome::Escaped);
        assert!(s.completed());
        // Completion freezes the session; further submissions are ignored.
        assert_eq!(s.submit_answer(&first, 4_000), SubmitOutcome::NotRunning);
    }

    #[test]
    fn expiry_blocks_submissions() {
        let mut s = PreviewSession::new();
        s.config.selected = vec![ChallengeType::Format];
        s.config.time_limit_minutes = 1;
        s.start_game(0).unwrap();
        let sol = template(ChallengeType::Format).canonical_solution;
        assert_eq!(s.submit_answer(sol, 60_000), SubmitOutcome::TimeUp);
        assert!(!s.completed());
    }

    #[test]
    fn timer_snapshot_boundaries() {
        let mut s = PreviewSession::new();
        s.config.time_limit_minutes = 2;
        s.start_game(0).unwrap();

        let t = s.timer(60_000);
        assert_eq!(t.remaining_ms, 60_000);
        assert_eq!(t.display, "1:00");
        assert!(!t.urgent);
        assert!(!t.expired);

        let t = s.timer(60_001);
        assert_eq!(t.remaining_ms, 59_999);
        assert!(t.urgent);

        let t = s.timer(120_000);
        assert_eq!(t.remaining_ms, 0);
        assert_eq!(t.display, "0:00");
        assert!(t.expired);
    }

    #[test]
    fn leave_game_halts_and_discards() {
        let mut s = PreviewSession::new();
        s.start_game(0).unwrap();
        let sol = solution_for(&s);
        s.submit_answer(&sol, 100);
        s.leave_game();
        assert_eq!(s.mode(), Mode::Setup);
        assert!(s.challenges().is_empty());
        assert_eq!(s.current_stage(), 0);
        assert_eq!(s.submit_answer("anything", 200), SubmitOutcome::NotRunning);
    }

    #[test]
    fn settings_store_round_trip() {
        let mut store = MemorySettings::default();
        assert_eq!(store.get("theme"), None);
        store.set("theme", "dark".into());
        assert_eq!(store.get("theme"), Some("dark".into()));
    }
}
