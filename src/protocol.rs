//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::catalog::Preset;
use crate::domain::{ChallengeType, SessionConfig};
use crate::session::{Mode, PreviewSession, SubmitOutcome, TimerSnapshot};

/// Messages the authoring client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    SetRoomName {
        name: String,
    },
    SetTimeLimit {
        minutes: u32,
    },
    ToggleChallenge {
        challenge: ChallengeType,
    },
    ApplyPreset {
        preset: Preset,
    },
    StartGame,
    SubmitAnswer {
        answer: String,
    },
    Timer,
    LeaveGame,
    GenerateHtml,
    SaveSettings {
        key: String,
        value: String,
    },
    LoadSettings {
        key: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session {
        session: SessionOut,
    },
    AnswerResult {
        outcome: SubmitOutcome,
        session: SessionOut,
    },
    Timer {
        timer: TimerSnapshot,
    },
    Generated {
        html: String,
    },
    Settings {
        key: String,
        value: Option<String>,
    },
    Error {
        message: String,
    },
}

/// Snapshot of the preview session, sent after every state-changing message.
#[derive(Debug, Serialize)]
pub struct SessionOut {
    pub mode: Mode,
    #[serde(rename = "roomName")]
    pub room_name: String,
    #[serde(rename = "timeLimitMinutes")]
    pub time_limit_minutes: u32,
    pub challenges: Vec<ChallengeType>,
    #[serde(rename = "currentStage")]
    pub current_stage: usize,
    #[serde(rename = "totalStages")]
    pub total_stages: usize,
    pub completed: bool,
    /// The stage currently on screen; absent in setup mode. The canonical
    /// solution is deliberately not part of this DTO.
    pub stage: Option<StageOut>,
}

#[derive(Debug, Serialize)]
pub struct StageOut {
    #[serde(rename = "instanceId")]
    pub instance_id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "starterText")]
    pub starter_text: String,
}

/// Convert the internal session state to the public DTO.
pub fn to_session_out(s: &PreviewSession) -> SessionOut {
    let stage = (s.mode() == Mode::Game && !s.completed())
        .then(|| s.challenges().get(s.current_stage()))
        .flatten()
        .map(|c| StageOut {
            instance_id: c.instance_id.clone(),
            title: c.title.clone(),
            description: c.description.clone(),
            starter_text: c.starter_text.clone(),
        });
    SessionOut {
        mode: s.mode(),
        room_name: s.config.room_name.clone(),
        time_limit_minutes: s.config.time_limit_minutes,
        challenges: s.config.selected.clone(),
        current_stage: s.current_stage(),
        total_stages: s.challenges().len(),
        completed: s.completed(),
        stage,
    }
}

//
// HTTP request/response DTOs
//

/// Body for create/test. Every field is optional at the serde level so the
/// handler can answer missing fields with a 400 instead of a decode error.
#[derive(Debug, Deserialize)]
pub struct CreateRoomIn {
    pub name: Option<String>,
    #[serde(rename = "timeLimit")]
    pub time_limit: Option<u32>,
    pub challenges: Option<Vec<ChallengeType>>,
    #[serde(rename = "htmlOutput")]
    pub html_output: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoomIn {
    pub name: Option<String>,
    #[serde(rename = "timeLimit")]
    pub time_limit: Option<u32>,
    pub challenges: Option<Vec<ChallengeType>>,
    #[serde(rename = "htmlOutput")]
    pub html_output: Option<String>,
}

/// Stateless generation: the session config is the whole request.
pub type GenerateIn = SessionConfig;

#[derive(Serialize)]
pub struct GenerateOut {
    pub html: String,
}

#[derive(Serialize)]
pub struct TestOut {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct DeletedOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
