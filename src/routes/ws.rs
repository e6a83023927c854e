//! WebSocket upgrade + message loop for the authoring preview. Each client
//! message is parsed as JSON and applied to the connection's own
//! `PreviewSession`; we reply with a single JSON message per request.
//!
//! Sessions die with their connection. Only the save/load settings messages
//! touch shared state.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::assemble::build_instances;
use crate::generate::generate_document;
use crate::protocol::{to_session_out, ClientWsMessage, ServerWsMessage};
use crate::session::{PreviewSession, SettingsStore};
use crate::state::{now_ms, AppState};

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!(target: "roomsmith_backend", "WebSocket upgrade requested");
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    info!(target: "roomsmith_backend", "WebSocket connected");
    let mut session = PreviewSession::new();

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(txt) => {
                // Parse, dispatch, serialize response.
                let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
                    Ok(incoming) => {
                        debug!(target = "roomsmith_backend", "WS received: {:?}", &incoming);
                        handle_client_ws(incoming, &mut session, &state).await
                    }
                    Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
                };

                let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
                    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
                });

                if let Err(e) = socket.send(Message::Text(out)).await {
                    error!(target: "roomsmith_backend", error = %e, "WS send error");
                    break;
                }
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    info!(target: "roomsmith_backend", "WebSocket disconnected");
}

#[instrument(level = "debug", skip(session, state))]
async fn handle_client_ws(
    msg: ClientWsMessage,
    session: &mut PreviewSession,
    state: &AppState,
) -> ServerWsMessage {
    match msg {
        ClientWsMessage::Ping => ServerWsMessage::Pong,

        ClientWsMessage::SetRoomName { name } => {
            session.set_room_name(name);
            ServerWsMessage::Session { session: to_session_out(session) }
        }

        ClientWsMessage::SetTimeLimit { minutes } => {
            session.set_time_limit(minutes);
            ServerWsMessage::Session { session: to_session_out(session) }
        }

        ClientWsMessage::ToggleChallenge { challenge } => match session.toggle_challenge(challenge) {
            Ok(()) => ServerWsMessage::Session { session: to_session_out(session) },
            Err(e) => ServerWsMessage::Error { message: e.to_string() },
        },

        ClientWsMessage::ApplyPreset { preset } => {
            session.apply_preset(preset);
            info!(target: "rooms", ?preset, "Preset applied");
            ServerWsMessage::Session { session: to_session_out(session) }
        }

        ClientWsMessage::StartGame => match session.start_game(now_ms()) {
            Ok(()) => {
                info!(target: "rooms", stages = session.challenges().len(), "Preview game started");
                ServerWsMessage::Session { session: to_session_out(session) }
            }
            Err(e) => ServerWsMessage::Error { message: e.to_string() },
        },

        ClientWsMessage::SubmitAnswer { answer } => {
            let outcome = session.submit_answer(&answer, now_ms());
            info!(target: "rooms", ?outcome, stage = session.current_stage(), "Preview answer evaluated");
            ServerWsMessage::AnswerResult { outcome, session: to_session_out(session) }
        }

        ClientWsMessage::Timer => ServerWsMessage::Timer { timer: session.timer(now_ms()) },

        ClientWsMessage::LeaveGame => {
            session.leave_game();
            ServerWsMessage::Session { session: to_session_out(session) }
        }

        ClientWsMessage::GenerateHtml => match session.config.validate() {
            Ok(()) => {
                let instances = build_instances(&session.config.selected);
                let html = generate_document(&session.config, &instances);
                info!(target: "rooms", room = %session.config.room_name, bytes = html.len(), "Preview document generated");
                ServerWsMessage::Generated { html }
            }
            Err(e) => ServerWsMessage::Error { message: e.to_string() },
        },

        ClientWsMessage::SaveSettings { key, value } => {
            state.settings.lock().await.set(&key, value.clone());
            ServerWsMessage::Settings { key, value: Some(value) }
        }

        ClientWsMessage::LoadSettings { key } => {
            let value = state.settings.lock().await.get(&key);
            ServerWsMessage::Settings { key, value }
        }
    }
}
