//! HTTP endpoint handlers. These are thin wrappers over the generator and
//! the room store. Each handler is instrumented and logs parameters and
//! basic result info.
//!
//! Error shape follows the taxonomy: 400 `{error}` for validation, 404
//! `{error}` for unknown ids, 500 with a generic message for storage
//! failures (details go to the log, not the client).

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{Html, IntoResponse, Response},
  Json,
};
use tracing::{error, info, instrument};

use crate::assemble::build_instances;
use crate::generate::generate_document;
use crate::protocol::*;
use crate::state::{now_ms, AppState};
use crate::store::{NewRoom, RoomPatch};
use crate::util::trunc_for_log;

fn bad_request(message: impl Into<String>) -> Response {
  (StatusCode::BAD_REQUEST, Json(ErrorOut { error: message.into() })).into_response()
}

fn not_found_json() -> Response {
  (StatusCode::NOT_FOUND, Json(ErrorOut { error: "Room not found".into() })).into_response()
}

fn storage_error(context: &str, e: anyhow::Error) -> Response {
  error!(target: "rooms", error = %e, "{context}");
  (
    StatusCode::INTERNAL_SERVER_ERROR,
    Json(ErrorOut { error: format!("Failed to {context}") }),
  )
    .into_response()
}

/// Presence + non-emptiness checks shared by create and test. Returns the
/// validated fields or the first failing field's message.
fn validate_room_body(body: &CreateRoomIn) -> Result<NewRoom, String> {
  let name = match body.name.as_deref().map(str::trim) {
    Some(n) if !n.is_empty() => n.to_string(),
    _ => return Err("Missing required field: name".into()),
  };
  let time_limit = match body.time_limit {
    Some(t) if (1..=60).contains(&t) => t,
    Some(t) => return Err(format!("timeLimit must be between 1 and 60 minutes (got {t})")),
    None => return Err("Missing required field: timeLimit".into()),
  };
  let challenges = match &body.challenges {
    Some(c) if !c.is_empty() => c.clone(),
    _ => return Err("Missing required field: challenges".into()),
  };
  let html_output = match &body.html_output {
    Some(h) if !h.is_empty() => h.clone(),
    _ => return Err("Missing required field: htmlOutput".into()),
  };
  Ok(NewRoom { name, time_limit_minutes: time_limit, challenge_types: challenges, html_output })
}

/// Partial-update semantics: empty strings and empty lists count as "not
/// provided", so an update can never overwrite a stored field with a value
/// that create would have rejected.
fn to_room_patch(body: UpdateRoomIn) -> RoomPatch {
  RoomPatch {
    name: body.name.filter(|n| !n.trim().is_empty()),
    time_limit_minutes: body.time_limit,
    challenge_types: body.challenges.filter(|c| !c.is_empty()),
    html_output: body.html_output.filter(|h| !h.is_empty()),
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

/// Stateless generation: validate the config, assemble instances, render.
#[instrument(level = "info", skip(body), fields(room = %body.room_name, minutes = body.time_limit_minutes, stages = body.selected.len()))]
pub async fn http_generate(Json(body): Json<GenerateIn>) -> Response {
  if let Err(e) = body.validate() {
    return bad_request(e.to_string());
  }
  let instances = build_instances(&body.selected);
  let html = generate_document(&body, &instances);
  info!(target: "rooms", room = %body.room_name, stages = instances.len(), bytes = html.len(), "Document generated");
  Json(GenerateOut { html }).into_response()
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_rooms(State(state): State<Arc<AppState>>) -> Response {
  match state.store.lock().await.list() {
    Ok(rooms) => {
      info!(target: "rooms", count = rooms.len(), "HTTP room list served");
      Json(rooms).into_response()
    }
    Err(e) => storage_error("fetch rooms", e),
  }
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_create_room(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CreateRoomIn>,
) -> Response {
  let room = match validate_room_body(&body) {
    Ok(room) => room,
    Err(msg) => return bad_request(msg),
  };
  match state.store.lock().await.create(room, now_ms() as i64) {
    Ok(record) => {
      info!(target: "rooms", id = %record.id, name = %record.name, "Room created");
      (StatusCode::CREATED, Json(record)).into_response()
    }
    Err(e) => storage_error("create room", e),
  }
}

/// Validate-only dry run; never writes to the store.
#[instrument(level = "info", skip(body))]
pub async fn http_test_room(Json(body): Json<CreateRoomIn>) -> Response {
  match validate_room_body(&body) {
    Ok(room) => {
      info!(target: "rooms", name = %room.name, html = %trunc_for_log(&room.html_output, 64), "Room payload test passed");
      Json(TestOut { success: true, message: "Test successful - data not saved".into() })
        .into_response()
    }
    Err(msg) => bad_request(msg),
  }
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_room(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Response {
  match state.store.lock().await.get(&id) {
    Ok(Some(record)) => Json(record).into_response(),
    Ok(None) => not_found_json(),
    Err(e) => storage_error("fetch room", e),
  }
}

#[instrument(level = "info", skip(state, body), fields(%id))]
pub async fn http_update_room(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<UpdateRoomIn>,
) -> Response {
  if let Some(t) = body.time_limit {
    if !(1..=60).contains(&t) {
      return bad_request(format!("timeLimit must be between 1 and 60 minutes (got {t})"));
    }
  }
  let patch = to_room_patch(body);
  match state.store.lock().await.update(&id, patch) {
    Ok(Some(record)) => {
      info!(target: "rooms", %id, "Room updated");
      Json(record).into_response()
    }
    Ok(None) => not_found_json(),
    Err(e) => storage_error("update room", e),
  }
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_delete_room(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Response {
  match state.store.lock().await.delete(&id) {
    Ok(true) => {
      info!(target: "rooms", %id, "Room deleted");
      Json(DeletedOut { message: "Room deleted successfully".into() }).into_response()
    }
    Ok(false) => not_found_json(),
    Err(e) => storage_error("delete room", e),
  }
}

/// Serve a stored room's html verbatim as `text/html`. Unknown ids get a
/// minimal human-readable error page rather than JSON, since the consumer
/// here is a browser following a share link.
#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_serve_room(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Response {
  match state.store.lock().await.get(&id) {
    Ok(Some(record)) => {
      info!(target: "rooms", %id, bytes = record.html_output.len(), "Room html served");
      Html(record.html_output).into_response()
    }
    Ok(None) => (
      StatusCode::NOT_FOUND,
      Html("<html><body><h1>Escape Room Not Found</h1></body></html>".to_string()),
    )
      .into_response(),
    Err(e) => {
      error!(target: "rooms", %id, error = %e, "serve room");
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<html><body><h1>Internal Server Error</h1></body></html>".to_string()),
      )
        .into_response()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::ChallengeType;

  fn full_body() -> CreateRoomIn {
    CreateRoomIn {
      name: Some("Test Room".into()),
      time_limit: Some(10),
      challenges: Some(vec![ChallengeType::Format, ChallengeType::Debug]),
      html_output: Some("<html><body>Test</body></html>".into()),
    }
  }

  #[test]
  fn validation_accepts_a_complete_body() {
    let room = validate_room_body(&full_body()).unwrap();
    assert_eq!(room.name, "Test Room");
    assert_eq!(room.time_limit_minutes, 10);
    assert_eq!(room.challenge_types.len(), 2);
  }

  #[test]
  fn validation_rejects_each_missing_field() {
    let mut b = full_body();
    b.name = Some("  ".into());
    assert!(validate_room_body(&b).unwrap_err().contains("name"));

    let mut b = full_body();
    b.time_limit = None;
    assert!(validate_room_body(&b).unwrap_err().contains("timeLimit"));

    let mut b = full_body();
    b.time_limit = Some(0);
    assert!(validate_room_body(&b).unwrap_err().contains("between 1 and 60"));

    let mut b = full_body();
    b.challenges = Some(vec![]);
    assert!(validate_room_body(&b).unwrap_err().contains("challenges"));

    let mut b = full_body();
    b.html_output = Some(String::new());
    assert!(validate_room_body(&b).unwrap_err().contains("htmlOutput"));
  }

  #[test]
  fn update_patch_treats_empty_values_as_absent() {
    let patch = to_room_patch(UpdateRoomIn {
      name: Some("  ".into()),
      time_limit: None,
      challenges: Some(vec![]),
      html_output: Some(String::new()),
    });
    assert!(patch.name.is_none());
    assert!(patch.challenge_types.is_none());
    assert!(patch.html_output.is_none());

    let patch = to_room_patch(UpdateRoomIn {
      name: Some("Renamed".into()),
      time_limit: Some(5),
      challenges: Some(vec![ChallengeType::Api]),
      html_output: Some("<html></html>".into()),
    });
    assert_eq!(patch.name.as_deref(), Some("Renamed"));
    assert_eq!(patch.time_limit_minutes, Some(5));
    assert_eq!(patch.challenge_types.as_deref(), Some(&[ChallengeType::Api][..]));
  }
}
