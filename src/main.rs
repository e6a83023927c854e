//! Roomsmith · Escape-Room Builder Backend
//!
//! - Axum HTTP + WebSocket API
//! - Static document generator (self-contained escape-room HTML exports)
//! - SQLite persistence for generated rooms
//! - Static SPA fallback for the authoring frontend
//!
//! Important env variables:
//!   PORT          : u16 (default 3000)
//!   DATABASE_PATH : SQLite file for persisted rooms (default ./rooms.db)
//!   APP_CONFIG_PATH : path to optional TOML config
//!   LOG_LEVEL     : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT    : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod catalog;
mod assemble;
mod rules;
mod generate;
mod session;
mod store;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::config::load_config_from_env;
use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = load_config_from_env();

  // Build shared application state (room store, author settings).
  let state = Arc::new(AppState::new(&cfg)?);

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone(), &cfg.static_dir);

  let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "roomsmith_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
