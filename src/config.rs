//! Loading service configuration from TOML, with env overrides.
//!
//! Precedence: environment variables beat the TOML file, which beats the
//! built-in defaults. A missing or unparseable file is logged and ignored
//! rather than failing startup.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// TCP port the HTTP server binds on.
  pub port: u16,
  /// SQLite database file for persisted rooms.
  pub database_path: String,
  /// Directory served as the authoring frontend (SPA fallback).
  pub static_dir: String,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      port: 3000,
      database_path: "./rooms.db".into(),
      static_dir: "./static".into(),
    }
  }
}

/// Resolve the effective configuration:
/// `APP_CONFIG_PATH` points at an optional TOML file; `PORT` and
/// `DATABASE_PATH` override individual fields.
pub fn load_config_from_env() -> AppConfig {
  let mut cfg = load_config_file().unwrap_or_default();

  if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
    cfg.port = port;
  }
  if let Ok(path) = std::env::var("DATABASE_PATH") {
    if !path.is_empty() {
      cfg.database_path = path;
    }
  }
  cfg
}

fn load_config_file() -> Option<AppConfig> {
  let path = std::env::var("APP_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "roomsmith_backend", %path, "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "roomsmith_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "roomsmith_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn toml_fields_are_all_optional() {
    let cfg: AppConfig = toml::from_str("port = 8080").unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.database_path, "./rooms.db");
    assert_eq!(cfg.static_dir, "./static");
  }

  #[test]
  fn defaults_are_sensible() {
    let cfg = AppConfig::default();
    assert_eq!(cfg.port, 3000);
    assert!(cfg.database_path.ends_with("rooms.db"));
  }
}
