use std::{collections::HashMap, fs, path::Path};

use chrono::TimeDelta;
use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub model_path: Option<String>,
    pub session_ttl_seconds: i64,
    pub max_body_bytes: usize,
    pub page_title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8501".into(),
            model_path: None,
            session_ttl_seconds: 3600,
            max_body_bytes: 64 * 1024,
            page_title: "Lauki Finance: Credit Risk Modelling".into(),
        }
    }
}

impl Settings {
    /// Idle lifetime of a form session. Loading already rejects values this
    /// cannot represent, so the fallback only covers hand-built settings.
    pub fn session_ttl(&self) -> TimeDelta {
        ttl_from_seconds(self.session_ttl_seconds)
            .unwrap_or_else(|| TimeDelta::seconds(Settings::default().session_ttl_seconds))
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `server.toml` table, then environment variables.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("bind_addr") {
                    settings.server_bind = v.clone();
                }
                if let Some(v) = file_cfg.get("model_path") {
                    settings.model_path = Some(v.clone());
                }
                if let Some(v) = file_cfg.get("session_ttl_seconds") {
                    apply_ttl(&mut settings.session_ttl_seconds, "session_ttl_seconds", v);
                }
                if let Some(v) = file_cfg.get("max_body_bytes") {
                    apply_parsed(&mut settings.max_body_bytes, "max_body_bytes", v);
                }
                if let Some(v) = file_cfg.get("page_title") {
                    settings.page_title = v.clone();
                }
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring unreadable settings file");
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__MODEL_PATH") {
        settings.model_path = Some(v).filter(|path| !path.trim().is_empty());
    }

    if let Some(v) = env("APP__SESSION_TTL_SECONDS") {
        apply_ttl(&mut settings.session_ttl_seconds, "APP__SESSION_TTL_SECONDS", &v);
    }

    if let Some(v) = env("APP__MAX_BODY_BYTES") {
        apply_parsed(&mut settings.max_body_bytes, "APP__MAX_BODY_BYTES", &v);
    }

    settings
}

fn apply_parsed<T: std::str::FromStr>(slot: &mut T, name: &str, raw: &str) {
    match raw.trim().parse::<T>() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(setting = name, value = raw, "ignoring unparseable setting"),
    }
}

fn ttl_from_seconds(seconds: i64) -> Option<TimeDelta> {
    TimeDelta::try_seconds(seconds).filter(|ttl| *ttl > TimeDelta::zero())
}

fn apply_ttl(slot: &mut i64, name: &str, raw: &str) {
    match raw.trim().parse::<i64>() {
        Ok(seconds) if ttl_from_seconds(seconds).is_some() => *slot = seconds,
        Ok(_) => warn!(setting = name, value = raw, "ignoring non-positive or oversized session ttl"),
        Err(_) => warn!(setting = name, value = raw, "ignoring unparseable setting"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
