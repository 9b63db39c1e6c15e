//! Planner configuration
//!
//! Settings come from a JSON file (by default `<config_dir>/planman/config.json`)
//! with `PLANMAN_*` environment variables layered on top. Access tokens are
//! issued and refreshed by the identity provider; this module only carries them.

use crate::calendar::common::validate_ics_url_format;
use crate::error::{AppError, AppResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_CALENDAR_ID: &str = "primary";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Google,
    Ics,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Google => "google",
            SourceKind::Ics => "ics",
        }
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "google" => Ok(SourceKind::Google),
            "ics" => Ok(SourceKind::Ics),
            other => Err(AppError::config(format!("Unknown calendar source: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub source: SourceKind,
    pub calendar_id: String,
    pub access_token: Option<String>,
    pub ics_url: Option<String>,
    pub api_base: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Google,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            access_token: None,
            ics_url: None,
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl PlannerConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("planman").join("config.json"))
    }

    /// Loads the config file and applies environment overrides.
    ///
    /// An explicit `path` must exist; a missing default file just means
    /// "use defaults".
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        info!("Loading configuration from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn apply_env(&mut self) -> AppResult<()> {
        if let Some(source) = env_value("PLANMAN_SOURCE") {
            self.source = SourceKind::parse(&source)?;
        }
        if let Some(calendar_id) = env_value("PLANMAN_CALENDAR_ID") {
            self.calendar_id = calendar_id;
        }
        if let Some(token) = env_value("PLANMAN_ACCESS_TOKEN") {
            self.access_token = Some(token);
        }
        if let Some(ics_url) = env_value("PLANMAN_ICS_URL") {
            self.ics_url = Some(ics_url);
        }
        if let Some(api_base) = env_value("PLANMAN_API_BASE") {
            self.api_base = api_base;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.request_timeout_secs == Some(0) {
            return Err(AppError::config("request_timeout_secs must be greater than zero"));
        }

        match self.source {
            SourceKind::Google => {
                if self.calendar_id.trim().is_empty() {
                    return Err(AppError::config("calendar_id must not be empty"));
                }
                match self.access_token.as_deref() {
                    Some(token) if !token.trim().is_empty() => Ok(()),
                    _ => Err(AppError::config(
                        "No access token configured. Set access_token in the config file or PLANMAN_ACCESS_TOKEN.",
                    )),
                }
            }
            SourceKind::Ics => {
                let url = self.ics_url.as_deref().unwrap_or("");
                validate_ics_url_format(url).map_err(|e| AppError::config(e.to_string()))
            }
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
