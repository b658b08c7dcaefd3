//! Application-level configuration loading: team color palette and shot-clock durations.

use std::{collections::HashMap, env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    dto::validation::is_hex_color,
    state::{clock::SHOT_CLOCK_MAX, sport::Sport},
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCOREBOARD_CONFIG_PATH";
/// Color handed out once the whole palette is in use.
const FALLBACK_COLOR: &str = "#1976d2";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    team_colors: Vec<String>,
    shot_clock_seconds: HashMap<String, u8>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        colors = app_config.team_colors.len(),
                        shot_clock_overrides = app_config.shot_clock_seconds.len(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a configuration document, dropping invalid entries.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// First palette color not already present in `used` (case-insensitive).
    pub fn first_unused_color<S: AsRef<str>>(&self, used: &[S]) -> String {
        self.team_colors
            .iter()
            .find(|candidate| {
                used.iter()
                    .all(|existing| !existing.as_ref().eq_ignore_ascii_case(candidate))
            })
            .cloned()
            .unwrap_or_else(|| FALLBACK_COLOR.to_owned())
    }

    /// Value the shot clock resets to for `sport`, zero when it has no shot clock.
    pub fn shot_clock_seconds(&self, sport: &Sport) -> u8 {
        if !sport.has_shot_clock {
            return 0;
        }
        self.shot_clock_seconds
            .get(sport.id)
            .copied()
            .unwrap_or(sport.shot_clock_seconds)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            team_colors: default_colors(),
            shot_clock_seconds: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    team_colors: Option<Vec<String>>,
    #[serde(default)]
    shot_clock_seconds: HashMap<String, i64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let team_colors = match value.team_colors {
            Some(colors) => {
                let (valid, invalid): (Vec<_>, Vec<_>) =
                    colors.into_iter().partition(|color| is_hex_color(color));
                if !invalid.is_empty() {
                    warn!(?invalid, "skipping invalid team colors");
                }
                if valid.is_empty() { default_colors() } else { valid }
            }
            None => default_colors(),
        };

        let shot_clock_seconds = value
            .shot_clock_seconds
            .into_iter()
            .map(|(sport, seconds)| (sport, seconds.clamp(1, i64::from(SHOT_CLOCK_MAX)) as u8))
            .collect();

        Self {
            team_colors,
            shot_clock_seconds,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in palette shipped with the binary.
fn default_colors() -> Vec<String> {
    [
        "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
        "#6366F1", "#84CC16",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::sport::lookup;

    #[test]
    fn palette_skips_used_colors() {
        let config = AppConfig::default();
        assert_eq!(config.first_unused_color::<&str>(&[]), "#3B82F6");
        assert_eq!(config.first_unused_color(&["#3b82f6"]), "#EF4444");

        let all = default_colors();
        assert_eq!(config.first_unused_color(&all), FALLBACK_COLOR);
    }

    #[test]
    fn invalid_entries_are_dropped_and_overrides_clamped() {
        let config = AppConfig::from_json(
            r##"{"team_colors": ["#123456", "red"], "shot_clock_seconds": {"basketball": 300, "netball": 30}}"##,
        )
        .unwrap();
        assert_eq!(config.first_unused_color::<&str>(&[]), "#123456");

        let basketball = lookup("basketball").unwrap();
        let netball = lookup("netball").unwrap();
        let soccer = lookup("soccer").unwrap();
        assert_eq!(config.shot_clock_seconds(basketball), 99);
        assert_eq!(config.shot_clock_seconds(netball), 30);
        assert_eq!(config.shot_clock_seconds(soccer), 0);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config.first_unused_color::<&str>(&[]), "#3B82F6");
        assert_eq!(config.shot_clock_seconds(lookup("basketball").unwrap()), 24);
    }
}
