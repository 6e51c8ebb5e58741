//! Application-level configuration loading for gameplay tunables.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "TOPLIST_BACK_CONFIG_PATH";

/// Every session runs on the same fixed clock.
const DEFAULT_TIME_LIMIT_SECS: u32 = 60;
/// Leaderboard page size.
const DEFAULT_LEADERBOARD_LIMIT: u32 = 50;
/// Champions wall page size.
const DEFAULT_CHAMPIONS_LIMIT: u32 = 10;
/// Recent-guess feed length shown next to the board.
const DEFAULT_RECENT_GUESSES: usize = 5;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Seconds on the clock for every new session.
    pub time_limit_secs: u32,
    /// Maximum rows returned by the leaderboard query.
    pub leaderboard_limit: u32,
    /// Maximum rows returned by the champions query.
    pub champions_limit: u32,
    /// Bounded length of the per-session recent-guess feed.
    pub recent_guesses: usize,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to baked-in defaults
    /// when the file is absent or malformed.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        time_limit_secs = config.time_limit_secs,
                        "loaded gameplay configuration"
                    );
                    config
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
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
            champions_limit: DEFAULT_CHAMPIONS_LIMIT,
            recent_guesses: DEFAULT_RECENT_GUESSES,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file; every field is optional so
/// a partial file overrides only what it names.
struct RawConfig {
    #[serde(default)]
    time_limit_secs: Option<u32>,
    #[serde(default)]
    leaderboard_limit: Option<u32>,
    #[serde(default)]
    champions_limit: Option<u32>,
    #[serde(default)]
    recent_guesses: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            time_limit_secs: raw.time_limit_secs.unwrap_or(defaults.time_limit_secs),
            leaderboard_limit: raw.leaderboard_limit.unwrap_or(defaults.leaderboard_limit),
            champions_limit: raw.champions_limit.unwrap_or(defaults.champions_limit),
            recent_guesses: raw.recent_guesses.unwrap_or(defaults.recent_guesses),
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
