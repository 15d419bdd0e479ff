//! Server configuration.

use crate::session::{DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS, GameMode};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for the HTTP game server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Pause before the computer's reply lands, in milliseconds.
    #[serde(default = "default_advisor_delay_ms")]
    advisor_delay_ms: u64,

    /// Seed for the advisor's tie-breaking. Unset means seeded from the OS.
    #[serde(default)]
    advisor_seed: Option<u64>,

    /// Mode for newly created sessions.
    #[serde(default)]
    default_mode: GameMode,

    /// Seconds a session may sit idle before it is dropped.
    #[serde(default = "default_session_idle_secs")]
    session_idle_secs: u64,

    /// Most sessions held at once.
    #[serde(default = "default_max_sessions")]
    max_sessions: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_advisor_delay_ms() -> u64 {
    600
}

fn default_session_idle_secs() -> u64 {
    DEFAULT_IDLE_TIMEOUT.as_secs()
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            advisor_delay_ms: default_advisor_delay_ms(),
            advisor_seed: None,
            default_mode: GameMode::default(),
            session_idle_secs: default_session_idle_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    #[instrument]
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::from_file(path),
            Some(path) => {
                info!(
                    "Config file not found at {}, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Overrides the bind host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Overrides the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Overrides the computer's reply delay.
    pub fn with_advisor_delay_ms(mut self, delay_ms: u64) -> Self {
        self.advisor_delay_ms = delay_ms;
        self
    }

    /// Pins the advisor's random seed.
    pub fn with_advisor_seed(mut self, seed: u64) -> Self {
        self.advisor_seed = Some(seed);
        self
    }

    /// Overrides the mode for new sessions.
    pub fn with_default_mode(mut self, mode: GameMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// The computer's reply delay as a [`Duration`].
    pub fn advisor_delay(&self) -> Duration {
        Duration::from_millis(self.advisor_delay_ms)
    }

    /// How long an untouched session survives.
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080\nadvisor_seed = 9").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.port(), 8080);
        assert_eq!(*config.advisor_seed(), Some(9));
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.advisor_delay_ms(), 600);
        assert_eq!(*config.default_mode(), GameMode::HumanVsComputer);
        assert_eq!(config.session_idle_timeout(), Duration::from_secs(3600));
        assert_eq!(*config.max_sessions(), 1000);
    }

    #[test]
    fn test_mode_parses_snake_case() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_mode = \"human_vs_human\"").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.default_mode(), GameMode::HumanVsHuman);
    }

    #[test]
    fn test_bad_toml_reports_location() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = ServerConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::default()
            .with_host("0.0.0.0")
            .with_port(9000)
            .with_advisor_delay_ms(0)
            .with_advisor_seed(3)
            .with_default_mode(GameMode::HumanVsHuman);
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(*config.port(), 9000);
        assert_eq!(config.advisor_delay(), Duration::ZERO);
        assert_eq!(*config.advisor_seed(), Some(3));
        assert_eq!(*config.default_mode(), GameMode::HumanVsHuman);
    }
}
