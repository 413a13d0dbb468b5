// ─── Environment Resolver ───
// Loads the mode-keyed deployment configuration at process start and computes
// the per-mode user-data directory.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::error::{ShellError, ShellResult};
use crate::core::launch::LaunchConfig;

pub const APP_DIR_NAME: &str = "CraftShell";

/// Environment variable selecting the deployment mode.
const MODE_VAR: &str = "CRAFTSHELL_ENV";
/// Environment variable overriding the configuration directory.
const CONFIG_DIR_VAR: &str = "CRAFTSHELL_CONFIG_DIR";

/// Deployment mode the shell was started in. Resolved once, never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Test,
    Production,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Test => "test",
            Mode::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Mode::Production)
    }

    pub fn parse(raw: &str) -> Option<Mode> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" => Some(Mode::Development),
            "test" => Some(Mode::Test),
            "production" => Some(Mode::Production),
            _ => None,
        }
    }

    /// Resolve the mode from `CRAFTSHELL_ENV`, defaulting to development in
    /// debug builds and production otherwise.
    pub fn detect() -> ShellResult<Mode> {
        match std::env::var(MODE_VAR) {
            Ok(raw) if !raw.trim().is_empty() => {
                Mode::parse(&raw).ok_or_else(|| ShellError::Config {
                    path: PathBuf::from(MODE_VAR),
                    reason: format!("unknown mode {raw:?}"),
                })
            }
            _ => {
                if cfg!(debug_assertions) {
                    Ok(Mode::Development)
                } else {
                    Ok(Mode::Production)
                }
            }
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity material handed to the credential provider at launch time.
/// The password never reaches a log line.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

/// Process-wide deployment configuration. Loaded exactly once at startup,
/// read-only afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub name: Mode,
    pub credentials: Credentials,
    #[serde(default)]
    pub launch: LaunchConfig,
}

impl EnvironmentConfig {
    /// Load the configuration for the detected mode. Any failure here is
    /// startup-fatal; the caller must not let the process reach "ready".
    pub fn load_default() -> ShellResult<EnvironmentConfig> {
        let mode = Mode::detect()?;
        Self::load_for_mode(&config_dir(), mode)
    }

    /// Load `env_<mode>.json` from the given directory.
    pub fn load_for_mode(dir: &std::path::Path, mode: Mode) -> ShellResult<EnvironmentConfig> {
        let path = dir.join(format!("env_{mode}.json"));

        let raw = std::fs::read_to_string(&path).map_err(|source| ShellError::Config {
            path: path.clone(),
            reason: source.to_string(),
        })?;

        let config: EnvironmentConfig =
            serde_json::from_str(&raw).map_err(|source| ShellError::Config {
                path: path.clone(),
                reason: source.to_string(),
            })?;

        if config.name != mode {
            return Err(ShellError::Config {
                path,
                reason: format!(
                    "file declares mode {:?} but {:?} was requested",
                    config.name.as_str(),
                    mode.as_str()
                ),
            });
        }

        Ok(config)
    }
}

fn config_dir() -> PathBuf {
    match std::env::var(CONFIG_DIR_VAR) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("config"),
    }
}

/// Per-mode user-data directory. Non-production modes get a suffixed folder
/// so production and non-production installations on one machine never share
/// state.
pub fn user_data_dir(mode: Mode) -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    if mode.is_production() {
        base.join(APP_DIR_NAME)
    } else {
        base.join(format!("{APP_DIR_NAME} ({mode})"))
    }
}
