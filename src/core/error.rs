use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the entire shell backend.
/// Every module returns `Result<T, ShellError>`.
#[derive(Debug, Error)]
pub enum ShellError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Startup ─────────────────────────────────────────
    // Startup-fatal: the process must not reach "ready" with this pending.
    #[error("Invalid environment configuration at {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },

    // ── Launch ──────────────────────────────────────────
    #[error("Credentials rejected: {0}")]
    CredentialsRejected(String),

    #[error("Cannot spawn game client: {0}")]
    SpawnFailed(String),

    #[error("A game launch is already in flight ({phase})")]
    LaunchInFlight { phase: String },

    // ── Bridge ──────────────────────────────────────────
    #[error("Invalid external URL: {0}")]
    InvalidUrl(String),

    #[error("Cannot open external URL: {0}")]
    OpenExternal(String),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type ShellResult<T> = Result<T, ShellError>;

// ── Serialization for Tauri IPC ─────────────────────────
// Tauri commands require the error type to implement `Serialize`.
impl serde::Serialize for ShellError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
