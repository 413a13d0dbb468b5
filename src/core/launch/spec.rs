// ─── Launch Specification ───
// Immutable description of one game-client launch, built fresh per request.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::auth::AuthorizationToken;
use crate::core::error::{ShellError, ShellResult};

/// Release channel of the requested client version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionChannel {
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
}

impl VersionChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionChannel::Release => "release",
            VersionChannel::Snapshot => "snapshot",
            VersionChannel::OldBeta => "old_beta",
            VersionChannel::OldAlpha => "old_alpha",
        }
    }
}

/// Which client version to start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionSelector {
    pub number: String,
    #[serde(rename = "type")]
    pub channel: VersionChannel,
}

impl Default for VersionSelector {
    fn default() -> Self {
        Self {
            number: "1.17.1".into(),
            channel: VersionChannel::Release,
        }
    }
}

/// JVM heap bounds for the client process, in megabytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MemoryBounds {
    pub min_mb: u32,
    pub max_mb: u32,
}

impl Default for MemoryBounds {
    fn default() -> Self {
        Self {
            min_mb: 4096,
            max_mb: 6144,
        }
    }
}

impl MemoryBounds {
    pub fn validate(&self) -> ShellResult<()> {
        if self.min_mb < 512 {
            return Err(ShellError::Other(
                "Minimum allowed game memory is 512 MB".into(),
            ));
        }
        if self.min_mb > self.max_mb {
            return Err(ShellError::Other(format!(
                "Memory bounds are inverted: min {} MB > max {} MB",
                self.min_mb, self.max_mb
            )));
        }
        Ok(())
    }
}

/// Launch parameters sourced from the environment file. Everything has a
/// default, so an omitted `launch` section behaves like the stock install.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Game working directory; defaults to `<user-data>/minecraft`.
    pub install_root: Option<PathBuf>,
    /// Java binary; defaults to `java` on PATH.
    pub java_binary: Option<PathBuf>,
    pub version: VersionSelector,
    pub memory: MemoryBounds,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            install_root: None,
            java_binary: None,
            version: VersionSelector::default(),
            memory: MemoryBounds::default(),
        }
    }
}

impl LaunchConfig {
    pub fn resolved_install_root(&self, data_dir: &Path) -> PathBuf {
        self.install_root
            .clone()
            .unwrap_or_else(|| data_dir.join("minecraft"))
    }

    pub fn resolved_java_binary(&self) -> PathBuf {
        self.java_binary
            .clone()
            .unwrap_or_else(|| PathBuf::from("java"))
    }
}

/// Immutable description of how to start the game client. Owned exclusively
/// by the launch supervisor for the duration of one launch.
#[derive(Debug)]
pub struct LaunchSpecification {
    /// Optional pre-packaged client jar overriding the versioned layout.
    pub client_package: Option<PathBuf>,
    pub authorization: AuthorizationToken,
    pub install_root: PathBuf,
    pub java_binary: PathBuf,
    pub version: VersionSelector,
    pub memory: MemoryBounds,
}

impl LaunchSpecification {
    /// Build the specification for one launch, creating the install root on
    /// demand so the spawned process has a working directory.
    pub fn from_config(
        config: &LaunchConfig,
        data_dir: &Path,
        authorization: AuthorizationToken,
    ) -> ShellResult<LaunchSpecification> {
        config.memory.validate()?;

        let install_root = config.resolved_install_root(data_dir);
        std::fs::create_dir_all(&install_root).map_err(|source| ShellError::Io {
            path: install_root.clone(),
            source,
        })?;

        Ok(LaunchSpecification {
            client_package: None,
            authorization,
            install_root,
            java_binary: config.resolved_java_binary(),
            version: config.version.clone(),
            memory: config.memory,
        })
    }

    /// Path of the client jar to hand to the JVM.
    pub fn client_jar(&self) -> PathBuf {
        match &self.client_package {
            Some(package) => package.clone(),
            None => self
                .install_root
                .join("versions")
                .join(&self.version.number)
                .join(format!("{}.jar", self.version.number)),
        }
    }
}
