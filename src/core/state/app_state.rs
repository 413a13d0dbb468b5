use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::core::auth::{CredentialProvider, LegacyAuthenticator};
use crate::core::bridge::GameEvent;
use crate::core::environment::{self, EnvironmentConfig};
use crate::core::error::ShellResult;
use crate::core::launch::LaunchSupervisor;

/// Process-wide state owned by the control process: the read-only environment
/// configuration, the per-mode user-data directory, and the single launch
/// supervisor. Handlers receive it as managed state; there are no globals.
pub struct AppState {
    pub environment: EnvironmentConfig,
    pub data_dir: PathBuf,
    pub supervisor: LaunchSupervisor,
}

impl AppState {
    pub fn new(environment: EnvironmentConfig, events: UnboundedSender<GameEvent>) -> Self {
        let data_dir = environment::user_data_dir(environment.name);
        if !data_dir.exists() {
            let _ = std::fs::create_dir_all(&data_dir);
        }

        let provider: Arc<dyn CredentialProvider> = Arc::new(LegacyAuthenticator);
        let supervisor = LaunchSupervisor::new(provider, events);

        Self {
            environment,
            data_dir,
            supervisor,
        }
    }

    /// One launch request: credentials and launch parameters come from the
    /// environment configuration, never from the display process.
    pub async fn request_launch(&self) -> ShellResult<()> {
        self.supervisor
            .request_launch(
                &self.environment.credentials,
                &self.environment.launch,
                &self.data_dir,
            )
            .await
    }
}
