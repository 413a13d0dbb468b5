// ─── Launch Supervisor ───
// Owns the single game-client process lifecycle: credential resolution,
// spawn, output streaming, exit observation.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::spec::{LaunchConfig, LaunchSpecification};
use super::task;
use crate::core::auth::CredentialProvider;
use crate::core::bridge::{GameEvent, OutputStream};
use crate::core::environment::Credentials;
use crate::core::error::{ShellError, ShellResult};

/// Where one launch currently stands.
///
/// `Failed` is reachable from `AuthorizingCredentials` (rejection) and
/// `Starting` (spawn failure); `Exited` only from `Running`. Both terminal
/// states count as "no launch in flight" so the user can retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase {
    Idle,
    AuthorizingCredentials,
    Starting,
    Running,
    Exited,
    Failed,
}

impl LaunchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchPhase::Idle => "idle",
            LaunchPhase::AuthorizingCredentials => "authorizing_credentials",
            LaunchPhase::Starting => "starting",
            LaunchPhase::Running => "running",
            LaunchPhase::Exited => "exited",
            LaunchPhase::Failed => "failed",
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            LaunchPhase::AuthorizingCredentials | LaunchPhase::Starting | LaunchPhase::Running
        )
    }
}

/// The running game process. At most one exists at a time.
#[derive(Debug, Clone)]
pub struct ChildProcessHandle {
    pub pid: u32,
    pub spawned_at: DateTime<Utc>,
}

#[derive(Debug)]
struct SupervisorInner {
    phase: LaunchPhase,
    child: Option<ChildProcessHandle>,
}

impl Default for SupervisorInner {
    fn default() -> Self {
        Self {
            phase: LaunchPhase::Idle,
            child: None,
        }
    }
}

/// Supervises the single launched game process. Handlers get a reference via
/// application state; nothing else may start, stop, or reassign the child.
pub struct LaunchSupervisor {
    provider: Arc<dyn CredentialProvider>,
    events: UnboundedSender<GameEvent>,
    inner: Arc<Mutex<SupervisorInner>>,
}

impl LaunchSupervisor {
    pub fn new(provider: Arc<dyn CredentialProvider>, events: UnboundedSender<GameEvent>) -> Self {
        Self {
            provider,
            events,
            inner: Arc::new(Mutex::new(SupervisorInner::default())),
        }
    }

    pub async fn phase(&self) -> LaunchPhase {
        self.inner.lock().await.phase
    }

    pub async fn child(&self) -> Option<ChildProcessHandle> {
        self.inner.lock().await.child.clone()
    }

    /// Run one launch to the point where the child process is spawned and its
    /// streams are subscribed. Rejects the request outright when a launch is
    /// already in flight; terminal phases allow a fresh attempt.
    pub async fn request_launch(
        &self,
        credentials: &Credentials,
        config: &LaunchConfig,
        data_dir: &Path,
    ) -> ShellResult<()> {
        {
            let mut inner = self.inner.lock().await;
            if inner.phase.is_in_flight() {
                return Err(ShellError::LaunchInFlight {
                    phase: inner.phase.as_str().to_string(),
                });
            }
            inner.phase = LaunchPhase::AuthorizingCredentials;
            inner.child = None;
        }

        self.publish_debug("Resolving launch credentials");
        let authorization = match self
            .provider
            .get_auth(&credentials.user, &credentials.pass)
            .await
        {
            Ok(authorization) => authorization,
            Err(launch_error) => return Err(self.abort_launch(launch_error).await),
        };

        let spec = match LaunchSpecification::from_config(config, data_dir, authorization) {
            Ok(spec) => spec,
            Err(launch_error) => return Err(self.abort_launch(launch_error).await),
        };

        self.publish_debug(format!(
            "Starting client {} ({}) in {:?}",
            spec.version.number,
            spec.version.channel.as_str(),
            spec.install_root
        ));

        self.start_process(task::build_command(&spec)).await
    }

    /// Kill the running child, if any. Called when the control process quits;
    /// the wait task still observes the exit and publishes `game-exited`.
    pub async fn shutdown(&self) {
        let handle = self.inner.lock().await.child.take();
        if let Some(handle) = handle {
            info!("Stopping game client (pid {})", handle.pid);
            if let Err(kill_error) = kill_process(handle.pid) {
                warn!("Cannot stop game client (pid {}): {}", handle.pid, kill_error);
            }
        }
    }

    /// Spawn the prepared command and wire up streaming and exit observation.
    /// Split out from `request_launch` so the process machinery can be driven
    /// with an arbitrary command.
    async fn start_process(&self, mut cmd: Command) -> ShellResult<()> {
        {
            let mut inner = self.inner.lock().await;
            inner.phase = LaunchPhase::Starting;
        }

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(spawn_error) => {
                return Err(self
                    .abort_launch(ShellError::SpawnFailed(spawn_error.to_string()))
                    .await);
            }
        };

        let pid = child.id();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        {
            let mut inner = self.inner.lock().await;
            inner.phase = LaunchPhase::Running;
            inner.child = Some(ChildProcessHandle {
                pid,
                spawned_at: Utc::now(),
            });
        }

        info!("Game client running (pid {pid})");
        self.publish_debug(format!("Game client running (pid {pid})"));

        let mut readers = Vec::new();
        if let Some(stdout) = stdout {
            readers.push(self.spawn_stream_reader(OutputStream::Stdout, stdout));
        }
        if let Some(stderr) = stderr {
            readers.push(self.spawn_stream_reader(OutputStream::Stderr, stderr));
        }

        let inner = Arc::clone(&self.inner);
        let events = self.events.clone();
        tokio::spawn(async move {
            let wait_result = tokio::task::spawn_blocking(move || child.wait())
                .await
                .map_err(|join_error| std::io::Error::other(join_error.to_string()))
                .and_then(|result| result);

            // Let both pipe readers drain before the terminal event goes out,
            // so `game-exited` is always the last message of a launch.
            for reader in readers {
                let _ = reader.await;
            }

            {
                let mut inner = inner.lock().await;
                inner.child = None;
                inner.phase = LaunchPhase::Exited;
            }

            match wait_result {
                Ok(status) => {
                    if status.success() {
                        info!("Game client (pid {pid}) exited with {status}");
                    } else {
                        error!("Game client (pid {pid}) exited abnormally with {status}");
                    }
                    let _ = events.send(GameEvent::exited(status.code(), status.success()));
                }
                Err(wait_error) => {
                    error!("Cannot wait on game client (pid {pid}): {wait_error}");
                    let _ = events.send(GameEvent::exited(None, false));
                }
            }
        });

        Ok(())
    }

    /// One blocking reader per pipe keeps per-stream emission order intact.
    fn spawn_stream_reader<R>(
        &self,
        stream: OutputStream,
        pipe: R,
    ) -> tokio::task::JoinHandle<()>
    where
        R: std::io::Read + Send + 'static,
    {
        let events = self.events.clone();
        tokio::task::spawn_blocking(move || {
            for line in BufReader::new(pipe).lines().map_while(Result::ok) {
                if events.send(GameEvent::data(stream, line)).is_err() {
                    break;
                }
            }
        })
    }

    async fn abort_launch(&self, launch_error: ShellError) -> ShellError {
        {
            let mut inner = self.inner.lock().await;
            inner.phase = LaunchPhase::Failed;
            inner.child = None;
        }
        self.publish_debug(format!("Launch failed: {launch_error}"));
        launch_error
    }

    fn publish_debug(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("{message}");
        let _ = self.events.send(GameEvent::debug(message));
    }
}

fn kill_process(pid: u32) -> ShellResult<()> {
    #[cfg(target_os = "windows")]
    {
        let status = Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/T", "/F"])
            .status()
            .map_err(|e| ShellError::Other(format!("Cannot terminate process {pid}: {e}")))?;

        if !status.success() {
            return Err(ShellError::Other(format!(
                "taskkill for process {pid} returned {:?}",
                status.code()
            )));
        }

        Ok(())
    }

    #[cfg(not(target_os = "windows"))]
    {
        let graceful = Command::new("kill")
            .args(["-15", &pid.to_string()])
            .status()
            .map_err(|e| ShellError::Other(format!("Cannot send SIGTERM to {pid}: {e}")))?;

        if graceful.success() {
            std::thread::sleep(std::time::Duration::from_millis(300));
            let check = Command::new("kill").args(["-0", &pid.to_string()]).status();
            if matches!(check, Ok(status) if !status.success()) {
                return Ok(());
            }
        }

        let force = Command::new("kill")
            .args(["-9", &pid.to_string()])
            .status()
            .map_err(|e| ShellError::Other(format!("Cannot terminate process {pid}: {e}")))?;

        if !force.success() {
            return Err(ShellError::Other(format!(
                "kill for process {pid} returned {:?}",
                force.code()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::{AuthorizationToken, LegacyAuthenticator};
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct RejectingProvider;

    #[async_trait]
    impl CredentialProvider for RejectingProvider {
        async fn get_auth(&self, _user: &str, _pass: &str) -> ShellResult<AuthorizationToken> {
            Err(ShellError::CredentialsRejected("bad password".into()))
        }
    }

    /// Records the supervisor phase observed at the moment credentials are
    /// being resolved, then rejects.
    struct PhaseProbeProvider {
        target: std::sync::Mutex<Option<Arc<Mutex<SupervisorInner>>>>,
        observed: std::sync::Mutex<Option<LaunchPhase>>,
    }

    #[async_trait]
    impl CredentialProvider for PhaseProbeProvider {
        async fn get_auth(&self, _user: &str, _pass: &str) -> ShellResult<AuthorizationToken> {
            let target = self.target.lock().unwrap().clone();
            if let Some(target) = target {
                let phase = target.lock().await.phase;
                *self.observed.lock().unwrap() = Some(phase);
            }
            Err(ShellError::CredentialsRejected("probe".into()))
        }
    }

    fn supervisor_with(
        provider: Arc<dyn CredentialProvider>,
    ) -> (LaunchSupervisor, UnboundedReceiver<GameEvent>) {
        let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
        (LaunchSupervisor::new(provider, events_tx), events_rx)
    }

    fn credentials() -> Credentials {
        Credentials {
            user: "steve".into(),
            pass: "hunter2".into(),
        }
    }

    #[cfg(unix)]
    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    async fn next_event(events: &mut UnboundedReceiver<GameEvent>) -> GameEvent {
        tokio::time::timeout(Duration::from_secs(10), events.recv())
            .await
            .expect("timed out waiting for a bridge event")
            .expect("event channel closed unexpectedly")
    }

    #[tokio::test]
    async fn launch_enters_authorizing_before_the_provider_runs() {
        let probe = Arc::new(PhaseProbeProvider {
            target: std::sync::Mutex::new(None),
            observed: std::sync::Mutex::new(None),
        });
        let (supervisor, _events) = supervisor_with(probe.clone());
        *probe.target.lock().unwrap() = Some(Arc::clone(&supervisor.inner));

        let dir = tempfile::tempdir().unwrap();
        let _ = supervisor
            .request_launch(&credentials(), &LaunchConfig::default(), dir.path())
            .await;

        assert_eq!(
            *probe.observed.lock().unwrap(),
            Some(LaunchPhase::AuthorizingCredentials)
        );
    }

    #[tokio::test]
    async fn credential_rejection_ends_in_failed_without_a_child() {
        let (supervisor, mut events) = supervisor_with(Arc::new(RejectingProvider));
        let dir = tempfile::tempdir().unwrap();

        let launch_error = supervisor
            .request_launch(&credentials(), &LaunchConfig::default(), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(launch_error, ShellError::CredentialsRejected(_)));
        assert_eq!(supervisor.phase().await, LaunchPhase::Failed);
        assert!(supervisor.child().await.is_none());

        // The display process is told what went wrong.
        let mut saw_failure_debug = false;
        while let Ok(event) = events.try_recv() {
            if let GameEvent::Debug(payload) = event {
                if payload.message.contains("Launch failed") {
                    saw_failure_debug = true;
                }
            }
        }
        assert!(saw_failure_debug);
    }

    #[tokio::test]
    async fn spawn_failure_ends_in_failed_without_a_child() {
        let (supervisor, _events) = supervisor_with(Arc::new(RejectingProvider));

        let launch_error = supervisor
            .start_process(Command::new("/nonexistent/definitely-missing-binary"))
            .await
            .unwrap_err();

        assert!(matches!(launch_error, ShellError::SpawnFailed(_)));
        assert_eq!(supervisor.phase().await, LaunchPhase::Failed);
        assert!(supervisor.child().await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn second_launch_while_running_is_rejected() {
        let (supervisor, _events) = supervisor_with(Arc::new(RejectingProvider));
        supervisor.start_process(sh("sleep 5")).await.unwrap();
        assert_eq!(supervisor.phase().await, LaunchPhase::Running);
        assert!(supervisor.child().await.is_some());

        let dir = tempfile::tempdir().unwrap();
        let launch_error = supervisor
            .request_launch(&credentials(), &LaunchConfig::default(), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(launch_error, ShellError::LaunchInFlight { .. }));

        supervisor.shutdown().await;
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn forwards_child_output_per_stream_in_order() {
        let (supervisor, mut events) = supervisor_with(Arc::new(RejectingProvider));
        supervisor
            .start_process(sh("echo one; echo two; echo three; echo oops 1>&2"))
            .await
            .unwrap();

        let mut stdout_lines = Vec::new();
        let mut stderr_lines = Vec::new();
        let exited = loop {
            match next_event(&mut events).await {
                GameEvent::Data(data) => match data.stream {
                    OutputStream::Stdout => stdout_lines.push(data.line),
                    OutputStream::Stderr => stderr_lines.push(data.line),
                },
                GameEvent::Exited(exited) => break exited,
                GameEvent::Debug(_) => {}
            }
        };

        assert_eq!(stdout_lines, vec!["one", "two", "three"]);
        assert_eq!(stderr_lines, vec!["oops"]);
        assert_eq!(exited.code, Some(0));
        assert!(exited.success);
        assert_eq!(supervisor.phase().await, LaunchPhase::Exited);
        assert!(supervisor.child().await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn full_launch_reaches_running_and_emits_events() {
        let (supervisor, mut events) = supervisor_with(Arc::new(LegacyAuthenticator));
        let dir = tempfile::tempdir().unwrap();
        let config = LaunchConfig {
            java_binary: Some("/bin/true".into()),
            ..LaunchConfig::default()
        };

        supervisor
            .request_launch(&credentials(), &config, dir.path())
            .await
            .unwrap();

        let mut debug_messages = Vec::new();
        let exited = loop {
            match next_event(&mut events).await {
                GameEvent::Debug(payload) => debug_messages.push(payload.message),
                GameEvent::Exited(exited) => break exited,
                GameEvent::Data(_) => {}
            }
        };

        assert!(exited.success);
        assert!(debug_messages
            .iter()
            .any(|message| message.contains("running")));
        assert_eq!(supervisor.phase().await, LaunchPhase::Exited);
    }
}
