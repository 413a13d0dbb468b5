// ─── Message Bridge (outbound) ───
// Fixed catalog of events republished from the control process to the display
// process. Delivery is at-most-once and best-effort; the bridge performs no
// business logic.

use serde::Serialize;
use tauri::Emitter;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;

/// Diagnostic stream of the launch supervisor itself.
pub const GAME_DEBUG: &str = "game-debug";
/// Output stream of the running game client.
pub const GAME_DATA: &str = "game-data";
/// Terminal event once the game client is gone.
pub const GAME_EXITED: &str = "game-exited";

/// Which pipe of the child process a data line came from. Order is preserved
/// within one stream, not across streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameDebugEvent {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameDataEvent {
    pub stream: OutputStream,
    pub line: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameExitedEvent {
    pub code: Option<i32>,
    pub success: bool,
}

/// Everything the supervisor can publish towards the display process.
#[derive(Debug, Clone)]
pub enum GameEvent {
    Debug(GameDebugEvent),
    Data(GameDataEvent),
    Exited(GameExitedEvent),
}

impl GameEvent {
    pub fn debug(message: impl Into<String>) -> Self {
        GameEvent::Debug(GameDebugEvent {
            message: message.into(),
        })
    }

    pub fn data(stream: OutputStream, line: String) -> Self {
        GameEvent::Data(GameDataEvent { stream, line })
    }

    pub fn exited(code: Option<i32>, success: bool) -> Self {
        GameEvent::Exited(GameExitedEvent { code, success })
    }

    /// Name of the bridge channel this event travels on.
    pub fn channel(&self) -> &'static str {
        match self {
            GameEvent::Debug(_) => GAME_DEBUG,
            GameEvent::Data(_) => GAME_DATA,
            GameEvent::Exited(_) => GAME_EXITED,
        }
    }
}

/// Drain supervisor events and republish each one as exactly one window
/// event. A failed emit is logged and dropped; it never feeds back into
/// supervisor state.
pub fn spawn_forwarder(app_handle: tauri::AppHandle, mut events: UnboundedReceiver<GameEvent>) {
    tauri::async_runtime::spawn(async move {
        while let Some(event) = events.recv().await {
            let channel = event.channel();
            let delivered = match &event {
                GameEvent::Debug(payload) => app_handle.emit(channel, payload.clone()),
                GameEvent::Data(payload) => app_handle.emit(channel, payload.clone()),
                GameEvent::Exited(payload) => app_handle.emit(channel, payload.clone()),
            };
            if let Err(error) = delivered {
                warn!("Cannot forward {channel} event: {error}");
            }
        }
    });
}
