// ─── Message Bridge (inbound) ───
// Named requests the display process may issue against the control process.
// The handlers do no business logic of their own; side effects live in the
// components they call into.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tauri::Manager;
use tauri_plugin_opener::OpenerExt;
use tracing::info;
use url::Url;

use crate::core::error::{ShellError, ShellResult};
use crate::core::state::AppState;

/// Reply with the shell's installation path.
#[tauri::command]
pub async fn need_app_path(app_handle: tauri::AppHandle) -> Result<String, ShellError> {
    let resolved = match app_handle.path().resource_dir() {
        Ok(path) => path,
        Err(_) => {
            let exe = std::env::current_exe().map_err(|source| ShellError::Io {
                path: PathBuf::new(),
                source,
            })?;
            exe.parent().map(Path::to_path_buf).unwrap_or(exe)
        }
    };

    let rendered = resolved.to_string_lossy().to_string();
    if rendered.is_empty() {
        return Err(ShellError::Other("application path is empty".into()));
    }

    Ok(rendered)
}

/// Open an URL in the OS default browser. Best-effort: a failure is reported
/// back but changes nothing in the shell.
#[tauri::command]
pub async fn open_external_link(
    app_handle: tauri::AppHandle,
    href: String,
) -> Result<(), ShellError> {
    let parsed = parse_external_url(&href)?;
    app_handle
        .opener()
        .open_url(parsed.as_str(), None::<&str>)
        .map_err(|error| ShellError::OpenExternal(error.to_string()))
}

/// Trigger the launch supervisor. Failures (credentials, spawn, a launch
/// already in flight) travel back to the display process as the command
/// result so the UI can explain them.
#[tauri::command]
pub async fn launch_game(state: tauri::State<'_, Arc<AppState>>) -> Result<(), ShellError> {
    info!("Launch requested by the display process");
    state.request_launch().await
}

fn parse_external_url(raw: &str) -> ShellResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ShellError::InvalidUrl("missing URL".into()));
    }

    let parsed = Url::parse(trimmed).map_err(|error| ShellError::InvalidUrl(error.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(ShellError::InvalidUrl(format!(
            "unsupported scheme {scheme:?}, only http/https are allowed"
        ))),
    }
}
