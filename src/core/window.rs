// ─── Window Factory ───
// Creates the single display-process window.

use tauri::{WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use crate::core::environment::Mode;

pub const MAIN_WINDOW_LABEL: &str = "main";

/// Fixed configuration of the single display-process window.
///
/// The display process runs with exactly the capabilities declared in
/// `capabilities/default.json`; widening that grant is a reviewed trust
/// decision, not a window option. The only mode-dependent knob here is
/// whether the devtools panel opens on startup.
#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub width: f64,
    pub height: f64,
    pub devtools_on_start: bool,
}

impl WindowOptions {
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            devtools_on_start: mode == Mode::Development,
        }
    }
}

/// Create the main window and load the display document into it.
pub fn create_main_window(
    app_handle: &tauri::AppHandle,
    options: &WindowOptions,
) -> tauri::Result<WebviewWindow> {
    let window = WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::App("index.html".into()),
    )
    .title("CraftShell")
    .inner_size(options.width, options.height)
    .build()?;

    if options.devtools_on_start {
        window.open_devtools();
    }

    Ok(window)
}
