// ─── Application Menu ───
// Composed from fixed sections; the Development section exists only outside
// production.

use tauri::menu::{Menu, MenuItem, PredefinedMenuItem, Submenu};
use tauri::{AppHandle, Manager};
use tracing::warn;

use crate::core::environment::Mode;
use crate::core::window::MAIN_WINDOW_LABEL;

pub const MENU_RELOAD: &str = "reload";
pub const MENU_TOGGLE_DEVTOOLS: &str = "toggle-devtools";

/// Build and install the application menu.
pub fn install(app_handle: &AppHandle, mode: Mode) -> tauri::Result<()> {
    let application = Submenu::with_items(
        app_handle,
        "Application",
        true,
        &[
            &PredefinedMenuItem::about(app_handle, None, None)?,
            &PredefinedMenuItem::separator(app_handle)?,
            &PredefinedMenuItem::quit(app_handle, None)?,
        ],
    )?;

    let edit = Submenu::with_items(
        app_handle,
        "Edit",
        true,
        &[
            &PredefinedMenuItem::undo(app_handle, None)?,
            &PredefinedMenuItem::redo(app_handle, None)?,
            &PredefinedMenuItem::separator(app_handle)?,
            &PredefinedMenuItem::cut(app_handle, None)?,
            &PredefinedMenuItem::copy(app_handle, None)?,
            &PredefinedMenuItem::paste(app_handle, None)?,
            &PredefinedMenuItem::select_all(app_handle, None)?,
        ],
    )?;

    let menu = Menu::with_items(app_handle, &[&application, &edit])?;

    if !mode.is_production() {
        let development = Submenu::with_items(
            app_handle,
            "Development",
            true,
            &[
                &MenuItem::with_id(app_handle, MENU_RELOAD, "Reload", true, Some("CmdOrCtrl+R"))?,
                &MenuItem::with_id(
                    app_handle,
                    MENU_TOGGLE_DEVTOOLS,
                    "Toggle DevTools",
                    true,
                    Some("CmdOrCtrl+Alt+I"),
                )?,
            ],
        )?;
        menu.append(&development)?;
    }

    app_handle.set_menu(menu)?;
    Ok(())
}

/// Dispatch a menu selection. Predefined items (quit, clipboard) handle
/// themselves.
pub fn handle_menu_event(app_handle: &AppHandle, id: &str) {
    match id {
        MENU_RELOAD => {
            if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
                if let Err(error) = window.eval("window.location.reload()") {
                    warn!("Cannot reload display process: {error}");
                }
            }
        }
        MENU_TOGGLE_DEVTOOLS => {
            if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
                if window.is_devtools_open() {
                    window.close_devtools();
                } else {
                    window.open_devtools();
                }
            }
        }
        _ => {}
    }
}
