mod commands;
mod core;
mod menu;

use std::sync::Arc;

use tauri::{Manager, RunEvent};
use tracing_subscriber::EnvFilter;

use crate::core::bridge;
use crate::core::environment::EnvironmentConfig;
use crate::core::state::AppState;
use crate::core::window::{self, WindowOptions};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,craftshell_lib=debug")),
        )
        .init();

    // Startup precondition: without a readable environment file the shell
    // must not reach "ready".
    let environment = match EnvironmentConfig::load_default() {
        Ok(environment) => environment,
        Err(config_error) => {
            tracing::error!("Cannot load environment configuration: {config_error}");
            std::process::exit(1);
        }
    };

    let mode = environment.name;
    tracing::info!("CraftShell starting in {mode} mode...");

    let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
    let state = Arc::new(AppState::new(environment, events_tx));

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(state)
        .invoke_handler(tauri::generate_handler![
            commands::need_app_path,
            commands::open_external_link,
            commands::launch_game,
        ])
        .setup(move |app| {
            let app_handle = app.handle().clone();

            // Menu and bridge wiring must exist before the window can issue
            // any request against them.
            menu::install(&app_handle, mode)?;
            app.on_menu_event(|app_handle, event| {
                menu::handle_menu_event(app_handle, event.id().as_ref())
            });
            bridge::spawn_forwarder(app_handle.clone(), events_rx);

            window::create_main_window(&app_handle, &WindowOptions::for_mode(mode))?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| {
            // Quitting must not leave a stray game client behind.
            if let RunEvent::Exit = event {
                let state = app_handle.state::<Arc<AppState>>();
                tauri::async_runtime::block_on(state.supervisor.shutdown());
            }
        });
}
