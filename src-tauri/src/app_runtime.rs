use tauri::{webview::PageLoadEvent, Manager, RunEvent, WindowEvent};

use crate::{
    lifecycle,
    logging::{LogConfig, LogService},
    main_window,
    shell_config::ShellConfig,
    view_state::ViewStateStore,
    ShellState,
};

pub(crate) fn run() {
    let app = tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            tracing::info!("second instance launched, activating main window");
            lifecycle::on_activate(app, main_window::has_visible_windows(app));
            main_window::focus_main_window(app);
        }))
        .plugin(tauri_plugin_updater::Builder::new().build())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_process::init())
        .manage(ViewStateStore::default())
        .invoke_handler(tauri::generate_handler![
            crate::ipc_commands::window_minimize,
            crate::ipc_commands::window_toggle_maximize,
            crate::ipc_commands::window_toggle_fullscreen,
            crate::ipc_commands::window_close,
            crate::ipc_commands::window_reload,
            crate::ipc_commands::view_get_state,
            crate::ipc_commands::shell_is_desktop_runtime,
            crate::ipc_commands::shell_get_locale,
            crate::ipc_commands::shell_set_locale,
            crate::ipc_commands::shell_open_external_url,
            crate::ipc_commands::shell_get_update_channel,
            crate::ipc_commands::shell_check_for_update,
            crate::ipc_commands::shell_install_update,
        ])
        .on_window_event(|window, event| {
            if let WindowEvent::Focused(true) = event {
                lifecycle::on_window_focused(window);
            }
        })
        .on_page_load(|webview, payload| {
            if let PageLoadEvent::Finished = payload.event() {
                tracing::debug!(label = webview.label(), url = %payload.url(), "page load finished");
                lifecycle::on_window_loaded(webview);
            }
        })
        .setup(|app| {
            let log_dir = app.path().app_log_dir()?;
            let log_service = LogService::init(&LogConfig::new(log_dir))?;
            tracing::info!(
                version = %app.package_info().version,
                log_path = %log_service.log_path().display(),
                "app starting"
            );
            app.manage(log_service);

            let config = ShellConfig::from_env()?;
            tracing::debug!(?config, "shell config loaded");
            app.manage(ShellState::new(config));

            lifecycle::on_ready(app.handle())?;
            Ok(())
        })
        .build(tauri::generate_context!());

    let app = match app {
        Ok(app) => app,
        Err(error) => {
            tracing::error!(%error, "failed to build tauri application");
            eprintln!("error while building tauri application: {error}");
            std::process::exit(1);
        }
    };

    app.run(|app_handle, event| match event {
        RunEvent::ExitRequested { code: None, api, .. } => {
            lifecycle::on_all_windows_closed(app_handle, &api);
        }
        #[cfg(target_os = "macos")]
        RunEvent::Reopen {
            has_visible_windows,
            ..
        } => {
            lifecycle::on_activate(app_handle, has_visible_windows);
        }
        RunEvent::Exit => {
            lifecycle::on_exit(app_handle);
        }
        _ => {}
    });
}
