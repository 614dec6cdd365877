use std::process::{Command, Stdio};
use tauri::{AppHandle, Manager, WebviewWindow};
use url::Url;

use crate::{
    app_update, main_window,
    shell_locale::LocaleState,
    update_channel::UpdateChannel,
    view_state::{self, ViewState},
    window_actions, BridgeResult, UpdateCheckResult, DEFAULT_SHELL_LOCALE,
};

fn parse_openable_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing external URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("Invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(format!(
            "Unsupported URL scheme '{scheme}', only http/https are allowed."
        )),
    }
}

#[cfg(target_os = "macos")]
fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("open")
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'open': {error}"))
}

#[cfg(target_os = "windows")]
fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("rundll32")
        .args(["url.dll,FileProtocolHandler", url])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'rundll32': {error}"))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("xdg-open")
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'xdg-open': {error}"))
}

#[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
fn open_url_with_system_browser(_url: &str) -> Result<(), String> {
    Err("Opening external URLs is not supported on this platform.".to_string())
}

fn refresh_view_state(window: &WebviewWindow) {
    if main_window::is_main_window(window.label()) {
        view_state::update_view_state(window);
    }
}

// Window IPC

#[tauri::command]
pub(crate) fn window_minimize(window: WebviewWindow) -> BridgeResult {
    window_actions::minimize_window(&window).into()
}

#[tauri::command]
pub(crate) fn window_toggle_maximize(window: WebviewWindow) -> BridgeResult {
    let result = window_actions::toggle_maximize_window(&window).map(|_| ());
    refresh_view_state(&window);
    result.into()
}

#[tauri::command]
pub(crate) fn window_toggle_fullscreen(window: WebviewWindow) -> BridgeResult {
    let result = window_actions::toggle_fullscreen_window(&window).map(|_| ());
    refresh_view_state(&window);
    result.into()
}

#[tauri::command]
pub(crate) fn window_close(window: WebviewWindow) -> BridgeResult {
    window_actions::close_window(&window).into()
}

#[tauri::command]
pub(crate) fn window_reload(window: WebviewWindow) -> BridgeResult {
    window_actions::reload_window(&window).into()
}

// View IPC

#[tauri::command]
pub(crate) fn view_get_state(window: WebviewWindow) -> ViewState {
    view_state::read_view_state(&window)
}

// Shell IPC

#[tauri::command]
pub(crate) fn shell_is_desktop_runtime() -> bool {
    true
}

#[tauri::command]
pub(crate) fn shell_get_locale(app_handle: AppHandle) -> String {
    app_handle
        .try_state::<LocaleState>()
        .map(|state| state.current())
        .unwrap_or(DEFAULT_SHELL_LOCALE)
        .to_string()
}

#[tauri::command]
pub(crate) fn shell_set_locale(app_handle: AppHandle, locale: Option<String>) -> BridgeResult {
    let Some(state) = app_handle.try_state::<LocaleState>() else {
        return BridgeResult::failed("Locale is not initialized.");
    };

    match state.set(locale.as_deref()) {
        Ok(effective) => {
            tracing::info!(locale = effective, "shell locale changed");
            BridgeResult::ok()
        }
        Err(error) => {
            tracing::warn!(%error, "failed to persist shell locale");
            BridgeResult::failed(error.to_string())
        }
    }
}

#[tauri::command]
pub(crate) fn shell_open_external_url(url: String) -> BridgeResult {
    let parsed = match parse_openable_url(&url) {
        Ok(parsed) => parsed,
        Err(error) => return BridgeResult::failed(error),
    };

    open_url_with_system_browser(parsed.as_ref()).into()
}

#[tauri::command]
pub(crate) fn shell_get_update_channel(app_handle: AppHandle) -> UpdateChannel {
    app_update::current_channel(&app_handle)
}

#[tauri::command]
pub(crate) async fn shell_check_for_update(app_handle: AppHandle) -> UpdateCheckResult {
    app_update::check_for_update(&app_handle).await
}

#[tauri::command]
pub(crate) async fn shell_install_update(app_handle: AppHandle) -> BridgeResult {
    app_update::install_update(&app_handle).await
}
