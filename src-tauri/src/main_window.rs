use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use crate::{auth_window, error::Result, ShellState, APP_NAME, MAIN_WINDOW_LABEL};

const DEFAULT_WIDTH: f64 = 1280.0;
const DEFAULT_HEIGHT: f64 = 800.0;
const MIN_WIDTH: f64 = 800.0;
const MIN_HEIGHT: f64 = 600.0;

pub(crate) fn is_main_window(label: &str) -> bool {
    label == MAIN_WINDOW_LABEL
}

pub(crate) fn main_window(app_handle: &AppHandle) -> Option<WebviewWindow> {
    app_handle.get_webview_window(MAIN_WINDOW_LABEL)
}

/// Opens the BoxHero main window, or brings the existing one to the front.
pub(crate) fn open_boxhero(app_handle: &AppHandle) -> Result<WebviewWindow> {
    if let Some(window) = main_window(app_handle) {
        focus_window(&window);
        return Ok(window);
    }

    let app_url = app_handle.state::<ShellState>().app_url().clone();
    tracing::info!(url = %app_url, "opening main window");

    let navigation_handle = app_handle.clone();
    let window = WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::External(app_url),
    )
    .title(APP_NAME)
    .inner_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    .min_inner_size(MIN_WIDTH, MIN_HEIGHT)
    .on_navigation(move |url| auth_window::handle_main_navigation(&navigation_handle, url))
    .build()?;

    Ok(window)
}

pub(crate) fn focus_window(window: &WebviewWindow) {
    if let Err(error) = window.show() {
        tracing::warn!(label = window.label(), %error, "failed to show window");
    }
    if let Err(error) = window.unminimize() {
        tracing::warn!(label = window.label(), %error, "failed to unminimize window");
    }
    if let Err(error) = window.set_focus() {
        tracing::warn!(label = window.label(), %error, "failed to focus window");
    }
}

pub(crate) fn focus_main_window(app_handle: &AppHandle) {
    match main_window(app_handle) {
        Some(window) => focus_window(&window),
        None => tracing::debug!("focus_main_window skipped: main window not found"),
    }
}

pub(crate) fn has_visible_windows(app_handle: &AppHandle) -> bool {
    app_handle
        .webview_windows()
        .values()
        .any(|window| window.is_visible().unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_main_window_matches_main_label_only() {
        assert!(is_main_window("main"));
        assert!(!is_main_window("auth"));
        assert!(!is_main_window("Main"));
    }
}
