use tauri::{AppHandle, ExitRequestApi, Manager, Webview, Window};

use crate::{
    app_update, error::Result, logging::LogService, main_window, shell_locale, view_state,
    ShellState, IS_MAC,
};

/// Application lifecycle points the shell reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleHook {
    Ready,
    WindowLoaded,
    WindowFocused,
    AllWindowsClosed,
    Activate,
    Exit,
}

impl LifecycleHook {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::WindowLoaded => "window-loaded",
            Self::WindowFocused => "window-focused",
            Self::AllWindowsClosed => "all-windows-closed",
            Self::Activate => "activate",
            Self::Exit => "exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AllWindowsClosedAction {
    Quit,
    KeepRunning,
}

/// macOS apps stay alive in the dock after their last window closes.
pub(crate) fn decide_all_windows_closed(is_mac: bool) -> AllWindowsClosedAction {
    if is_mac {
        AllWindowsClosedAction::KeepRunning
    } else {
        AllWindowsClosedAction::Quit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActivateAction {
    OpenMainWindow,
    Nothing,
}

pub(crate) fn decide_activate(has_visible_windows: bool) -> ActivateAction {
    if has_visible_windows {
        ActivateAction::Nothing
    } else {
        ActivateAction::OpenMainWindow
    }
}

pub(crate) fn on_ready(app_handle: &AppHandle) -> Result<()> {
    tracing::debug!(hook = LifecycleHook::Ready.name(), "lifecycle hook");

    shell_locale::init_locale(app_handle);
    app_update::init_update_channel(app_handle);

    main_window::open_boxhero(app_handle)?;

    app_update::spawn_startup_update_check(app_handle.clone());
    Ok(())
}

pub(crate) fn on_window_loaded(webview: &Webview) {
    if !main_window::is_main_window(webview.label()) {
        return;
    }
    tracing::debug!(hook = LifecycleHook::WindowLoaded.name(), "lifecycle hook");

    let app_handle = webview.app_handle();
    if let Some(window) = main_window::main_window(app_handle) {
        view_state::update_view_state(&window);
    }
    view_state::init_view_events(app_handle);
}

pub(crate) fn on_window_focused(window: &Window) {
    if !main_window::is_main_window(window.label()) {
        return;
    }
    tracing::trace!(hook = LifecycleHook::WindowFocused.name(), "lifecycle hook");

    if let Some(main) = main_window::main_window(window.app_handle()) {
        view_state::update_view_state(&main);
    }
}

pub(crate) fn on_all_windows_closed(app_handle: &AppHandle, api: &ExitRequestApi) {
    let is_dev = app_handle
        .try_state::<ShellState>()
        .map(|state| state.is_dev())
        .unwrap_or(false);
    if is_dev {
        tracing::info!(
            hook = LifecycleHook::AllWindowsClosed.name(),
            "all windows closed"
        );
    }

    match decide_all_windows_closed(IS_MAC) {
        AllWindowsClosedAction::Quit => {}
        AllWindowsClosedAction::KeepRunning => api.prevent_exit(),
    }
}

pub(crate) fn on_activate(app_handle: &AppHandle, has_visible_windows: bool) {
    tracing::debug!(
        hook = LifecycleHook::Activate.name(),
        has_visible_windows,
        "lifecycle hook"
    );

    match decide_activate(has_visible_windows) {
        ActivateAction::OpenMainWindow => {
            if let Err(error) = main_window::open_boxhero(app_handle) {
                tracing::error!(%error, "failed to reopen main window");
            }
        }
        ActivateAction::Nothing => {}
    }
}

pub(crate) fn on_exit(app_handle: &AppHandle) {
    tracing::info!(hook = LifecycleHook::Exit.name(), "app exiting");
    if let Some(log_service) = app_handle.try_state::<LogService>() {
        log_service.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decide_all_windows_closed_keeps_mac_running() {
        assert_eq!(
            decide_all_windows_closed(true),
            AllWindowsClosedAction::KeepRunning
        );
        assert_eq!(
            decide_all_windows_closed(false),
            AllWindowsClosedAction::Quit
        );
    }

    #[test]
    fn decide_activate_opens_window_only_when_none_visible() {
        assert_eq!(decide_activate(false), ActivateAction::OpenMainWindow);
        assert_eq!(decide_activate(true), ActivateAction::Nothing);
    }

    #[test]
    fn lifecycle_hook_names_are_stable() {
        assert_eq!(LifecycleHook::Ready.name(), "ready");
        assert_eq!(LifecycleHook::AllWindowsClosed.name(), "all-windows-closed");
        assert_eq!(LifecycleHook::Activate.name(), "activate");
    }
}
