use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager, Runtime, WebviewWindow, WindowEvent};

use crate::{main_window, MAIN_WINDOW_LABEL, VIEW_STATE_CHANGED_EVENT};

/// Window chrome state the web client mirrors in its own layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ViewState {
    pub(crate) maximized: bool,
    pub(crate) full_screen: bool,
    pub(crate) focused: bool,
    pub(crate) minimized: bool,
}

pub(crate) fn read_view_state<R: Runtime>(window: &WebviewWindow<R>) -> ViewState {
    ViewState {
        maximized: window.is_maximized().unwrap_or(false),
        full_screen: window.is_fullscreen().unwrap_or(false),
        focused: window.is_focused().unwrap_or(false),
        minimized: window.is_minimized().unwrap_or(false),
    }
}

#[derive(Debug, Default)]
pub(crate) struct ViewStateStore {
    current: Mutex<Option<ViewState>>,
    events_initialized: AtomicBool,
}

impl ViewStateStore {
    /// Stores `next` and reports whether it differs from the previous state.
    pub(crate) fn replace(&self, next: ViewState) -> bool {
        match self.current.lock() {
            Ok(mut guard) => guard.replace(next) != Some(next),
            Err(_) => true,
        }
    }

    /// Returns `true` only for the first caller since the last reset.
    fn claim_events(&self) -> bool {
        self.events_initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn reset(&self) {
        self.events_initialized.store(false, Ordering::Release);
        if let Ok(mut guard) = self.current.lock() {
            *guard = None;
        }
    }
}

pub(crate) fn update_view_state(window: &WebviewWindow) {
    let state = read_view_state(window);
    let Some(store) = window.app_handle().try_state::<ViewStateStore>() else {
        return;
    };
    if !store.replace(state) {
        return;
    }

    tracing::trace!(?state, "view state changed");
    if let Err(error) = window.emit_to(MAIN_WINDOW_LABEL, VIEW_STATE_CHANGED_EVENT, state) {
        tracing::warn!(%error, "failed to emit view state");
    }
}

/// Window events after which the main window's view state may differ.
fn affects_view_state(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::Resized(_)
            | WindowEvent::Moved(_)
            | WindowEvent::Focused(_)
            | WindowEvent::ScaleFactorChanged { .. }
    )
}

/// Tracks resize, focus and fullscreen changes of the main window. Only the
/// first call per main window registers a listener.
pub(crate) fn init_view_events(app_handle: &AppHandle) {
    let Some(store) = app_handle.try_state::<ViewStateStore>() else {
        return;
    };
    let Some(window) = main_window::main_window(app_handle) else {
        tracing::debug!("init_view_events skipped: main window not found");
        return;
    };
    if !store.claim_events() {
        return;
    }

    tracing::debug!("registering view state events");
    let tracked = window.clone();
    window.on_window_event(move |event| {
        if affects_view_state(event) {
            update_view_state(&tracked);
        } else if let WindowEvent::Destroyed = event {
            if let Some(store) = tracked.app_handle().try_state::<ViewStateStore>() {
                store.reset();
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_reports_only_changes() {
        let store = ViewStateStore::default();
        let focused = ViewState {
            focused: true,
            ..ViewState::default()
        };

        assert!(store.replace(focused));
        assert!(!store.replace(focused));
        assert!(store.replace(ViewState {
            maximized: true,
            ..focused
        }));
        assert!(store.replace(focused));
    }

    #[test]
    fn replace_reports_blur_after_focus() {
        let store = ViewStateStore::default();
        assert!(store.replace(ViewState {
            focused: true,
            ..ViewState::default()
        }));

        let blurred = ViewState::default();
        assert!(store.replace(blurred));
        assert!(store.replace(ViewState {
            minimized: true,
            ..blurred
        }));
    }

    #[test]
    fn affects_view_state_includes_focus_changes() {
        assert!(affects_view_state(&WindowEvent::Focused(false)));
        assert!(affects_view_state(&WindowEvent::Focused(true)));
        assert!(!affects_view_state(&WindowEvent::Destroyed));
    }

    #[test]
    fn claim_events_succeeds_once_until_reset() {
        let store = ViewStateStore::default();
        assert!(store.claim_events());
        assert!(!store.claim_events());

        store.reset();
        assert!(store.claim_events());
    }

    #[test]
    fn reset_forgets_last_state() {
        let store = ViewStateStore::default();
        let state = ViewState::default();
        assert!(store.replace(state));
        assert!(!store.replace(state));

        store.reset();
        assert!(store.replace(state));
    }

    #[test]
    fn view_state_serializes_camel_case() {
        let value = serde_json::to_value(ViewState {
            full_screen: true,
            ..ViewState::default()
        })
        .expect("serializes");
        assert_eq!(
            value,
            serde_json::json!({
                "maximized": false,
                "fullScreen": true,
                "focused": false,
                "minimized": false,
            })
        );
    }
}
