use tauri::{Runtime, WebviewWindow};

use crate::error::Result;

pub fn minimize_window<R: Runtime>(window: &WebviewWindow<R>) -> Result<()> {
    window.minimize()?;
    Ok(())
}

/// Returns whether the window is maximized after the toggle.
pub fn toggle_maximize_window<R: Runtime>(window: &WebviewWindow<R>) -> Result<bool> {
    if window.is_maximized()? {
        window.unmaximize()?;
        Ok(false)
    } else {
        window.maximize()?;
        Ok(true)
    }
}

/// Returns whether the window is fullscreen after the toggle.
pub fn toggle_fullscreen_window<R: Runtime>(window: &WebviewWindow<R>) -> Result<bool> {
    let full_screen = !window.is_fullscreen()?;
    window.set_fullscreen(full_screen)?;
    Ok(full_screen)
}

pub fn close_window<R: Runtime>(window: &WebviewWindow<R>) -> Result<()> {
    tracing::debug!(label = window.label(), "closing window");
    window.close()?;
    Ok(())
}

pub fn reload_window<R: Runtime>(window: &WebviewWindow<R>) -> Result<()> {
    tracing::debug!(label = window.label(), "reloading window");
    window.eval("window.location.reload()")?;
    Ok(())
}
