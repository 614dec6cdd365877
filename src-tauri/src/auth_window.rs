//! Third-party sign-in pages refuse embedded webviews, so they are opened in a
//! dedicated window that presents a browser user agent. Once the provider
//! redirects back to the app origin the main window takes over again.

use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::{
    error::Result, main_window, ShellState, APP_NAME, AUTH_HOSTS, AUTH_USER_AGENT,
    AUTH_WINDOW_LABEL,
};

const AUTH_WINDOW_WIDTH: f64 = 520.0;
const AUTH_WINDOW_HEIGHT: f64 = 720.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NavigationDecision {
    Allow,
    OpenAuthWindow,
    ReturnToMainWindow,
}

pub(crate) fn is_auth_url(url: &Url) -> bool {
    url.scheme() == "https"
        && url
            .host_str()
            .is_some_and(|host| AUTH_HOSTS.contains(&host))
}

pub(crate) fn decide_main_navigation(url: &Url) -> NavigationDecision {
    if is_auth_url(url) {
        NavigationDecision::OpenAuthWindow
    } else {
        NavigationDecision::Allow
    }
}

pub(crate) fn decide_auth_navigation(app_url: &Url, url: &Url) -> NavigationDecision {
    if url.origin() == app_url.origin() {
        NavigationDecision::ReturnToMainWindow
    } else {
        NavigationDecision::Allow
    }
}

/// Navigation filter for the main window. Returning `false` cancels the load.
pub(crate) fn handle_main_navigation(app_handle: &AppHandle, url: &Url) -> bool {
    match decide_main_navigation(url) {
        NavigationDecision::OpenAuthWindow => {
            tracing::info!(url = %url, "moving sign-in page to auth window");
            let handle = app_handle.clone();
            let url = url.clone();
            if let Err(error) = app_handle.run_on_main_thread(move || {
                if let Err(error) = open_auth_window(&handle, url) {
                    tracing::warn!(%error, "failed to open auth window");
                }
            }) {
                tracing::warn!(%error, "failed to schedule auth window");
            }
            false
        }
        NavigationDecision::Allow | NavigationDecision::ReturnToMainWindow => true,
    }
}

fn handle_auth_navigation(app_handle: &AppHandle, app_url: &Url, url: &Url) -> bool {
    match decide_auth_navigation(app_url, url) {
        NavigationDecision::ReturnToMainWindow => {
            tracing::info!(url = %url, "sign-in finished, returning to main window");
            let handle = app_handle.clone();
            let url = url.clone();
            if let Err(error) = app_handle.run_on_main_thread(move || {
                return_to_main_window(&handle, &url);
            }) {
                tracing::warn!(%error, "failed to schedule return to main window");
            }
            false
        }
        NavigationDecision::Allow | NavigationDecision::OpenAuthWindow => true,
    }
}

fn navigate_window(window: &WebviewWindow, url: &Url) -> Result<()> {
    let target = serde_json::to_string(url.as_str())?;
    window.eval(&format!("window.location.replace({target})"))?;
    Ok(())
}

fn open_auth_window(app_handle: &AppHandle, url: Url) -> Result<()> {
    if let Some(window) = app_handle.get_webview_window(AUTH_WINDOW_LABEL) {
        navigate_window(&window, &url)?;
        main_window::focus_window(&window);
        return Ok(());
    }

    let app_url = app_handle.state::<ShellState>().app_url().clone();
    let navigation_handle = app_handle.clone();
    WebviewWindowBuilder::new(app_handle, AUTH_WINDOW_LABEL, WebviewUrl::External(url))
        .title(APP_NAME)
        .inner_size(AUTH_WINDOW_WIDTH, AUTH_WINDOW_HEIGHT)
        .user_agent(AUTH_USER_AGENT)
        .on_navigation(move |url| handle_auth_navigation(&navigation_handle, &app_url, url))
        .build()?;
    Ok(())
}

fn return_to_main_window(app_handle: &AppHandle, url: &Url) {
    match main_window::main_window(app_handle) {
        Some(window) => {
            if let Err(error) = navigate_window(&window, url) {
                tracing::warn!(%error, "failed to load sign-in result in main window");
            }
            main_window::focus_window(&window);
        }
        None => {
            if let Err(error) = main_window::open_boxhero(app_handle) {
                tracing::warn!(%error, "failed to reopen main window after sign-in");
            }
        }
    }

    if let Some(auth_window) = app_handle.get_webview_window(AUTH_WINDOW_LABEL) {
        if let Err(error) = auth_window.close() {
            tracing::warn!(%error, "failed to close auth window");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid url")
    }

    #[test]
    fn is_auth_url_matches_google_accounts_over_https() {
        assert!(is_auth_url(&url(
            "https://accounts.google.com/o/oauth2/v2/auth?client_id=abc"
        )));
        assert!(!is_auth_url(&url("http://accounts.google.com/")));
        assert!(!is_auth_url(&url("https://accounts.google.com.evil.test/")));
        assert!(!is_auth_url(&url("https://web.boxhero-app.com/login")));
    }

    #[test]
    fn decide_main_navigation_moves_sign_in_to_auth_window() {
        assert_eq!(
            decide_main_navigation(&url("https://accounts.google.com/signin")),
            NavigationDecision::OpenAuthWindow
        );
        assert_eq!(
            decide_main_navigation(&url("https://web.boxhero-app.com/items")),
            NavigationDecision::Allow
        );
    }

    #[test]
    fn decide_auth_navigation_returns_on_app_origin() {
        let app_url = url("https://web.boxhero-app.com/");
        assert_eq!(
            decide_auth_navigation(
                &app_url,
                &url("https://web.boxhero-app.com/oauth/callback#token=1")
            ),
            NavigationDecision::ReturnToMainWindow
        );
        assert_eq!(
            decide_auth_navigation(&app_url, &url("https://accounts.google.com/consent")),
            NavigationDecision::Allow
        );
    }
}
