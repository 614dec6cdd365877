pub(crate) const APP_NAME: &str = "BoxHero";

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const AUTH_WINDOW_LABEL: &str = "auth";

pub(crate) const DEFAULT_APP_URL: &str = "https://web.boxhero-app.com/";
pub(crate) const DEFAULT_UPDATE_URL: &str = "https://update.boxhero-app.com/desktop/";

pub(crate) const APP_URL_ENV: &str = "BOXHERO_APP_URL";
pub(crate) const UPDATE_URL_ENV: &str = "BOXHERO_UPDATE_URL";
pub(crate) const DEV_MODE_ENV: &str = "BOXHERO_DEV";
pub(crate) const DISABLE_UPDATES_ENV: &str = "BOXHERO_DISABLE_UPDATES";
pub(crate) const LOG_FILTER_ENV: &str = "BOXHERO_LOG";
pub(crate) const LOCALE_ENV: &str = "BOXHERO_LOCALE";

pub(crate) const LOG_FILE_NAME: &str = "boxhero.log";
pub(crate) const DEFAULT_FILE_LOG_FILTER: &str = "debug";
pub(crate) const DESKTOP_STATE_FILE: &str = "desktop_state.json";

pub(crate) const VIEW_STATE_CHANGED_EVENT: &str = "view-state-changed";

pub(crate) const AUTH_USER_AGENT: &str = "Chrome";
pub(crate) const AUTH_HOSTS: &[&str] = &["accounts.google.com"];

pub(crate) const DEFAULT_SHELL_LOCALE: &str = "en-US";

pub(crate) const IS_MAC: bool = cfg!(target_os = "macos");
