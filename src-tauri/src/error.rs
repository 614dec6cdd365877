/// Errors raised while bringing up or driving the desktop shell.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("tauri error: {0}")]
    Tauri(#[from] tauri::Error),

    #[error("updater error: {0}")]
    Updater(#[from] tauri_plugin_updater::Error),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ShellError>;
