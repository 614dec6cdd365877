use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde_json::{Map, Value};
use tauri::{AppHandle, Manager};

use crate::{error::Result, DEFAULT_SHELL_LOCALE, DESKTOP_STATE_FILE, LOCALE_ENV};

const LOCALE_FIELD: &str = "locale";
const VERSION_PLACEHOLDER: &str = "{version}";

fn empty_state_object() -> Value {
    Value::Object(Map::new())
}

#[derive(Debug, Clone, Copy)]
pub struct ShellTexts {
    pub update_available_title: &'static str,
    update_available_prompt: &'static str,
    pub update_failed_title: &'static str,
    update_failed_prompt: &'static str,
}

impl ShellTexts {
    pub fn update_available_message(&self, version: &str) -> String {
        self.update_available_prompt.replace(VERSION_PLACEHOLDER, version)
    }

    pub fn update_failed_message(&self, version: &str) -> String {
        self.update_failed_prompt.replace(VERSION_PLACEHOLDER, version)
    }
}

pub fn shell_texts_for_locale(locale: &str) -> ShellTexts {
    match locale {
        "ko-KR" => ShellTexts {
            update_available_title: "새 버전 알림",
            update_available_prompt:
                "BoxHero {version} 버전이 있습니다. 지금 다운로드하고 설치할까요?\n설치 후 앱이 다시 시작됩니다.",
            update_failed_title: "업데이트 실패",
            update_failed_prompt:
                "BoxHero {version} 업데이트를 설치하지 못했습니다. 잠시 후 다시 시도해 주세요.",
        },
        "ja-JP" => ShellTexts {
            update_available_title: "新しいバージョン",
            update_available_prompt:
                "BoxHero {version} が利用可能です。今すぐダウンロードしてインストールしますか？\nインストール後にアプリが再起動します。",
            update_failed_title: "アップデートに失敗しました",
            update_failed_prompt:
                "BoxHero {version} のアップデートをインストールできませんでした。しばらくしてからもう一度お試しください。",
        },
        _ => ShellTexts {
            update_available_title: "Update available",
            update_available_prompt:
                "BoxHero {version} is available. Download and install it now?\nThe app will restart after installation.",
            update_failed_title: "Update failed",
            update_failed_prompt:
                "BoxHero {version} could not be installed. Please try again later.",
        },
    }
}

/// Locale the shell resolved at startup; updated when the web client changes it.
#[derive(Debug)]
pub(crate) struct LocaleState {
    locale: Mutex<&'static str>,
    state_path: Option<PathBuf>,
}

impl LocaleState {
    pub(crate) fn new(locale: &'static str, state_path: Option<PathBuf>) -> Self {
        Self {
            locale: Mutex::new(locale),
            state_path,
        }
    }

    pub(crate) fn current(&self) -> &'static str {
        self.locale
            .lock()
            .map(|guard| *guard)
            .unwrap_or(DEFAULT_SHELL_LOCALE)
    }

    pub(crate) fn texts(&self) -> ShellTexts {
        shell_texts_for_locale(self.current())
    }

    /// Persists `locale` and returns the locale now in effect. A supported
    /// locale takes effect even when it cannot be persisted.
    pub(crate) fn set(&self, locale: Option<&str>) -> Result<&'static str> {
        if let Some(state_path) = self.state_path.as_deref() {
            write_cached_shell_locale(locale, state_path)?;
        } else {
            tracing::warn!("shell locale state path is unavailable; skipping locale persistence");
        }

        let effective = locale
            .and_then(normalize_shell_locale)
            .unwrap_or_else(|| resolve_shell_locale(self.state_path.as_deref()));
        if let Ok(mut guard) = self.locale.lock() {
            *guard = effective;
        }
        Ok(effective)
    }
}

pub(crate) fn desktop_state_path(app_handle: &AppHandle) -> Option<PathBuf> {
    match app_handle.path().app_config_dir() {
        Ok(dir) => Some(dir.join(DESKTOP_STATE_FILE)),
        Err(error) => {
            tracing::warn!(%error, "failed to resolve app config directory");
            None
        }
    }
}

pub(crate) fn init_locale(app_handle: &AppHandle) -> &'static str {
    let state_path = desktop_state_path(app_handle);
    let locale = resolve_shell_locale(state_path.as_deref());
    tracing::info!(locale, "shell locale initialized");
    if !app_handle.manage(LocaleState::new(locale, state_path)) {
        tracing::debug!("locale state already exists, skipping manage");
    }
    locale
}

pub fn resolve_shell_locale(state_path: Option<&Path>) -> &'static str {
    if let Some(locale) = state_path.and_then(read_cached_shell_locale) {
        return locale;
    }

    for env_key in [LOCALE_ENV, "LC_ALL", "LANG"] {
        if let Ok(value) = env::var(env_key) {
            if let Some(locale) = normalize_shell_locale(&value) {
                return locale;
            }
        }
    }

    DEFAULT_SHELL_LOCALE
}

pub(crate) fn normalize_shell_locale(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let lowered = raw.to_ascii_lowercase();
    if lowered.starts_with("ko") {
        return Some("ko-KR");
    }
    if lowered.starts_with("ja") {
        return Some("ja-JP");
    }
    if lowered.starts_with("en") {
        return Some("en-US");
    }
    None
}

fn read_cached_shell_locale(state_path: &Path) -> Option<&'static str> {
    let raw = fs::read_to_string(state_path).ok()?;
    let parsed: Value = serde_json::from_str(&raw).ok()?;
    let locale = parsed.get(LOCALE_FIELD)?.as_str()?;
    normalize_shell_locale(locale)
}

fn into_state_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub(crate) fn write_cached_shell_locale(locale: Option<&str>, state_path: &Path) -> Result<()> {
    let normalized_locale = locale.and_then(normalize_shell_locale);
    if let Some(raw_locale) = locale {
        if normalized_locale.is_none() {
            tracing::warn!(
                locale = raw_locale,
                "unsupported shell locale; clearing cached locale"
            );
        }
    }

    if let Some(parent_dir) = state_path.parent() {
        fs::create_dir_all(parent_dir)?;
    }

    let parsed = match fs::read_to_string(state_path) {
        Ok(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(
                    path = %state_path.display(),
                    %error,
                    "failed to parse desktop state; resetting state file"
                );
                empty_state_object()
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => empty_state_object(),
        Err(error) => return Err(error.into()),
    };
    if !parsed.is_object() {
        tracing::warn!(
            path = %state_path.display(),
            "desktop state has non-object root; resetting state file"
        );
    }
    let mut object = into_state_object(parsed);

    if let Some(normalized_locale) = normalized_locale {
        object.insert(
            LOCALE_FIELD.to_string(),
            Value::String(normalized_locale.to_string()),
        );
    } else {
        object.remove(LOCALE_FIELD);
    }

    let serialized = serde_json::to_string_pretty(&object)?;
    fs::write(state_path, serialized)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_texts_for_locale_returns_korean_copy() {
        let texts = shell_texts_for_locale("ko-KR");
        assert_eq!(texts.update_available_title, "새 버전 알림");
        assert!(texts.update_available_message("1.9.0").contains("1.9.0"));
    }

    #[test]
    fn shell_texts_for_locale_falls_back_to_english_copy() {
        let texts = shell_texts_for_locale("fr-FR");
        assert_eq!(texts.update_available_title, "Update available");
        assert_eq!(
            texts.update_failed_message("2.0.0"),
            "BoxHero 2.0.0 could not be installed. Please try again later."
        );
    }

    #[test]
    fn normalize_shell_locale_accepts_language_prefixes() {
        assert_eq!(normalize_shell_locale("KO_kr"), Some("ko-KR"));
        assert_eq!(normalize_shell_locale("ja"), Some("ja-JP"));
        assert_eq!(normalize_shell_locale("en_GB.UTF-8"), Some("en-US"));
        assert_eq!(normalize_shell_locale("fr-FR"), None);
        assert_eq!(normalize_shell_locale("   "), None);
    }

    #[test]
    fn write_cached_shell_locale_preserves_other_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("nested").join(DESKTOP_STATE_FILE);
        fs::create_dir_all(state_path.parent().expect("parent")).expect("create parent");
        fs::write(&state_path, r#"{"windowBounds":{"width":1280}}"#).expect("seed state");

        write_cached_shell_locale(Some("ko"), &state_path).expect("write locale");

        let parsed: Value =
            serde_json::from_str(&fs::read_to_string(&state_path).expect("read state"))
                .expect("valid json");
        assert_eq!(parsed["locale"], "ko-KR");
        assert_eq!(parsed["windowBounds"]["width"], 1280);
        assert_eq!(read_cached_shell_locale(&state_path), Some("ko-KR"));
    }

    #[test]
    fn write_cached_shell_locale_clears_unsupported_locale() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join(DESKTOP_STATE_FILE);
        write_cached_shell_locale(Some("ja-JP"), &state_path).expect("write locale");
        assert_eq!(read_cached_shell_locale(&state_path), Some("ja-JP"));

        write_cached_shell_locale(Some("fr-FR"), &state_path).expect("clear locale");
        assert_eq!(read_cached_shell_locale(&state_path), None);
    }

    #[test]
    fn write_cached_shell_locale_resets_corrupt_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join(DESKTOP_STATE_FILE);
        fs::write(&state_path, "[1, 2, 3]").expect("seed state");

        write_cached_shell_locale(Some("en-US"), &state_path).expect("write locale");

        let parsed: Value =
            serde_json::from_str(&fs::read_to_string(&state_path).expect("read state"))
                .expect("valid json");
        assert_eq!(parsed, serde_json::json!({ "locale": "en-US" }));
    }

    #[test]
    fn locale_state_set_updates_current_locale() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join(DESKTOP_STATE_FILE);
        let state = LocaleState::new("en-US", Some(state_path));

        let effective = state.set(Some("ko-KR")).expect("set locale");
        assert_eq!(effective, "ko-KR");
        assert_eq!(state.current(), "ko-KR");
    }

    #[test]
    fn locale_state_set_applies_locale_without_state_path() {
        let state = LocaleState::new("en-US", None);

        let effective = state.set(Some("ko")).expect("set locale");
        assert_eq!(effective, "ko-KR");
        assert_eq!(state.current(), "ko-KR");
        assert_eq!(state.texts().update_available_title, "새 버전 알림");
    }

    #[test]
    fn into_state_object_replaces_non_object_roots() {
        assert!(into_state_object(serde_json::json!([1, 2])).is_empty());
        let map = into_state_object(serde_json::json!({ "locale": "ja-JP" }));
        assert_eq!(map.get("locale"), Some(&Value::String("ja-JP".to_string())));
    }
}
