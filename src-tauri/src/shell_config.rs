use std::env;

use url::Url;

use crate::{
    error::{Result, ShellError},
    APP_URL_ENV, DEFAULT_APP_URL, DEFAULT_UPDATE_URL, DEV_MODE_ENV, DISABLE_UPDATES_ENV,
    UPDATE_URL_ENV,
};

/// Runtime settings read once at startup.
#[derive(Debug, Clone)]
pub(crate) struct ShellConfig {
    pub(crate) app_url: Url,
    pub(crate) update_url: Url,
    pub(crate) dev_mode: bool,
    pub(crate) updates_disabled: bool,
}

impl ShellConfig {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            app_url: normalize_base_url(lookup(APP_URL_ENV).as_deref(), DEFAULT_APP_URL)?,
            update_url: normalize_base_url(lookup(UPDATE_URL_ENV).as_deref(), DEFAULT_UPDATE_URL)?,
            dev_mode: cfg!(debug_assertions) || parse_flag(lookup(DEV_MODE_ENV).as_deref()),
            updates_disabled: parse_flag(lookup(DISABLE_UPDATES_ENV).as_deref()),
        })
    }
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|value| value.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

/// Parses an http(s) base URL, forcing a trailing slash so relative joins stay
/// under the configured path. Unusable values fall back to `default_url`.
pub(crate) fn normalize_base_url(raw: Option<&str>, default_url: &str) -> Result<Url> {
    let candidate = raw.map(str::trim).filter(|value| !value.is_empty());
    if let Some(candidate) = candidate {
        match parse_base_url(candidate) {
            Ok(url) => return Ok(url),
            Err(error) => {
                tracing::warn!(value = candidate, %error, "ignoring invalid base URL");
            }
        }
    }

    parse_base_url(default_url)
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ShellError::Config(format!(
                "unsupported URL scheme '{scheme}'"
            )))
        }
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> ShellConfig {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ShellConfig::from_lookup(|key| values.get(key).cloned()).expect("config should load")
    }

    #[test]
    fn from_lookup_uses_defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.app_url.as_str(), DEFAULT_APP_URL);
        assert_eq!(config.update_url.as_str(), DEFAULT_UPDATE_URL);
        assert!(!config.updates_disabled);
    }

    #[test]
    fn from_lookup_reads_overrides() {
        let config = config_from(&[
            (APP_URL_ENV, " http://localhost:3000 "),
            (UPDATE_URL_ENV, "https://updates.example.com/boxhero"),
            (DISABLE_UPDATES_ENV, "1"),
            (DEV_MODE_ENV, "true"),
        ]);
        assert_eq!(config.app_url.as_str(), "http://localhost:3000/");
        assert_eq!(
            config.update_url.as_str(),
            "https://updates.example.com/boxhero/"
        );
        assert!(config.updates_disabled);
        assert!(config.dev_mode);
    }

    #[test]
    fn normalize_base_url_falls_back_on_invalid_values() {
        let url = normalize_base_url(Some("not a url"), DEFAULT_APP_URL).expect("default parses");
        assert_eq!(url.as_str(), DEFAULT_APP_URL);

        let url = normalize_base_url(Some("file:///tmp/app"), DEFAULT_APP_URL)
            .expect("default parses");
        assert_eq!(url.as_str(), DEFAULT_APP_URL);

        let url = normalize_base_url(Some("   "), DEFAULT_APP_URL).expect("default parses");
        assert_eq!(url.as_str(), DEFAULT_APP_URL);
    }

    #[test]
    fn parse_flag_accepts_common_truthy_values() {
        assert!(parse_flag(Some("1")));
        assert!(parse_flag(Some("TRUE")));
        assert!(parse_flag(Some(" on ")));
        assert!(!parse_flag(Some("0")));
        assert!(!parse_flag(Some("")));
        assert!(!parse_flag(None));
    }
}
