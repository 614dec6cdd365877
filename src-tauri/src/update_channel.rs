use std::fmt;

use serde::Serialize;

const ALPHA_SUFFIX: &str = "-alpha";
const BETA_SUFFIX: &str = "-beta";

/// Release track an installation polls for updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateChannel {
    Alpha,
    Beta,
    Latest,
}

impl UpdateChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Latest => "latest",
        }
    }

    pub fn from_package_version(version: &semver::Version) -> Self {
        resolve_update_channel(Some(&version.to_string()))
    }
}

impl fmt::Display for UpdateChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only a trailing `-alpha` or `-beta` selects a pre-release channel; any other
/// pre-release tag (`-rc`, `-beta.1`) is served from `latest`.
pub fn resolve_update_channel(version: Option<&str>) -> UpdateChannel {
    let Some(version) = version else {
        return UpdateChannel::Latest;
    };

    if version.ends_with(ALPHA_SUFFIX) {
        UpdateChannel::Alpha
    } else if version.ends_with(BETA_SUFFIX) {
        UpdateChannel::Beta
    } else {
        UpdateChannel::Latest
    }
}
