use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use url::Url;

use crate::{shell_config::ShellConfig, update_channel::UpdateChannel};

/// Settings shared with every hook and command once setup has run.
#[derive(Debug)]
pub(crate) struct ShellState {
    pub(crate) config: ShellConfig,
}

impl ShellState {
    pub(crate) fn new(config: ShellConfig) -> Self {
        Self { config }
    }

    pub(crate) fn app_url(&self) -> &Url {
        &self.config.app_url
    }

    pub(crate) fn is_dev(&self) -> bool {
        self.config.dev_mode
    }
}

#[derive(Debug)]
pub(crate) struct UpdateState {
    channel: Mutex<UpdateChannel>,
    pub(crate) in_progress: AtomicBool,
}

impl UpdateState {
    pub(crate) fn new(channel: UpdateChannel) -> Self {
        Self {
            channel: Mutex::new(channel),
            in_progress: AtomicBool::new(false),
        }
    }

    pub(crate) fn channel(&self) -> UpdateChannel {
        self.channel
            .lock()
            .map(|guard| *guard)
            .unwrap_or(UpdateChannel::Latest)
    }

    pub(crate) fn set_channel(&self, channel: UpdateChannel) {
        if let Ok(mut guard) = self.channel.lock() {
            *guard = channel;
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct BridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

impl BridgeResult {
    pub(crate) fn ok() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for BridgeResult {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(error) => Self::failed(error.to_string()),
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateCheckResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
    pub(crate) channel: UpdateChannel,
    pub(crate) current_version: String,
    pub(crate) latest_version: Option<String>,
    pub(crate) has_update: bool,
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
