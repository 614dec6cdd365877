use std::time::Instant;

use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_updater::{Update, Updater, UpdaterExt};
use url::Url;

use crate::{
    error::Result,
    shell_locale::{self, LocaleState, ShellTexts},
    update_channel::UpdateChannel,
    AtomicFlagGuard, BridgeResult, ShellState, UpdateCheckResult, UpdateState,
    DEFAULT_SHELL_LOCALE,
};

/// Each channel is served from its own feed next to the others, e.g.
/// `<base>/beta.json`.
pub(crate) fn channel_endpoint(base: &Url, channel: UpdateChannel) -> Result<Url> {
    Ok(base.join(&format!("{channel}.json"))?)
}

pub(crate) fn init_update_channel(app_handle: &AppHandle) -> UpdateChannel {
    let channel = UpdateChannel::from_package_version(&app_handle.package_info().version);
    tracing::info!(channel = %channel, "update channel");

    match app_handle.try_state::<UpdateState>() {
        Some(state) => state.set_channel(channel),
        None => {
            app_handle.manage(UpdateState::new(channel));
        }
    }
    channel
}

pub(crate) fn current_channel(app_handle: &AppHandle) -> UpdateChannel {
    app_handle
        .try_state::<UpdateState>()
        .map(|state| state.channel())
        .unwrap_or(UpdateChannel::Latest)
}

pub(crate) fn build_channel_updater(
    app_handle: &AppHandle,
    update_url: &Url,
    channel: UpdateChannel,
) -> Result<Updater> {
    let endpoint = channel_endpoint(update_url, channel)?;
    tracing::debug!(endpoint = %endpoint, "configuring updater endpoint");
    Ok(app_handle
        .updater_builder()
        .endpoints(vec![endpoint])?
        .build()?)
}

async fn check_channel_update(app_handle: &AppHandle) -> Result<Option<Update>> {
    let update_url = app_handle.state::<ShellState>().config.update_url.clone();
    let updater = build_channel_updater(app_handle, &update_url, current_channel(app_handle))?;
    Ok(updater.check().await?)
}

async fn download_and_install(update: &Update) -> Result<()> {
    let bytes = update.download(|_, _| {}, || {}).await?;
    tracing::info!(version = %update.version, "update downloaded, installing");
    update.install(&bytes)?;
    Ok(())
}

fn shell_texts(app_handle: &AppHandle) -> ShellTexts {
    app_handle
        .try_state::<LocaleState>()
        .map(|state| state.texts())
        .unwrap_or_else(|| shell_locale::shell_texts_for_locale(DEFAULT_SHELL_LOCALE))
}

pub(crate) fn spawn_startup_update_check(app_handle: AppHandle) {
    let state = app_handle.state::<ShellState>();
    if state.is_dev() {
        tracing::info!("dev mode, skipping startup update check");
        return;
    }
    if state.config.updates_disabled {
        tracing::info!("updates disabled, skipping startup update check");
        return;
    }

    tauri::async_runtime::spawn(async move {
        check_for_updates_and_notify(&app_handle).await;
    });
}

async fn check_for_updates_and_notify(app_handle: &AppHandle) {
    let update_state = app_handle.state::<UpdateState>();
    let Some(_guard) = AtomicFlagGuard::try_set(&update_state.in_progress) else {
        tracing::debug!("update check already in progress");
        return;
    };

    let current_version = app_handle.package_info().version.to_string();
    let check_started = Instant::now();
    tracing::info!(
        current_version = %current_version,
        channel = %update_state.channel(),
        "checking for updates"
    );

    let update = match check_channel_update(app_handle).await {
        Ok(Some(update)) => update,
        Ok(None) => {
            tracing::info!(
                current_version = %current_version,
                elapsed_ms = check_started.elapsed().as_millis() as u64,
                "no update available"
            );
            return;
        }
        Err(error) => {
            // A missing feed is normal before the first release on a channel.
            tracing::warn!(
                current_version = %current_version,
                elapsed_ms = check_started.elapsed().as_millis() as u64,
                %error,
                "update check failed"
            );
            return;
        }
    };

    let new_version = update.version.clone();
    tracing::info!(
        current_version = %current_version,
        new_version = %new_version,
        "update available"
    );

    let texts = shell_texts(app_handle);
    let should_update = app_handle
        .dialog()
        .message(texts.update_available_message(&new_version))
        .title(texts.update_available_title)
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::YesNo)
        .blocking_show();
    if !should_update {
        tracing::info!(new_version = %new_version, "user postponed update");
        return;
    }

    if let Err(error) = download_and_install(&update).await {
        tracing::error!(new_version = %new_version, %error, "failed to install update");
        app_handle
            .dialog()
            .message(texts.update_failed_message(&new_version))
            .title(texts.update_failed_title)
            .kind(MessageDialogKind::Error)
            .show(|_| {});
        return;
    }

    tracing::info!(new_version = %new_version, "update installed, restarting");
    app_handle.request_restart();
}

pub(crate) async fn check_for_update(app_handle: &AppHandle) -> UpdateCheckResult {
    let current_version = app_handle.package_info().version.to_string();
    let channel = current_channel(app_handle);

    match check_channel_update(app_handle).await {
        Ok(Some(update)) => UpdateCheckResult {
            ok: true,
            reason: None,
            channel,
            current_version,
            latest_version: Some(update.version),
            has_update: true,
        },
        Ok(None) => UpdateCheckResult {
            ok: true,
            reason: None,
            channel,
            current_version: current_version.clone(),
            latest_version: Some(current_version),
            has_update: false,
        },
        Err(error) => {
            tracing::warn!(%error, "update check requested by web client failed");
            UpdateCheckResult {
                ok: false,
                reason: Some(error.to_string()),
                channel,
                current_version,
                latest_version: None,
                has_update: false,
            }
        }
    }
}

pub(crate) async fn install_update(app_handle: &AppHandle) -> BridgeResult {
    let update_state = app_handle.state::<UpdateState>();
    let Some(_guard) = AtomicFlagGuard::try_set(&update_state.in_progress) else {
        return BridgeResult::failed("Update already in progress.");
    };

    let update = match check_channel_update(app_handle).await {
        Ok(Some(update)) => update,
        Ok(None) => return BridgeResult::failed("Already on the latest version."),
        Err(error) => {
            tracing::warn!(%error, "update check before install failed");
            return BridgeResult::failed(error.to_string());
        }
    };

    if let Err(error) = download_and_install(&update).await {
        tracing::error!(version = %update.version, %error, "failed to install update");
        return BridgeResult::failed(error.to_string());
    }

    tracing::info!(version = %update.version, "update installed, restarting");
    app_handle.request_restart();
    BridgeResult::ok()
}
