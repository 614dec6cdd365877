#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod app_update;
mod auth_window;
mod error;
mod ipc_commands;
mod lifecycle;
mod logging;
mod main_window;
mod shell_config;
mod shell_locale;
mod update_channel;
mod view_state;
mod window_actions;

pub(crate) use app_constants::*;
pub(crate) use app_types::{
    AtomicFlagGuard, BridgeResult, ShellState, UpdateCheckResult, UpdateState,
};

fn main() {
    app_runtime::run();
}
