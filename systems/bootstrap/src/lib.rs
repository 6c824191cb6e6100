#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Plugin lifecycle: installs the warmup refund hook and the money commands.

use money_tweaks_core::{CommandRegistry, HookId, HookRegistry, RegistrationError};
use money_tweaks_system_commands::{
    MoneyCommands, DEFAULT_FILL_MONEY_COMMAND, DEFAULT_PERMISSION, DEFAULT_SET_MONEY_COMMAND,
};
use money_tweaks_system_warmup_refund::WarmupRefund;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Name the plugin reports to the host.
pub const MODULE_NAME: &str = "MoneyTweaks";
/// Plugin version.
pub const MODULE_VERSION: &str = "1.0.0";
/// Plugin author.
pub const MODULE_AUTHOR: &str = "SNWCreations";
/// One-line summary of the plugin.
pub const MODULE_DESCRIPTION: &str = "Tweaks & utilities around the CS money system";

/// User-facing plugin configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Permission flag required by the money commands.
    pub permission: String,
    /// Console name of the set-balance command.
    pub set_money_command: String,
    /// Console name of the fill-balance command.
    pub fill_money_command: String,
    /// Whether purchases made during warmup are refunded.
    pub warmup_refund: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            permission: DEFAULT_PERMISSION.to_owned(),
            set_money_command: DEFAULT_SET_MONEY_COMMAND.to_owned(),
            fill_money_command: DEFAULT_FILL_MONEY_COMMAND.to_owned(),
            warmup_refund: true,
        }
    }
}

/// Failures while loading the plugin.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// `load` was called on a plugin that is already loaded.
    #[error("plugin is already loaded")]
    AlreadyLoaded,
    /// A console command could not be registered.
    #[error("failed to register commands: {0}")]
    Registration(#[from] RegistrationError),
}

/// Money tweaks plugin instance.
#[derive(Debug)]
pub struct MoneyTweaks {
    config: Config,
    commands: MoneyCommands,
    hook: Option<HookId>,
    loaded: bool,
}

impl MoneyTweaks {
    /// Creates an unloaded plugin with the provided configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let commands = MoneyCommands::new(
            config.set_money_command.clone(),
            config.fill_money_command.clone(),
            config.permission.clone(),
        );
        Self {
            config,
            commands,
            hook: None,
            loaded: false,
        }
    }

    /// Configuration the plugin was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reports whether the plugin is currently installed in a host.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Registers the commands and, when enabled, the warmup refund hook.
    pub fn load<H>(&mut self, host: &mut H, hot_reload: bool) -> Result<(), LifecycleError>
    where
        H: HookRegistry + CommandRegistry + ?Sized,
    {
        if self.loaded {
            return Err(LifecycleError::AlreadyLoaded);
        }
        self.commands.register(host)?;
        if self.config.warmup_refund {
            self.hook = Some(host.hook_can_acquire(Box::new(WarmupRefund::new())));
        }
        self.loaded = true;
        info!(
            module = MODULE_NAME,
            version = MODULE_VERSION,
            hot_reload,
            warmup_refund = self.config.warmup_refund,
            "plugin loaded"
        );
        Ok(())
    }

    /// Removes everything `load` installed. Unloading twice is a no-op.
    pub fn unload<H>(&mut self, host: &mut H, hot_reload: bool)
    where
        H: HookRegistry + CommandRegistry + ?Sized,
    {
        if !self.loaded {
            return;
        }
        if let Some(hook) = self.hook.take() {
            let _ = host.unhook_can_acquire(hook);
        }
        self.commands.unregister(host);
        self.loaded = false;
        info!(module = MODULE_NAME, hot_reload, "plugin unloaded");
    }
}

impl Default for MoneyTweaks {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
