#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Administrative console commands that read and mutate money balances.
//!
//! Both commands compose target resolution with the money controller and
//! report exactly one outcome line to the caller.

use money_tweaks_core::{
    CommandDefinition, CommandError, CommandInfo, CommandRegistry, CommandUsage, PlayerHandle,
    RegistrationError, Server,
};
use money_tweaks_system_money::{fill_money, set_money};
use money_tweaks_system_targeting::resolve_target;
use tracing::{debug, info};

/// Reply sent when a command completed.
pub const SUCCESS_REPLY: &str = "Operation successful";

/// Default name of the set-balance command.
pub const DEFAULT_SET_MONEY_COMMAND: &str = "css_setmoney";

/// Default name of the fill-balance command.
pub const DEFAULT_FILL_MONEY_COMMAND: &str = "css_fillmoney";

/// Default permission flag required to run either command.
pub const DEFAULT_PERMISSION: &str = "@css/cheats";

/// `css_setmoney <amount> [target]`: command name, amount and target.
const SET_MONEY_MAX_ARGS: usize = 3;
const SET_MONEY_AMOUNT_INDEX: usize = 1;
const SET_MONEY_TARGET_INDEX: usize = 2;
const FILL_MONEY_TARGET_INDEX: usize = 1;

/// Sets the target's balance to the amount given on the command line.
pub fn set_balance<S>(
    server: &mut S,
    invoker: Option<PlayerHandle>,
    info: &CommandInfo,
) -> Result<PlayerHandle, CommandError>
where
    S: Server + ?Sized,
{
    if info.arg_count() > SET_MONEY_MAX_ARGS {
        return Err(CommandError::TooManyArguments);
    }
    if invoker.is_none() && info.arg_count() <= SET_MONEY_TARGET_INDEX {
        return Err(CommandError::ConsoleTargetRequired);
    }
    let target = resolve_target(server, invoker, info, SET_MONEY_TARGET_INDEX)?;

    let raw = info.arg(SET_MONEY_AMOUNT_INDEX);
    let amount: i32 = raw
        .trim()
        .parse()
        .map_err(|_| CommandError::AmountNotInteger(raw.to_owned()))?;
    if amount < 0 {
        return Err(CommandError::AmountNegative(amount));
    }

    set_money(server, target, amount)?;
    Ok(target)
}

/// Fills the target's balance up to the server money cap.
pub fn fill_balance<S>(
    server: &mut S,
    invoker: Option<PlayerHandle>,
    info: &CommandInfo,
) -> Result<PlayerHandle, CommandError>
where
    S: Server + ?Sized,
{
    let target = resolve_target(server, invoker, info, FILL_MONEY_TARGET_INDEX)?;
    let _ = fill_money(server, target)?;
    Ok(target)
}

fn report(
    invoker: Option<PlayerHandle>,
    info: &mut CommandInfo,
    outcome: Result<PlayerHandle, CommandError>,
) {
    match outcome {
        Ok(target) => {
            info!(
                command = info.command_name(),
                caller = ?invoker,
                %target,
                "money command applied"
            );
            info.reply_to_command(SUCCESS_REPLY);
        }
        Err(error) => {
            debug!(
                command = info.command_name(),
                caller = ?invoker,
                %error,
                "money command rejected"
            );
            info.reply_to_command(error.to_string());
        }
    }
}

/// Console handler for the set-balance command.
pub fn on_set_money(
    invoker: Option<PlayerHandle>,
    info: &mut CommandInfo,
    server: &mut dyn Server,
) {
    let outcome = set_balance(server, invoker, info);
    report(invoker, info, outcome);
}

/// Console handler for the fill-balance command.
pub fn on_fill_money(
    invoker: Option<PlayerHandle>,
    info: &mut CommandInfo,
    server: &mut dyn Server,
) {
    let outcome = fill_balance(server, invoker, info);
    report(invoker, info, outcome);
}

/// Names and permission under which the money commands are registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoneyCommands {
    set_money: String,
    fill_money: String,
    permission: String,
}

impl Default for MoneyCommands {
    fn default() -> Self {
        Self::new(
            DEFAULT_SET_MONEY_COMMAND,
            DEFAULT_FILL_MONEY_COMMAND,
            DEFAULT_PERMISSION,
        )
    }
}

impl MoneyCommands {
    /// Creates a command set with explicit names and permission flag.
    #[must_use]
    pub fn new(
        set_money: impl Into<String>,
        fill_money: impl Into<String>,
        permission: impl Into<String>,
    ) -> Self {
        Self {
            set_money: set_money.into(),
            fill_money: fill_money.into(),
            permission: permission.into(),
        }
    }

    /// Registration metadata of the set-balance command.
    #[must_use]
    pub fn set_money_definition(&self) -> CommandDefinition {
        CommandDefinition {
            name: self.set_money.clone(),
            description: "Set the money amount of a player".into(),
            usage: "<amount> [target]".into(),
            min_args: 1,
            permission: self.permission.clone(),
            who_can_execute: CommandUsage::ClientAndServer,
        }
    }

    /// Registration metadata of the fill-balance command.
    #[must_use]
    pub fn fill_money_definition(&self) -> CommandDefinition {
        CommandDefinition {
            name: self.fill_money.clone(),
            description: "Fill the player money account".into(),
            usage: "[target]".into(),
            min_args: 0,
            permission: self.permission.clone(),
            who_can_execute: CommandUsage::ClientAndServer,
        }
    }

    /// Registers both commands, rolling back the first if the second fails.
    pub fn register<R>(&self, registry: &mut R) -> Result<(), RegistrationError>
    where
        R: CommandRegistry + ?Sized,
    {
        registry.register_command(self.set_money_definition(), Box::new(on_set_money))?;
        if let Err(error) =
            registry.register_command(self.fill_money_definition(), Box::new(on_fill_money))
        {
            let _ = registry.unregister_command(&self.set_money);
            return Err(error);
        }
        Ok(())
    }

    /// Removes both commands from the registry.
    pub fn unregister<R>(&self, registry: &mut R)
    where
        R: CommandRegistry + ?Sized,
    {
        let _ = registry.unregister_command(&self.set_money);
        let _ = registry.unregister_command(&self.fill_money);
    }
}
