#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Validated read and write access to player money accounts.
//!
//! Every successful write is followed by exactly one state-changed
//! notification on the money services field so clients observe the new
//! balance on the next network frame.

use money_tweaks_core::{
    ConVarSource, MoneyError, MoneyServices, PlayerHandle, MAX_MONEY_CONVAR,
    MONEY_SERVICES_FIELD, PLAYER_CONTROLLER_CLASS,
};
use tracing::debug;

/// Reads the current money cap from the server console variable.
///
/// The value is read fresh on every call. A negative cap is treated as zero.
pub fn max_money<S>(server: &S) -> Result<i32, MoneyError>
where
    S: ConVarSource + ?Sized,
{
    server
        .int_convar(MAX_MONEY_CONVAR)
        .map(|limit| limit.max(0))
        .ok_or(MoneyError::MissingConVar(MAX_MONEY_CONVAR))
}

/// Sets the player's balance to exactly `amount`.
///
/// No upper bound is enforced here; only [`fill_money`] consults the cap.
pub fn set_money<S>(server: &mut S, target: PlayerHandle, amount: i32) -> Result<(), MoneyError>
where
    S: MoneyServices + ?Sized,
{
    if amount < 0 {
        return Err(MoneyError::InvalidAmount(amount));
    }
    if !server.write_account(target, amount) {
        return Err(MoneyError::InvalidatedHandle(target));
    }
    server.set_state_changed(target, PLAYER_CONTROLLER_CLASS, MONEY_SERVICES_FIELD);
    debug!(player = %target, amount, "money account updated");
    Ok(())
}

/// Fills the player's account up to the current money cap, returning the new balance.
pub fn fill_money<S>(server: &mut S, target: PlayerHandle) -> Result<i32, MoneyError>
where
    S: ConVarSource + MoneyServices + ?Sized,
{
    let limit = max_money(server)?;
    set_money(server, target, limit)?;
    Ok(limit)
}
