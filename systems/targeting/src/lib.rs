#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resolves which player an administrative operation applies to.

use money_tweaks_core::{CommandInfo, PlayerHandle, PlayerRoster, TargetError};

/// Finds the first connected player whose display name matches exactly.
///
/// Matching is case-sensitive. Duplicate names resolve to the first player in
/// slot order.
#[must_use]
pub fn find_player_by_name<R>(roster: &R, name: &str) -> Option<PlayerHandle>
where
    R: PlayerRoster + ?Sized,
{
    roster
        .connected_players()
        .into_iter()
        .find(|player| player.name == name)
        .map(|player| player.handle)
}

/// Picks the target of a command whose optional player name sits at `target_index`.
///
/// The argument counts as supplied when `info.arg_count() > target_index`.
/// Without it the invoker is the target; the server console has no implicit
/// target and must name one.
pub fn resolve_target<R>(
    roster: &R,
    invoker: Option<PlayerHandle>,
    info: &CommandInfo,
    target_index: usize,
) -> Result<PlayerHandle, TargetError>
where
    R: PlayerRoster + ?Sized,
{
    let supplied = info.arg_count() > target_index;
    match (invoker, supplied) {
        (None, false) => Err(TargetError::MissingTarget {
            index: target_index,
        }),
        (Some(invoker), false) => Ok(invoker),
        (_, true) => {
            let name = info.arg(target_index);
            find_player_by_name(roster, name)
                .ok_or_else(|| TargetError::PlayerNotFound(name.to_owned()))
        }
    }
}
