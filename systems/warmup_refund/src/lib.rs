#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Refunds purchases made during the warmup period.
//!
//! The system observes the engine's acquisition decision as a post hook. When a
//! purchase is allowed while the match is in warmup it queues a refill of the
//! buyer's account for the next tick. The engine deducts the price only after
//! every hook returned, so a write made inside the hook would be overwritten.

use money_tweaks_core::{
    AcquireMethod, AcquireResult, AcquisitionEvent, GameStateProvider, PlayerHandle,
    PlayerRoster, PurchaseDecisionObserver, Server, TickScheduler, GAME_RULES_DESIGNER_NAME,
};
use money_tweaks_system_money::fill_money;
use tracing::{debug, info, warn};

/// Reports whether the match is in its warmup period.
///
/// Warmup end events are not reliable (ending warmup from the console skips
/// them), so the flag is read from the match-rules entity on every call. A
/// missing entity counts as "not in warmup".
#[must_use]
pub fn is_warmup<P>(provider: &P) -> bool
where
    P: GameStateProvider + ?Sized,
{
    provider
        .find_game_rules(GAME_RULES_DESIGNER_NAME)
        .is_some_and(|rules| rules.warmup_period)
}

/// Outcome of inspecting a single acquisition decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// The pawn has no controller, or the controller disconnected.
    StaleController,
    /// The item was not bought.
    NotPurchase,
    /// The engine refused the acquisition.
    NotAllowed,
    /// The match is not in warmup.
    OutsideWarmup,
    /// The purchase must be refunded by refilling this player's account.
    Refill(PlayerHandle),
}

/// Applies the gating conditions in order and reports the first one that fails.
#[must_use]
pub fn classify<S>(event: &AcquisitionEvent, server: &S) -> Classification
where
    S: GameStateProvider + PlayerRoster + ?Sized,
{
    let Some(acquirer) = server
        .pawn_controller(event.pawn)
        .filter(|player| server.is_valid(*player))
    else {
        return Classification::StaleController;
    };
    if event.method != AcquireMethod::Buy {
        return Classification::NotPurchase;
    }
    if event.result != AcquireResult::Allowed {
        return Classification::NotAllowed;
    }
    if !is_warmup(server) {
        return Classification::OutsideWarmup;
    }
    Classification::Refill(acquirer)
}

/// Post hook that keeps warmup purchases free.
#[derive(Debug, Default)]
pub struct WarmupRefund;

impl WarmupRefund {
    /// Creates a new refund hook.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PurchaseDecisionObserver for WarmupRefund {
    fn on_decision(
        &mut self,
        event: &AcquisitionEvent,
        server: &dyn Server,
        scheduler: &mut dyn TickScheduler,
    ) {
        let Classification::Refill(acquirer) = classify(event, server) else {
            return;
        };

        info!(
            player = %acquirer,
            item = %event.item,
            "preventing money cost as the game is in warmup period"
        );
        scheduler.post_next_tick(Box::new(move |server: &mut dyn Server| {
            refill(server, acquirer);
        }));
    }
}

fn refill(server: &mut dyn Server, acquirer: PlayerHandle) {
    if !server.is_valid(acquirer) {
        debug!(player = %acquirer, "buyer left before the warmup refund ran");
        return;
    }
    match fill_money(server, acquirer) {
        Ok(balance) => debug!(player = %acquirer, balance, "warmup purchase refunded"),
        Err(error) => warn!(player = %acquirer, %error, "warmup refund failed"),
    }
}
