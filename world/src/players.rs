//! Player slot bookkeeping with generational handles.

use std::collections::{BTreeMap, BTreeSet};

use money_tweaks_core::{PawnHandle, PlayerHandle, PlayerSnapshot, ROOT_PERMISSION};

/// Number of player slots a server offers.
pub(crate) const MAX_PLAYER_SLOTS: usize = 64;

/// State of a connected player controller.
#[derive(Clone, Debug)]
pub(crate) struct PlayerState {
    pub(crate) handle: PlayerHandle,
    pub(crate) name: String,
    pub(crate) pawn: PawnHandle,
    pub(crate) money: i32,
    pub(crate) permissions: BTreeSet<String>,
    pub(crate) inventory: BTreeSet<String>,
}

impl PlayerState {
    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            handle: self.handle,
            name: self.name.clone(),
            money: self.money,
        }
    }

    pub(crate) fn has_permission(&self, permission: &str) -> bool {
        permission.is_empty()
            || self.permissions.contains(permission)
            || self.permissions.contains(ROOT_PERMISSION)
    }
}

/// Registry of player slots and the pawns they control.
#[derive(Debug, Default)]
pub(crate) struct PlayerRegistry {
    slots: Vec<Option<PlayerState>>,
    pawns: BTreeMap<PawnHandle, Option<PlayerHandle>>,
    next_serial: u32,
    next_pawn: u32,
}

impl PlayerRegistry {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Claims the lowest free slot for a new player and spawns its pawn.
    ///
    /// Returns `None` when every slot is taken.
    pub(crate) fn connect(
        &mut self,
        name: String,
        permissions: Vec<String>,
        money: i32,
    ) -> Option<PlayerHandle> {
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.slots.len());
        if slot >= MAX_PLAYER_SLOTS {
            return None;
        }
        let handle = PlayerHandle::new(u32::try_from(slot).ok()?, self.next_serial);
        if slot == self.slots.len() {
            self.slots.push(None);
        }
        self.next_serial = self.next_serial.wrapping_add(1);
        let pawn = PawnHandle::new(self.next_pawn);
        self.next_pawn = self.next_pawn.wrapping_add(1);
        let _ = self.pawns.insert(pawn, Some(handle));

        self.slots[slot] = Some(PlayerState {
            handle,
            name,
            pawn,
            money: money.max(0),
            permissions: permissions.into_iter().collect(),
            inventory: BTreeSet::new(),
        });
        Some(handle)
    }

    /// Frees the slot held by the player, orphaning its pawn.
    pub(crate) fn disconnect(&mut self, handle: PlayerHandle) -> bool {
        let Some(state) = self.get(handle) else {
            return false;
        };
        let pawn = state.pawn;
        if let Some(controller) = self.pawns.get_mut(&pawn) {
            *controller = None;
        }
        self.slots[handle.slot() as usize] = None;
        true
    }

    pub(crate) fn get(&self, handle: PlayerHandle) -> Option<&PlayerState> {
        self.slots
            .get(handle.slot() as usize)
            .and_then(Option::as_ref)
            .filter(|state| state.handle == handle)
    }

    pub(crate) fn get_mut(&mut self, handle: PlayerHandle) -> Option<&mut PlayerState> {
        self.slots
            .get_mut(handle.slot() as usize)
            .and_then(Option::as_mut)
            .filter(|state| state.handle == handle)
    }

    pub(crate) fn controller_of(&self, pawn: PawnHandle) -> Option<PlayerHandle> {
        self.pawns.get(&pawn).copied().flatten()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &PlayerState> {
        self.slots.iter().flatten()
    }
}
