//! Player slot representation used inside the registry.
//!
//! A slot is one fixed position in the lobby. It holds:
//! - the bound connection (if any)
//! - `hp`, clamped to `[0, MAX_HP]`
//! - `frozen_rounds`, turns left to be skipped
//! - `active`, cleared once HP reaches zero
//!
//! Occupancy is derived from the connection, so "occupied" and "has a
//! connection" can never disagree.

use crate::constants::MAX_HP;

/// Opaque handle for a transport connection.
///
/// The transport owns the actual socket; the engine only ever compares
/// and stores these ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

/// Stable, zero-based slot position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(pub usize);

impl SlotIndex {
    /// 1-based number shown to players ("Player 2").
    pub fn number(self) -> usize {
        self.0 + 1
    }
}

/// A single player slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    connection: Option<ConnectionId>,
    hp: u32,
    frozen_rounds: u32,
    active: bool,
}

impl Default for PlayerSlot {
    fn default() -> Self {
        PlayerSlot {
            connection: None,
            hp: MAX_HP,
            frozen_rounds: 0,
            active: true,
        }
    }
}

impl PlayerSlot {
    pub fn connection(&self) -> Option<ConnectionId> {
        self.connection
    }

    pub fn is_occupied(&self) -> bool {
        self.connection.is_some()
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn frozen_rounds(&self) -> u32 {
        self.frozen_rounds
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_rounds > 0
    }

    /// Whether this slot may cast at all.
    pub fn can_act(&self) -> bool {
        self.hp > 0 && self.active
    }

    /// Set HP, clamped to `MAX_HP`. Reaching zero eliminates the player.
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(MAX_HP);
        if self.hp == 0 {
            self.active = false;
        }
    }

    pub fn set_frozen_rounds(&mut self, rounds: u32) {
        self.frozen_rounds = rounds;
    }

    /// Subtract `amount` HP, saturating at zero.
    ///
    /// Returns `true` if this eliminated the player.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.set_hp(self.hp.saturating_sub(amount));
        self.hp == 0
    }

    /// Add `amount` HP, capped at `MAX_HP`.
    pub fn restore(&mut self, amount: u32) {
        self.set_hp(self.hp.saturating_add(amount));
    }

    /// Count one skipped turn off the freeze. Returns the rounds left.
    pub(crate) fn tick_frozen(&mut self) -> u32 {
        self.frozen_rounds = self.frozen_rounds.saturating_sub(1);
        self.frozen_rounds
    }

    pub(crate) fn bind(&mut self, connection: ConnectionId) {
        self.connection = Some(connection);
    }

    pub(crate) fn unbind(&mut self) -> Option<ConnectionId> {
        self.connection.take()
    }

    /// Restore the start-of-process combat stats, keeping the connection.
    pub(crate) fn reset_stats(&mut self) {
        self.hp = MAX_HP;
        self.frozen_rounds = 0;
        self.active = true;
    }
}
