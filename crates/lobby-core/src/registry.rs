//! Fixed-size table of player slots.
//!
//! - Exactly `MAX_PLAYERS` slots, addressed by stable index.
//! - Joins take the lowest free slot.
//! - Leaving frees the slot in place; nothing is compacted or renumbered.
//!
//! What a reused slot looks like depends on [`SlotReuse`].

use std::str::FromStr;

use crate::constants::MAX_PLAYERS;
use crate::error::LobbyError;
use crate::player::{ConnectionId, PlayerSlot, SlotIndex};

/// What happens to a freed slot's combat stats when someone new joins it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotReuse {
    /// HP, freeze and elimination carry over to the next occupant.
    #[default]
    CarryOver,

    /// The next occupant starts with full HP, unfrozen and active.
    Reset,
}

impl FromStr for SlotReuse {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "carry-over" | "carryover" | "carry" => Ok(SlotReuse::CarryOver),
            "reset" => Ok(SlotReuse::Reset),
            other => Err(format!("unknown slot reuse policy: {other}")),
        }
    }
}

/// The player table.
#[derive(Debug, Clone)]
pub struct PlayerRegistry {
    slots: [PlayerSlot; MAX_PLAYERS],
    player_count: usize,
    reuse: SlotReuse,
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        PlayerRegistry::new(SlotReuse::default())
    }
}

impl PlayerRegistry {
    pub fn new(reuse: SlotReuse) -> Self {
        PlayerRegistry {
            slots: std::array::from_fn(|_| PlayerSlot::default()),
            player_count: 0,
            reuse,
        }
    }

    /// Bind `connection` to the first free slot.
    pub fn join(&mut self, connection: ConnectionId) -> Result<SlotIndex, LobbyError> {
        let index = self
            .slots
            .iter()
            .position(|slot| !slot.is_occupied())
            .ok_or(LobbyError::LobbyFull)?;

        let slot = &mut self.slots[index];
        if self.reuse == SlotReuse::Reset {
            slot.reset_stats();
        }
        slot.bind(connection);
        self.player_count += 1;

        Ok(SlotIndex(index))
    }

    /// Free a slot. Returns the connection that was bound, if any.
    pub fn leave(&mut self, slot: SlotIndex) -> Option<ConnectionId> {
        let connection = self.slots.get_mut(slot.0)?.unbind()?;
        self.player_count -= 1;
        Some(connection)
    }

    /// Map a connection back to the slot it occupies.
    pub fn find_by_connection(&self, connection: ConnectionId) -> Option<SlotIndex> {
        self.slots
            .iter()
            .position(|slot| slot.connection() == Some(connection))
            .map(SlotIndex)
    }

    /// Number of occupied slots.
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn reuse_policy(&self) -> SlotReuse {
        self.reuse
    }

    /// Panics if `slot` is out of range; slot indices are produced by the
    /// registry and the scheduler, which keep them below `MAX_PLAYERS`.
    pub fn slot(&self, slot: SlotIndex) -> &PlayerSlot {
        &self.slots[slot.0]
    }

    pub fn slot_mut(&mut self, slot: SlotIndex) -> &mut PlayerSlot {
        &mut self.slots[slot.0]
    }

    /// Connection bound to `slot`, if it is occupied.
    pub fn connection(&self, slot: SlotIndex) -> Option<ConnectionId> {
        self.slots.get(slot.0).and_then(PlayerSlot::connection)
    }

    /// Occupied slots in ascending index order.
    pub fn occupied(&self) -> impl Iterator<Item = (SlotIndex, &PlayerSlot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_occupied())
            .map(|(i, slot)| (SlotIndex(i), slot))
    }

    /// Connections of every occupied slot, in slot order.
    pub fn connections(&self) -> Vec<ConnectionId> {
        self.occupied()
            .filter_map(|(_, slot)| slot.connection())
            .collect()
    }
}
