//! Turn cursor and frozen-round countdown.
//!
//! The cursor walks the slots in index order and wraps at `MAX_PLAYERS`.
//! It does not look at occupancy or elimination: empty slots and dead
//! players get their turn like everyone else.

use crate::constants::MAX_PLAYERS;
use crate::player::SlotIndex;
use crate::registry::PlayerRegistry;

/// Result of one scheduler step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStep {
    /// The turn holder was frozen. One round was counted off, the cursor
    /// moved on, and no command may be taken this iteration.
    Skipped { slot: SlotIndex, remaining: u32 },

    /// The turn holder may act; commands are processed this iteration.
    Ready { slot: SlotIndex },
}

#[derive(Debug, Clone, Default)]
pub struct TurnScheduler {
    turn_index: usize,
}

impl TurnScheduler {
    pub fn new() -> Self {
        TurnScheduler::default()
    }

    /// Slot whose turn it is.
    pub fn current(&self) -> SlotIndex {
        SlotIndex(self.turn_index)
    }

    pub fn is_turn_of(&self, slot: SlotIndex) -> bool {
        self.turn_index == slot.0
    }

    /// Move the cursor one slot forward.
    pub fn advance(&mut self) {
        self.turn_index = (self.turn_index + 1) % MAX_PLAYERS;
    }

    /// Run the per-iteration frozen check.
    pub fn step(&mut self, registry: &mut PlayerRegistry) -> TurnStep {
        let slot = self.current();
        let holder = registry.slot_mut(slot);

        if holder.is_frozen() {
            let remaining = holder.tick_frozen();
            self.advance();
            TurnStep::Skipped { slot, remaining }
        } else {
            TurnStep::Ready { slot }
        }
    }
}
