//! Message types used by the session engine.
//!
//! These are **transport-agnostic** logical messages:
//! - [`Command`]: what a player asks for.
//! - [`Notice`]: what a player is told.
//! - [`Output`]: a notice addressed to a connection, or a request to
//!   close one.
//!
//! Text rendering lives in the `lobby-protocol` crate; this module is
//! purely logical.

use crate::error::Rejection;
use crate::player::{ConnectionId, SlotIndex};

/// A parsed player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `cast <spell_id> [<target_number>]`.
    ///
    /// Both numbers are carried exactly as typed; `target` is 1-based.
    /// Range checks happen in the session, not the parser.
    Cast { spell_id: i32, target: Option<i32> },

    /// Voluntary disconnect.
    Exit,
}

/// One unit of input from a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A recognized command.
    Command(Command),

    /// A line that is not a command. Ignored, but it still wakes the loop.
    Unrecognized,

    /// Peer closed the connection.
    Closed,
}

/// The visible result of a resolved spell, broadcast to every player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpellEffect {
    Attacked {
        caster: SlotIndex,
        target: SlotIndex,
        target_hp: u32,
        eliminated: bool,
    },
    Healed {
        caster: SlotIndex,
        hp: u32,
    },
    Froze {
        caster: SlotIndex,
        target: SlotIndex,
        rounds: u32,
        caster_hp: u32,
        caster_eliminated: bool,
    },
    AlreadyFrozen {
        caster: SlotIndex,
    },
    Boosted {
        caster: SlotIndex,
        hp: u32,
    },
    /// Spell id in range but without an effect.
    InvalidSpell,
}

/// Everything the engine can tell a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Private greeting after a successful join.
    Welcome { player: SlotIndex, player_count: usize },

    /// Spell syntax help, sent once after the welcome.
    Instructions,

    /// Sent to a connection that could not join.
    LobbyFull,

    /// Turn prompt for the turn holder.
    YourTurn { player: SlotIndex },

    /// Frozen turn holder was skipped and still has rounds left.
    StillFrozen { player: SlotIndex, remaining: u32 },

    /// Frozen turn holder was skipped for the last time.
    Thawed { player: SlotIndex },

    /// Private notice to a freshly frozen target.
    FrozenBy { caster: SlotIndex, rounds: u32 },

    /// Broadcast outcome of a cast.
    Outcome(SpellEffect),

    /// Broadcast HP table, one entry per occupied slot.
    HpStatus(Vec<(SlotIndex, u32)>),

    /// Private refusal of a command.
    Rejected(Rejection),
}

/// An instruction for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Deliver { to: ConnectionId, notice: Notice },
    Close(ConnectionId),
}

impl Output {
    pub fn deliver(to: ConnectionId, notice: Notice) -> Self {
        Output::Deliver { to, notice }
    }
}
