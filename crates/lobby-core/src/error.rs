//! Error types for the lobby session engine.
//!
//! There are no fatal errors inside a running session. Everything here is
//! either a capacity problem reported to a connection that could not join,
//! or a validation problem reported privately to the player that issued
//! the command. Neither ever changes combat state.

use thiserror::Error;

use crate::player::SlotIndex;

/// Errors surfaced by the registry and session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    /// Every slot is occupied.
    #[error("lobby is full")]
    LobbyFull,

    /// An I/O event referenced a connection that holds no slot.
    #[error("connection is not bound to any slot")]
    UnknownConnection,

    /// A command failed validation.
    #[error(transparent)]
    Rejected(#[from] Rejection),
}

/// Why a command was refused.
///
/// Each variant maps to exactly one private notice for the acting
/// player. A rejection never mutates state and never advances the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Caster has no HP left or has been eliminated.
    #[error("player {} is out of HP", .player.number())]
    OutOfHp { player: SlotIndex },

    /// Offensive spell aimed at the caster.
    #[error("offensive spell targeted at the caster")]
    SelfTarget,

    /// Target number missing, out of range, or equal to the caster.
    #[error("invalid target")]
    InvalidTarget,

    /// Self spell cast while already at maximum HP.
    #[error("player {} is already at maximum HP", .player.number())]
    MaxHp { player: SlotIndex },

    /// Someone other than the turn holder tried to act.
    #[error("not the caster's turn")]
    NotYourTurn,

    /// The turn holder is frozen.
    #[error("caster is frozen")]
    Frozen,

    /// Spell id outside `1..=MAX_SPELLS`.
    #[error("spell id out of range")]
    InvalidSpellChoice,
}
