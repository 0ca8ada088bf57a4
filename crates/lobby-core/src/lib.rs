//! lobby-core
//!
//! Pure session engine for a small turn-based spell lobby:
//! - player slots and the fixed-size registry
//! - turn cursor with frozen-round countdown
//! - spell resolution rules
//! - the per-wakeup session driver

pub mod constants;
pub mod error;
pub mod messages;
pub mod player;
pub mod registry;
pub mod session;
pub mod spell;
pub mod turn;

pub use constants::{ATTACK_DAMAGE, FREEZE_COST, FREEZE_ROUNDS, MAX_HP, MAX_PLAYERS, MAX_SPELLS};
pub use error::{LobbyError, Rejection};

pub use messages::{Command, Input, Notice, Output, SpellEffect};

pub use player::{ConnectionId, PlayerSlot, SlotIndex};
pub use registry::{PlayerRegistry, SlotReuse};
pub use session::{Iteration, Session, Wakeup};
pub use spell::{Resolution, Spell};
pub use turn::{TurnScheduler, TurnStep};
