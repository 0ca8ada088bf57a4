//! Fixed capacity and combat constants.

/// Number of player slots in the lobby. Slots are never added or removed.
pub const MAX_PLAYERS: usize = 3;

/// Starting and maximum HP.
pub const MAX_HP: u32 = 200;

/// Highest spell id accepted by the range check. Only 1 through 4 have
/// an effect; 5 and 6 resolve to an "invalid spell" outcome.
pub const MAX_SPELLS: i32 = 6;

/// Damage dealt by an attack.
pub const ATTACK_DAMAGE: u32 = 30;

/// Rounds a frozen player is skipped for.
pub const FREEZE_ROUNDS: u32 = 2;

/// HP the caster pays to freeze someone.
pub const FREEZE_COST: u32 = 20;
