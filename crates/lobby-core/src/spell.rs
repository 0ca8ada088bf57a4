//! Spell ids and the resolution rules that apply them.
//!
//! | id | spell        | kind      | effect                                          |
//! |----|--------------|-----------|-------------------------------------------------|
//! | 1  | Attack       | offensive | target loses 30 HP                              |
//! | 2  | Heal         | self      | caster gains `hp / 4`                           |
//! | 3  | Freeze       | offensive | target frozen 2 rounds, caster pays 20 HP       |
//! | 4  | Drain-boost  | self      | caster gains `2 * (hp / 4)`                     |
//! | 5-6| reserved     |           | "invalid spell chosen"                          |
//!
//! All HP changes clamp to `[0, MAX_HP]`. Dropping to zero eliminates.

use crate::constants::{ATTACK_DAMAGE, FREEZE_COST, FREEZE_ROUNDS, MAX_HP, MAX_SPELLS};
use crate::error::Rejection;
use crate::messages::SpellEffect;
use crate::player::SlotIndex;
use crate::registry::PlayerRegistry;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Spell {
    Attack,
    Heal,
    Freeze,
    DrainBoost,
    /// Accepted by the range check but not implemented.
    Reserved(i32),
}

impl Spell {
    /// Parse a spell id. Returns `None` outside `1..=MAX_SPELLS`.
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Spell::Attack),
            2 => Some(Spell::Heal),
            3 => Some(Spell::Freeze),
            4 => Some(Spell::DrainBoost),
            5..=MAX_SPELLS => Some(Spell::Reserved(id)),
            _ => None,
        }
    }

    pub fn id(self) -> i32 {
        match self {
            Spell::Attack => 1,
            Spell::Heal => 2,
            Spell::Freeze => 3,
            Spell::DrainBoost => 4,
            Spell::Reserved(id) => id,
        }
    }

    /// Offensive spells need a target other than the caster.
    pub fn is_offensive(self) -> bool {
        matches!(self, Spell::Attack | Spell::Freeze)
    }

    /// Whether the id alone marks a spell as offensive.
    pub fn id_is_offensive(id: i32) -> bool {
        Spell::from_id(id).is_some_and(Spell::is_offensive)
    }
}

/// A spell that passed validation and was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Broadcast outcome.
    pub effect: SpellEffect,

    /// Slot that should be told privately it was frozen.
    pub frozen_notice: Option<SlotIndex>,

    /// Whether the caster's turn ends.
    pub consumes_turn: bool,
}

impl Resolution {
    fn broadcast(effect: SpellEffect) -> Self {
        Resolution {
            effect,
            frozen_notice: None,
            consumes_turn: false,
        }
    }
}

/// Apply `spell` from `caster` to `target`.
///
/// For self spells `target` is ignored. Turn ownership and target range
/// are the dispatcher's job; this only checks what depends on combat
/// state. On `Err` nothing was changed.
pub fn resolve(
    registry: &mut PlayerRegistry,
    caster: SlotIndex,
    target: SlotIndex,
    spell: Spell,
) -> Result<Resolution, Rejection> {
    if !registry.slot(caster).can_act() {
        return Err(Rejection::OutOfHp { player: caster });
    }

    if spell.is_offensive() && caster == target {
        return Err(Rejection::SelfTarget);
    }

    match spell {
        Spell::Attack => Ok(attack(registry, caster, target)),
        Spell::Heal => {
            let hp = registry.slot(caster).hp();
            restore(registry, caster, hp / 4).map(|hp| {
                Resolution::broadcast(SpellEffect::Healed { caster, hp })
            })
        }
        Spell::Freeze => Ok(freeze(registry, caster, target)),
        Spell::DrainBoost => {
            let drain = registry.slot(caster).hp() / 4;
            restore(registry, caster, drain * 2).map(|hp| {
                Resolution::broadcast(SpellEffect::Boosted { caster, hp })
            })
        }
        Spell::Reserved(_) => Ok(Resolution::broadcast(SpellEffect::InvalidSpell)),
    }
}

fn attack(registry: &mut PlayerRegistry, caster: SlotIndex, target: SlotIndex) -> Resolution {
    let victim = registry.slot_mut(target);
    let eliminated = victim.take_damage(ATTACK_DAMAGE);

    Resolution {
        effect: SpellEffect::Attacked {
            caster,
            target,
            target_hp: victim.hp(),
            eliminated,
        },
        frozen_notice: None,
        consumes_turn: true,
    }
}

fn freeze(registry: &mut PlayerRegistry, caster: SlotIndex, target: SlotIndex) -> Resolution {
    if registry.slot(target).is_frozen() {
        return Resolution::broadcast(SpellEffect::AlreadyFrozen { caster });
    }

    registry.slot_mut(target).set_frozen_rounds(FREEZE_ROUNDS);

    let caster_slot = registry.slot_mut(caster);
    let caster_eliminated = caster_slot.take_damage(FREEZE_COST);

    Resolution {
        effect: SpellEffect::Froze {
            caster,
            target,
            rounds: FREEZE_ROUNDS,
            caster_hp: caster_slot.hp(),
            caster_eliminated,
        },
        // Only sent when the caster survives the cost.
        frozen_notice: (!caster_eliminated).then_some(target),
        consumes_turn: true,
    }
}

/// Shared guard and cap for the two self spells. Returns the new HP.
fn restore(registry: &mut PlayerRegistry, caster: SlotIndex, amount: u32) -> Result<u32, Rejection> {
    let slot = registry.slot_mut(caster);
    if slot.hp() >= MAX_HP {
        return Err(Rejection::MaxHp { player: caster });
    }

    slot.restore(amount);
    Ok(slot.hp())
}
