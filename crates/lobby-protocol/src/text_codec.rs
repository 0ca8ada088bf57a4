// crates/lobby-protocol/src/text_codec.rs

//! Plain-text line codec.
//!
//! Input format (line → [`Input`]):
//!
//! - Cast:
//!   `cast <spell_id> [<target_number>]`
//!
//! - Exit:
//!   `exit`
//!
//! Anything else is [`Input::Unrecognized`]. The line must start with the
//! literal `"cast "`; matching is case-sensitive.
//!
//! Output format ([`Notice`] → text): every notice renders to one or more
//! newline-terminated lines, exactly as players see them.

use std::fmt::Write;

use lobby_core::{Command, Input, Notice, Rejection, SpellEffect, MAX_HP};

const CAST_PREFIX: &str = "cast ";

/// Spell syntax help sent after the welcome line.
pub const INSTRUCTIONS: &str = concat!(
    "Welcome! Here’s how to cast spells:\n",
    " - Spell 1: Attack a target for 30 damage. Syntax: 'cast 1 [target_id]'\n",
    " - Spell 2: Heal yourself by a quarter of your current HP. Syntax: 'cast 2'\n",
    " - Spell 3: Freeze a target for 2 rounds, costing 20 HP. Syntax: 'cast 3 [target_id]'\n",
    " - Spell 4: Boost your HP based on half your HP drain. Syntax: 'cast 4'\n",
    "Wait for your turn and follow the syntax above. Good luck!\n",
);

/// Parse one inbound line. Trailing whitespace (`\r\n`) is ignored.
pub fn parse_input_line(line: &str) -> Input {
    let line = line.trim_end();

    if line == "exit" {
        return Input::Command(Command::Exit);
    }

    match line.strip_prefix(CAST_PREFIX) {
        Some(args) => Input::Command(parse_cast(args)),
        None => Input::Unrecognized,
    }
}

/// `<spell_id> [<target_number>]`.
///
/// The spell id is the leading integer of the arguments; garbage parses
/// as `0`, which the session rejects as out of range. The target is only
/// read when the spell id itself was a clean integer.
fn parse_cast(args: &str) -> Command {
    let mut tokens = args.split_whitespace();

    let first = tokens.next().unwrap_or("");
    let spell_id = leading_int(first).unwrap_or(0);

    let target = if first.parse::<i32>().is_ok() {
        tokens.next().and_then(leading_int)
    } else {
        None
    };

    Command::Cast { spell_id, target }
}

/// Parse the longest `[+-]digits` prefix of `s`.
fn leading_int(s: &str) -> Option<i32> {
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '+' || c == '-'))))
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    s[..end].parse().ok()
}

/// Render a notice as the exact text sent to the player.
pub fn format_notice(notice: &Notice) -> String {
    match notice {
        Notice::Welcome {
            player,
            player_count,
        } => format!(
            "Welcome, Player {}! There are now {} players in the lobby.\n",
            player.number(),
            player_count
        ),
        Notice::Instructions => INSTRUCTIONS.to_string(),
        Notice::LobbyFull => "Lobby is full. Try again later.\n".to_string(),
        Notice::YourTurn { player } => format!("It's your turn, Player {}!\n", player.number()),
        Notice::StillFrozen { player, remaining } => format!(
            "Player {}, you are frozen for {} more round(s). Your turn is skipped.\n",
            player.number(),
            remaining
        ),
        Notice::Thawed { player } => {
            format!("Player {}, you can now act again!\n", player.number())
        }
        Notice::FrozenBy { caster, rounds } => format!(
            "You have been frozen by Player {} for {} rounds! Your turn is skipped.\n",
            caster.number(),
            rounds
        ),
        Notice::Outcome(effect) => format_effect(effect),
        Notice::HpStatus(entries) => {
            let mut text = String::from("Current HP status:\n");
            for (slot, hp) in entries {
                let _ = writeln!(text, "Player {}: {} HP", slot.number(), hp);
            }
            text
        }
        Notice::Rejected(rejection) => format_rejection(rejection),
    }
}

fn format_effect(effect: &SpellEffect) -> String {
    match effect {
        SpellEffect::Attacked {
            caster,
            target,
            eliminated: true,
            ..
        } => format!(
            "Player {} attacked Player {}! Player {} is now out of HP and cannot act.\n",
            caster.number(),
            target.number(),
            target.number()
        ),
        SpellEffect::Attacked {
            caster,
            target,
            target_hp,
            ..
        } => format!(
            "Player {} attacked Player {}! Target HP: {}\n",
            caster.number(),
            target.number(),
            target_hp
        ),
        SpellEffect::Healed { caster, hp } => {
            format!("Player {} healed themselves! HP: {}\n", caster.number(), hp)
        }
        SpellEffect::Froze {
            caster,
            target,
            rounds,
            caster_eliminated: true,
            ..
        } => format!(
            "Player {} froze Player {} for {} rounds! Player {} is now out of HP and cannot act.\n",
            caster.number(),
            target.number(),
            rounds,
            caster.number()
        ),
        SpellEffect::Froze {
            caster,
            target,
            rounds,
            caster_hp,
            ..
        } => format!(
            "Player {} froze Player {} for {} rounds! Caster HP: {}\n",
            caster.number(),
            target.number(),
            rounds,
            caster_hp
        ),
        SpellEffect::AlreadyFrozen { caster } => format!(
            "Player {} cannot freeze an already frozen player.\n",
            caster.number()
        ),
        SpellEffect::Boosted { caster, hp } => format!(
            "Player {} cast spell 4 and boosted their HP! HP: {}\n",
            caster.number(),
            hp
        ),
        SpellEffect::InvalidSpell => "Invalid spell chosen.\n".to_string(),
    }
}

fn format_rejection(rejection: &Rejection) -> String {
    match rejection {
        Rejection::OutOfHp { player } => {
            format!("Player {} is out of HP and cannot act.\n", player.number())
        }
        Rejection::SelfTarget => {
            "You cannot cast this spell on yourself. Please choose another target.\n".to_string()
        }
        Rejection::InvalidTarget => "Invalid target. Select a different player.\n".to_string(),
        Rejection::MaxHp { player } => format!(
            "Player {} has maximum HP ({}). Choose another spell.\n",
            player.number(),
            MAX_HP
        ),
        Rejection::NotYourTurn => "It's not your turn. Please wait.\n".to_string(),
        Rejection::Frozen => "You are frozen and cannot cast spells this turn.\n".to_string(),
        Rejection::InvalidSpellChoice => "Invalid spell choice.\n".to_string(),
    }
}
