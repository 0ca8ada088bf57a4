// crates/lobby-core/tests/session_scenarios.rs
use lobby_core::{
    ConnectionId, Input, Iteration, Output, Session, SlotIndex, SlotReuse, Wakeup, MAX_HP,
};
use lobby_protocol::text_codec::{format_notice, parse_input_line};

fn conn(id: u64) -> ConnectionId {
    ConnectionId(id)
}

/// Session with `n` players joined on connections `1..=n`.
fn lobby_of(n: u64) -> Session {
    let mut session = Session::default();
    for id in 1..=n {
        session.run_iteration(Wakeup::accept(conn(id)));
    }
    session
}

fn send(session: &mut Session, id: u64, line: &str) -> Iteration {
    session.run_iteration(Wakeup::input(conn(id), parse_input_line(line)))
}

/// Everything delivered to one connection, rendered as wire text.
fn texts(iteration: &Iteration, id: u64) -> Vec<String> {
    iteration
        .outputs
        .iter()
        .filter_map(|output| match output {
            Output::Deliver { to, notice } if *to == conn(id) => Some(format_notice(notice)),
            _ => None,
        })
        .collect()
}

fn hp(session: &Session, slot: usize) -> u32 {
    session.registry().slot(SlotIndex(slot)).hp()
}

#[test]
fn three_players_join_in_order() {
    let mut session = Session::default();

    let first = session.run_iteration(Wakeup::accept(conn(1)));
    assert_eq!(
        texts(&first, 1)[0],
        "Welcome, Player 1! There are now 1 players in the lobby.\n"
    );

    session.run_iteration(Wakeup::accept(conn(2)));
    let third = session.run_iteration(Wakeup::accept(conn(3)));
    assert_eq!(
        texts(&third, 3)[0],
        "Welcome, Player 3! There are now 3 players in the lobby.\n"
    );

    assert_eq!(session.registry().player_count(), 3);
    assert_eq!(session.registry().find_by_connection(conn(2)), Some(SlotIndex(1)));
    assert_eq!(session.turn(), SlotIndex(0));
}

#[test]
fn fourth_connection_is_turned_away() {
    let mut session = lobby_of(3);

    let it = session.run_iteration(Wakeup::accept(conn(4)));

    assert_eq!(texts(&it, 4), vec!["Lobby is full. Try again later.\n"]);
    assert!(it.outputs.contains(&Output::Close(conn(4))));
    assert_eq!(session.registry().player_count(), 3);
}

#[test]
fn attack_broadcasts_and_passes_turn() {
    let mut session = lobby_of(3);

    let it = send(&mut session, 1, "cast 1 2");

    assert_eq!(hp(&session, 1), 170);
    assert_eq!(session.turn(), SlotIndex(1));
    for id in 1..=3 {
        let received = texts(&it, id);
        assert!(received.contains(&"Player 1 attacked Player 2! Target HP: 170\n".to_string()));
        assert!(received.contains(
            &"Current HP status:\nPlayer 1: 200 HP\nPlayer 2: 170 HP\nPlayer 3: 200 HP\n".to_string()
        ));
    }
}

#[test]
fn heal_adds_a_quarter_and_keeps_turn() {
    let mut session = lobby_of(3);
    session.registry_mut().slot_mut(SlotIndex(0)).set_hp(40);

    let it = send(&mut session, 1, "cast 2");

    assert_eq!(hp(&session, 0), 50);
    assert_eq!(session.turn(), SlotIndex(0));
    assert!(texts(&it, 2).contains(&"Player 1 healed themselves! HP: 50\n".to_string()));
}

#[test]
fn drain_boost_doubles_the_quarter_and_caps() {
    let mut session = lobby_of(3);
    session.registry_mut().slot_mut(SlotIndex(0)).set_hp(100);

    send(&mut session, 1, "cast 4");
    assert_eq!(hp(&session, 0), 150);
    assert_eq!(session.turn(), SlotIndex(0));

    // 150 + 2 * 37 would overshoot.
    let it = send(&mut session, 1, "cast 4");
    assert_eq!(hp(&session, 0), MAX_HP);
    assert!(texts(&it, 3)
        .contains(&"Player 1 cast spell 4 and boosted their HP! HP: 200\n".to_string()));
    assert_eq!(session.turn(), SlotIndex(0));
}

#[test]
fn self_spell_at_full_hp_is_refused_privately() {
    let mut session = lobby_of(3);

    let it = send(&mut session, 1, "cast 2");

    assert_eq!(
        texts(&it, 1),
        vec![
            "It's your turn, Player 1!\n".to_string(),
            "Player 1 has maximum HP (200). Choose another spell.\n".to_string(),
        ]
    );
    assert!(texts(&it, 2).is_empty());
    assert_eq!(session.turn(), SlotIndex(0));
}

#[test]
fn fatal_freeze_cost_eliminates_caster_without_private_notice() {
    let mut session = lobby_of(3);
    session.registry_mut().slot_mut(SlotIndex(0)).set_hp(10);

    let it = send(&mut session, 1, "cast 3 2");

    let caster = session.registry().slot(SlotIndex(0));
    assert_eq!(caster.hp(), 0);
    assert!(!caster.is_active());
    assert_eq!(session.registry().slot(SlotIndex(1)).frozen_rounds(), 2);
    assert_eq!(session.turn(), SlotIndex(1));

    let target = texts(&it, 2);
    assert!(target.contains(
        &"Player 1 froze Player 2 for 2 rounds! Player 1 is now out of HP and cannot act.\n"
            .to_string()
    ));
    assert!(!target.iter().any(|t| t.starts_with("You have been frozen")));
}

#[test]
fn surviving_freeze_caster_notifies_target() {
    let mut session = lobby_of(3);

    let it = send(&mut session, 1, "cast 3 2");

    assert_eq!(hp(&session, 0), 180);
    let target = texts(&it, 2);
    assert_eq!(
        target[0],
        "You have been frozen by Player 1 for 2 rounds! Your turn is skipped.\n"
    );
    assert!(target.contains(&"Player 1 froze Player 2 for 2 rounds! Caster HP: 180\n".to_string()));
}

#[test]
fn freezing_a_frozen_player_changes_nothing() {
    let mut session = lobby_of(3);
    session.registry_mut().slot_mut(SlotIndex(1)).set_frozen_rounds(2);

    let it = send(&mut session, 1, "cast 3 2");

    assert_eq!(hp(&session, 0), 200);
    assert_eq!(session.registry().slot(SlotIndex(1)).frozen_rounds(), 2);
    assert_eq!(session.turn(), SlotIndex(0));
    assert!(texts(&it, 3)
        .contains(&"Player 1 cannot freeze an already frozen player.\n".to_string()));
}

#[test]
fn frozen_player_is_skipped_then_thaws() {
    let mut session = lobby_of(3);

    send(&mut session, 1, "cast 3 2");
    assert_eq!(session.turn(), SlotIndex(1));

    // First skip: any input wakes the loop, and is handed back unread.
    let skipped = send(&mut session, 3, "hello");
    assert_eq!(
        texts(&skipped, 2),
        vec!["Player 2, you are frozen for 1 more round(s). Your turn is skipped.\n"]
    );
    assert_eq!(skipped.deferred, vec![(conn(3), Input::Unrecognized)]);
    assert_eq!(session.turn(), SlotIndex(2));

    let replay = session.run_iteration(Wakeup {
        accepted: None,
        ready: skipped.deferred,
    });
    assert_eq!(texts(&replay, 3), vec!["It's your turn, Player 3!\n"]);

    send(&mut session, 3, "cast 1 1");
    send(&mut session, 1, "cast 1 3");
    assert_eq!(session.turn(), SlotIndex(1));

    // Second skip: the countdown reaches zero.
    let thawed = send(&mut session, 3, "hello");
    assert_eq!(texts(&thawed, 2), vec!["Player 2, you can now act again!\n"]);
    assert_eq!(session.registry().slot(SlotIndex(1)).frozen_rounds(), 0);
    assert_eq!(session.turn(), SlotIndex(2));

    send(&mut session, 3, "cast 1 1");
    send(&mut session, 1, "cast 1 3");

    let prompt = send(&mut session, 2, "hello");
    assert_eq!(texts(&prompt, 2), vec!["It's your turn, Player 2!\n"]);
    assert!(prompt.deferred.is_empty());
}

#[test]
fn frozen_turn_holder_is_refused_in_same_iteration() {
    let mut session = lobby_of(3);

    let it = session.run_iteration(Wakeup {
        accepted: None,
        ready: vec![
            (conn(1), parse_input_line("cast 3 2")),
            (conn(2), parse_input_line("cast 1 1")),
        ],
    });

    assert!(texts(&it, 2)
        .contains(&"You are frozen and cannot cast spells this turn.\n".to_string()));
    assert_eq!(hp(&session, 0), 180);
}

#[test]
fn inputs_are_serviced_in_slot_order() {
    let mut session = lobby_of(3);

    // Player 2's command arrives first but runs after player 1's, by
    // which point it is player 2's turn.
    session.run_iteration(Wakeup {
        accepted: None,
        ready: vec![
            (conn(2), parse_input_line("cast 1 3")),
            (conn(1), parse_input_line("cast 1 2")),
        ],
    });

    assert_eq!(hp(&session, 1), 170);
    assert_eq!(hp(&session, 2), 170);
    assert_eq!(session.turn(), SlotIndex(2));
}

#[test]
fn eliminated_caster_cannot_act() {
    let mut session = lobby_of(3);
    session.registry_mut().slot_mut(SlotIndex(0)).set_hp(0);

    for line in ["cast 1 2", "cast 2", "cast 3 3", "cast 4"] {
        let it = send(&mut session, 1, line);
        assert_eq!(
            texts(&it, 1).last().map(String::as_str),
            Some("Player 1 is out of HP and cannot act.\n"),
            "{line}"
        );
        assert!(texts(&it, 2).is_empty());
        assert_eq!(session.turn(), SlotIndex(0));
        assert_eq!(hp(&session, 1), 200);
        assert_eq!(session.registry().slot(SlotIndex(2)).frozen_rounds(), 0);
    }
}

#[test]
fn attack_clamps_at_zero_and_eliminates() {
    let mut session = lobby_of(3);
    session.registry_mut().slot_mut(SlotIndex(1)).set_hp(20);

    let it = send(&mut session, 1, "cast 1 2");

    let target = session.registry().slot(SlotIndex(1));
    assert_eq!(target.hp(), 0);
    assert!(!target.is_active());
    assert!(texts(&it, 3).contains(
        &"Player 1 attacked Player 2! Player 2 is now out of HP and cannot act.\n".to_string()
    ));

    // The dead player still gets the turn, and cannot use it.
    assert_eq!(session.turn(), SlotIndex(1));
    let stuck = send(&mut session, 2, "cast 1 3");
    assert_eq!(
        texts(&stuck, 2).last().map(String::as_str),
        Some("Player 2 is out of HP and cannot act.\n")
    );
    assert_eq!(session.turn(), SlotIndex(1));
}

#[test]
fn eliminated_player_can_still_be_targeted() {
    let mut session = lobby_of(3);
    session.registry_mut().slot_mut(SlotIndex(1)).set_hp(0);

    let it = send(&mut session, 1, "cast 1 2");

    assert_eq!(hp(&session, 1), 0);
    assert_eq!(session.turn(), SlotIndex(1));
    assert!(texts(&it, 1).contains(
        &"Player 1 attacked Player 2! Player 2 is now out of HP and cannot act.\n".to_string()
    ));
}

#[test]
fn bad_targets_and_spells_are_refused() {
    let mut session = lobby_of(3);

    let cases = [
        ("cast 1 1", "Invalid target. Select a different player.\n"),
        ("cast 1 4", "Invalid target. Select a different player.\n"),
        ("cast 3", "Invalid target. Select a different player.\n"),
        ("cast 7", "Invalid spell choice.\n"),
        ("cast 0", "Invalid spell choice.\n"),
    ];
    for (line, expected) in cases {
        let it = send(&mut session, 1, line);
        assert_eq!(texts(&it, 1).last().map(String::as_str), Some(expected), "{line}");
        assert_eq!(session.turn(), SlotIndex(0));
    }

    let not_turn = send(&mut session, 2, "cast 1 3");
    assert_eq!(
        texts(&not_turn, 2).last().map(String::as_str),
        Some("It's not your turn. Please wait.\n")
    );
}

#[test]
fn reserved_spell_ids_broadcast_invalid_spell() {
    let mut session = lobby_of(3);

    let it = send(&mut session, 1, "cast 5");

    assert!(texts(&it, 2).contains(&"Invalid spell chosen.\n".to_string()));
    assert!(texts(&it, 2).iter().any(|t| t.starts_with("Current HP status:")));
    assert_eq!(session.turn(), SlotIndex(0));
}

#[test]
fn any_departure_advances_turn_by_one() {
    let mut session = lobby_of(3);

    let it = session.run_iteration(Wakeup::input(conn(3), Input::Closed));
    assert!(it.outputs.contains(&Output::Close(conn(3))));
    assert_eq!(session.turn(), SlotIndex(1));
    assert_eq!(session.registry().player_count(), 2);

    send(&mut session, 1, "exit");
    assert_eq!(session.turn(), SlotIndex(2));
    assert_eq!(session.registry().player_count(), 1);
    assert_eq!(session.registry().find_by_connection(conn(1)), None);
}

#[test]
fn turn_prompt_for_empty_slot_goes_nowhere() {
    let mut session = lobby_of(1);
    send(&mut session, 1, "exit");
    assert_eq!(session.turn(), SlotIndex(1));

    let it = session.run_iteration(Wakeup::accept(conn(2)));

    assert_eq!(session.registry().find_by_connection(conn(2)), Some(SlotIndex(0)));
    assert!(!texts(&it, 2).iter().any(|t| t.starts_with("It's your turn")));
}

#[test]
fn freed_slot_carries_over_stats_by_default() {
    let mut session = lobby_of(3);
    send(&mut session, 1, "cast 1 2");
    send(&mut session, 2, "exit");

    session.run_iteration(Wakeup::accept(conn(4)));

    assert_eq!(session.registry().find_by_connection(conn(4)), Some(SlotIndex(1)));
    assert_eq!(hp(&session, 1), 170);
}

#[test]
fn reset_policy_gives_new_player_fresh_stats() {
    let mut session = Session::new(SlotReuse::Reset);
    for id in 1..=3 {
        session.run_iteration(Wakeup::accept(conn(id)));
    }
    send(&mut session, 1, "cast 1 2");
    send(&mut session, 2, "exit");

    session.run_iteration(Wakeup::accept(conn(4)));

    assert_eq!(hp(&session, 1), MAX_HP);
    assert!(session.registry().slot(SlotIndex(1)).is_active());
}

#[test]
fn hp_stays_in_bounds_through_a_long_fight() {
    let mut session = lobby_of(3);

    // Everyone attacks the next player in turn until nobody can act.
    for _ in 0..60 {
        let turn = session.turn();
        let caster = turn.0 as u64 + 1;
        let target = (turn.0 + 1) % 3 + 1;
        send(&mut session, caster, &format!("cast 1 {target}"));

        for slot in 0..3 {
            assert!(hp(&session, slot) <= MAX_HP);
        }
    }

    let standing = session
        .registry()
        .occupied()
        .filter(|(_, player)| player.can_act())
        .count();
    assert!(standing < 3);
}
