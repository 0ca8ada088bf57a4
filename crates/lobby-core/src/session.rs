//! Session driver: one call per event-loop wakeup.
//!
//! Each [`Session::run_iteration`] does, in order:
//! 1. bind the accepted connection, if there is one (or refuse it);
//! 2. run the turn scheduler's frozen check;
//! 3. if the turn holder was frozen, stop and hand every input back;
//! 4. otherwise prompt the turn holder and handle one input per
//!    connection, in ascending slot order.
//!
//! All state lives here and is only touched from inside an iteration,
//! so the caller must serialize calls (one owner, no locks).

use tracing::{debug, info};

use crate::constants::FREEZE_ROUNDS;
use crate::error::{LobbyError, Rejection};
use crate::messages::{Command, Input, Notice, Output};
use crate::player::{ConnectionId, SlotIndex};
use crate::registry::{PlayerRegistry, SlotReuse};
use crate::spell::{self, Spell};
use crate::turn::{TurnScheduler, TurnStep};

/// Everything that became ready during one wait.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wakeup {
    /// A newly accepted connection. At most one per wakeup.
    pub accepted: Option<ConnectionId>,

    /// At most one input per connection.
    pub ready: Vec<(ConnectionId, Input)>,
}

impl Wakeup {
    pub fn accept(connection: ConnectionId) -> Self {
        Wakeup {
            accepted: Some(connection),
            ready: Vec::new(),
        }
    }

    pub fn input(connection: ConnectionId, input: Input) -> Self {
        Wakeup {
            accepted: None,
            ready: vec![(connection, input)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_none() && self.ready.is_empty()
    }
}

/// What one iteration produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Iteration {
    /// Deliveries and closes, in the order they happened.
    pub outputs: Vec<Output>,

    /// Inputs left unread because the turn holder was frozen. The caller
    /// should replay them on the next iteration.
    pub deferred: Vec<(ConnectionId, Input)>,
}

/// The single lobby.
#[derive(Debug, Clone, Default)]
pub struct Session {
    registry: PlayerRegistry,
    scheduler: TurnScheduler,
}

impl Session {
    pub fn new(reuse: SlotReuse) -> Self {
        Session {
            registry: PlayerRegistry::new(reuse),
            scheduler: TurnScheduler::new(),
        }
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Direct access for setup and admin tooling.
    pub fn registry_mut(&mut self) -> &mut PlayerRegistry {
        &mut self.registry
    }

    /// Slot whose turn it is.
    pub fn turn(&self) -> SlotIndex {
        self.scheduler.current()
    }

    /// Run one event-loop iteration.
    pub fn run_iteration(&mut self, wakeup: Wakeup) -> Iteration {
        let mut out = Vec::new();

        if let Some(connection) = wakeup.accepted {
            self.accept(connection, &mut out);
        }

        match self.scheduler.step(&mut self.registry) {
            TurnStep::Skipped { slot, remaining } => {
                let notice = if remaining > 0 {
                    Notice::StillFrozen { player: slot, remaining }
                } else {
                    Notice::Thawed { player: slot }
                };
                debug!(player = slot.number(), remaining, "frozen turn skipped");
                self.send_to_slot(slot, notice, &mut out);

                return Iteration {
                    outputs: out,
                    deferred: wakeup.ready,
                };
            }
            TurnStep::Ready { slot } => {
                self.send_to_slot(slot, Notice::YourTurn { player: slot }, &mut out);
            }
        }

        let mut ready: Vec<(SlotIndex, ConnectionId, Input)> = wakeup
            .ready
            .into_iter()
            .filter_map(|(connection, input)| {
                self.registry
                    .find_by_connection(connection)
                    .map(|slot| (slot, connection, input))
            })
            .collect();
        ready.sort_by_key(|(slot, _, _)| *slot);

        for (slot, connection, input) in ready {
            self.handle_input(slot, connection, input, &mut out);
        }

        Iteration {
            outputs: out,
            deferred: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    fn accept(&mut self, connection: ConnectionId, out: &mut Vec<Output>) {
        match self.registry.join(connection) {
            Ok(slot) => {
                let player_count = self.registry.player_count();
                info!(player = slot.number(), player_count, "player joined the lobby");
                out.push(Output::deliver(
                    connection,
                    Notice::Welcome {
                        player: slot,
                        player_count,
                    },
                ));
                out.push(Output::deliver(connection, Notice::Instructions));
            }
            Err(err) => {
                info!(connection = connection.0, %err, "rejecting connection");
                out.push(Output::deliver(connection, Notice::LobbyFull));
                out.push(Output::Close(connection));
            }
        }
    }

    /// Free a slot and pass the turn on. Any departure advances the turn
    /// by exactly one, whoever held it.
    fn depart(&mut self, slot: SlotIndex, out: &mut Vec<Output>) -> Result<(), LobbyError> {
        let connection = self
            .registry
            .leave(slot)
            .ok_or(LobbyError::UnknownConnection)?;

        info!(
            player = slot.number(),
            remaining = self.registry.player_count(),
            "player left the lobby"
        );
        out.push(Output::Close(connection));
        self.scheduler.advance();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    fn handle_input(
        &mut self,
        slot: SlotIndex,
        connection: ConnectionId,
        input: Input,
        out: &mut Vec<Output>,
    ) {
        match input {
            Input::Closed | Input::Command(Command::Exit) => {
                if let Err(err) = self.depart(slot, out) {
                    debug!(player = slot.number(), %err, "departure ignored");
                }
            }
            Input::Command(Command::Cast { spell_id, target }) => {
                if let Err(rejection) = self.cast(slot, spell_id, target, out) {
                    debug!(player = slot.number(), spell_id, %rejection, "cast rejected");
                    out.push(Output::deliver(connection, Notice::Rejected(rejection)));
                }
            }
            Input::Unrecognized => {}
        }
    }

    /// Validate a cast command, resolve it and publish the result.
    fn cast(
        &mut self,
        caster: SlotIndex,
        spell_id: i32,
        target: Option<i32>,
        out: &mut Vec<Output>,
    ) -> Result<(), Rejection> {
        let target = if Spell::id_is_offensive(spell_id) {
            self.target_slot(caster, target)?
        } else {
            caster
        };

        let spell = Spell::from_id(spell_id).ok_or(Rejection::InvalidSpellChoice)?;

        if !self.scheduler.is_turn_of(caster) {
            return Err(Rejection::NotYourTurn);
        }
        if self.registry.slot(caster).is_frozen() {
            return Err(Rejection::Frozen);
        }

        let resolution = spell::resolve(&mut self.registry, caster, target, spell)?;
        debug!(
            caster = caster.number(),
            spell = spell.id(),
            effect = ?resolution.effect,
            "cast resolved"
        );

        if let Some(frozen) = resolution.frozen_notice {
            self.send_to_slot(
                frozen,
                Notice::FrozenBy {
                    caster,
                    rounds: FREEZE_ROUNDS,
                },
                out,
            );
        }
        self.broadcast(Notice::Outcome(resolution.effect), out);
        self.broadcast(self.hp_status(), out);

        if resolution.consumes_turn {
            self.scheduler.advance();
        }
        Ok(())
    }

    /// Turn a 1-based target number into a slot, checked against the
    /// current player count.
    fn target_slot(&self, caster: SlotIndex, target: Option<i32>) -> Result<SlotIndex, Rejection> {
        let index = target
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| usize::try_from(index).ok())
            .ok_or(Rejection::InvalidTarget)?;

        if index >= self.registry.player_count() || index == caster.0 {
            return Err(Rejection::InvalidTarget);
        }
        Ok(SlotIndex(index))
    }

    // -------------------------------------------------------------------------
    // Delivery helpers
    // -------------------------------------------------------------------------

    fn hp_status(&self) -> Notice {
        Notice::HpStatus(
            self.registry
                .occupied()
                .map(|(slot, player)| (slot, player.hp()))
                .collect(),
        )
    }

    /// Send to whoever holds `slot` right now. Empty slots swallow it.
    fn send_to_slot(&self, slot: SlotIndex, notice: Notice, out: &mut Vec<Output>) {
        match self.registry.connection(slot) {
            Some(connection) => out.push(Output::deliver(connection, notice)),
            None => debug!(player = slot.number(), ?notice, "notice for empty slot dropped"),
        }
    }

    fn broadcast(&self, notice: Notice, out: &mut Vec<Output>) {
        for connection in self.registry.connections() {
            out.push(Output::deliver(connection, notice.clone()));
        }
    }
}
