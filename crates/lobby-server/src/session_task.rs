//! Central session loop.
//!
//! This task owns the `Session` and every connection's outbound channel.
//! Nothing else touches lobby state, so there is no locking.
//!
//! Each pass of the loop is one wakeup:
//! - wait for at least one event, then drain whatever else is queued;
//! - take at most one new connection and at most one input per
//!   connection, leaving the rest queued in arrival order;
//! - run one session iteration and route its outputs;
//! - put any inputs the session deferred back at the front of the queue.

use std::collections::{HashMap, HashSet, VecDeque};

use lobby_core::{ConnectionId, Input, Iteration, Output, Session, SlotReuse, Wakeup};
use lobby_protocol::text_codec;
use tracing::{debug, info};

use crate::types::{Outbound, OutboundTx, SessionEvent, SessionRx};

/// A transport event waiting for its wakeup.
#[derive(Debug)]
enum Pending {
    Accept {
        connection: ConnectionId,
        outbound: OutboundTx,
    },
    Input(ConnectionId, Input),
}

impl Pending {
    fn connection(&self) -> ConnectionId {
        match self {
            Pending::Accept { connection, .. } => *connection,
            Pending::Input(connection, _) => *connection,
        }
    }
}

impl From<SessionEvent> for Pending {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::Connected {
                connection,
                peer,
                outbound,
            } => {
                debug!(connection = connection.0, %peer, "connection queued");
                Pending::Accept {
                    connection,
                    outbound,
                }
            }
            SessionEvent::Line { connection, line } => {
                Pending::Input(connection, text_codec::parse_input_line(&line))
            }
            SessionEvent::Closed { connection } => Pending::Input(connection, Input::Closed),
        }
    }
}

/// Run the central session processing loop until every sender is gone.
pub async fn run_session_loop(mut events: SessionRx, reuse: SlotReuse) {
    let mut session = Session::new(reuse);
    let mut outbound: HashMap<ConnectionId, OutboundTx> = HashMap::new();
    let mut backlog: VecDeque<Pending> = VecDeque::new();

    loop {
        if backlog.is_empty() {
            match events.recv().await {
                Some(event) => backlog.push_back(event.into()),
                None => break,
            }
        }
        while let Ok(event) = events.try_recv() {
            backlog.push_back(event.into());
        }

        let wakeup = take_wakeup(&mut backlog, &mut outbound);
        if wakeup.is_empty() {
            continue;
        }

        let Iteration { outputs, deferred } = session.run_iteration(wakeup);

        for (connection, input) in deferred.into_iter().rev() {
            backlog.push_front(Pending::Input(connection, input));
        }

        for output in outputs {
            route_output(output, &mut outbound);
        }
    }

    info!("session loop shutting down (event channel closed)");
}

/// Pull one wakeup's worth of events off the front of `backlog`.
///
/// Inputs from connections the session already released are dropped so
/// they never wake the loop.
fn take_wakeup(
    backlog: &mut VecDeque<Pending>,
    outbound: &mut HashMap<ConnectionId, OutboundTx>,
) -> Wakeup {
    let mut wakeup = Wakeup::default();
    let mut taken: HashSet<ConnectionId> = HashSet::new();
    let mut not_yet_accepted: HashSet<ConnectionId> = HashSet::new();
    let mut rest = VecDeque::with_capacity(backlog.len());

    while let Some(pending) = backlog.pop_front() {
        let connection = pending.connection();

        match pending {
            Pending::Accept {
                connection,
                outbound: tx,
            } if wakeup.accepted.is_none() => {
                outbound.insert(connection, tx);
                wakeup.accepted = Some(connection);
            }
            accept @ Pending::Accept { .. } => {
                not_yet_accepted.insert(connection);
                rest.push_back(accept);
            }
            Pending::Input(..) if not_yet_accepted.contains(&connection) => {
                rest.push_back(pending);
            }
            Pending::Input(..) if !outbound.contains_key(&connection) => {
                debug!(connection = connection.0, "dropping input from released connection");
            }
            Pending::Input(..) if taken.contains(&connection) => {
                rest.push_back(pending);
            }
            Pending::Input(connection, input) => {
                taken.insert(connection);
                wakeup.ready.push((connection, input));
            }
        }
    }

    *backlog = rest;
    wakeup
}

/// Deliver one session output.
fn route_output(output: Output, outbound: &mut HashMap<ConnectionId, OutboundTx>) {
    match output {
        Output::Deliver { to, notice } => match outbound.get(&to) {
            Some(tx) => {
                let _ = tx.send(Outbound::Text(text_codec::format_notice(&notice)));
            }
            None => debug!(connection = to.0, ?notice, "no outbound channel, notice dropped"),
        },
        Output::Close(connection) => {
            if let Some(tx) = outbound.remove(&connection) {
                let _ = tx.send(Outbound::Close);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lobby_core::Command;
    use tokio::sync::mpsc;

    fn accept(id: u64) -> (Pending, crate::types::OutboundRx) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Pending::Accept {
                connection: ConnectionId(id),
                outbound: tx,
            },
            rx,
        )
    }

    #[test]
    fn one_accept_and_one_input_per_connection() {
        let (a, _rx_a) = accept(1);
        let (b, _rx_b) = accept(2);
        let mut backlog = VecDeque::from(vec![
            a,
            Pending::Input(ConnectionId(1), Input::Unrecognized),
            Pending::Input(ConnectionId(1), Input::Command(Command::Exit)),
            b,
            Pending::Input(ConnectionId(2), Input::Unrecognized),
        ]);
        let mut outbound = HashMap::new();

        let first = take_wakeup(&mut backlog, &mut outbound);
        assert_eq!(first.accepted, Some(ConnectionId(1)));
        assert_eq!(first.ready, vec![(ConnectionId(1), Input::Unrecognized)]);
        assert_eq!(backlog.len(), 3);

        let second = take_wakeup(&mut backlog, &mut outbound);
        assert_eq!(second.accepted, Some(ConnectionId(2)));
        assert_eq!(
            second.ready,
            vec![
                (ConnectionId(1), Input::Command(Command::Exit)),
                (ConnectionId(2), Input::Unrecognized),
            ]
        );
        assert!(backlog.is_empty());
    }

    #[test]
    fn inputs_from_released_connections_are_dropped() {
        let mut backlog = VecDeque::from(vec![Pending::Input(ConnectionId(9), Input::Closed)]);
        let mut outbound = HashMap::new();

        let wakeup = take_wakeup(&mut backlog, &mut outbound);
        assert!(wakeup.is_empty());
        assert!(backlog.is_empty());
    }
}
