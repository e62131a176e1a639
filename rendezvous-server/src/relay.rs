use std::{fmt::Display, sync::Arc};

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use crossbeam::atomic::AtomicCell;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use log::{info, warn};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

static NEXT_PEER_ID: AtomicCell<u64> = AtomicCell::new(1);

/// Identifies one relay connection for as long as the process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(u64);

impl PeerId {
    fn next() -> Self {
        Self(NEXT_PEER_ID.fetch_add(1))
    }
}

impl Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fans every message from one connected peer out to all the others.
///
/// Nothing is kept between messages and nothing here touches the engine.
#[derive(Default)]
pub struct Relay {
    peers: DashMap<PeerId, Peer>,
}

pub struct Peer {
    outgoing: UnboundedSender<Message>,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a peer, returning the receiving end of its outgoing messages
    pub fn connect(&self) -> (PeerId, UnboundedReceiver<Message>) {
        let (outgoing, receiver) = unbounded_channel();
        let id = PeerId::next();

        self.peers.insert(id, Peer { outgoing });
        (id, receiver)
    }

    pub fn disconnect(&self, id: PeerId) {
        self.peers.remove(&id);
    }

    /// Sends the message to every peer except the sender, returning how many it reached
    pub fn broadcast(&self, from: PeerId, message: &Message) -> usize {
        self.peers
            .iter()
            .filter(|peer| *peer.key() != from)
            .filter(|peer| peer.outgoing.send(message.clone()).is_ok())
            .count()
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    async fn serve(self: Arc<Self>, socket: WebSocket) {
        let (id, mut outgoing) = self.connect();
        let (mut sink, mut stream) = socket.split();

        info!("Peer {} joined the relay ({} connected)", id, self.peer_count());

        let writer = tokio::spawn(async move {
            while let Some(message) = outgoing.recv().await {
                if sink.send(message).await.is_err() {
                    break;
                }
            }
        });

        while let Some(incoming) = stream.next().await {
            match incoming {
                Ok(message @ (Message::Text(_) | Message::Binary(_))) => {
                    self.broadcast(id, &message);
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(error) => {
                    warn!("Relay peer {} errored: {}", id, error);
                    break;
                }
            }
        }

        self.disconnect(id);
        writer.abort();

        info!("Peer {} left the relay", id);
    }
}

pub(crate) async fn relay(ws: WebSocketUpgrade, State(relay): State<Arc<Relay>>) -> Response {
    ws.on_upgrade(move |socket| relay.serve(socket))
}

#[cfg(test)]
mod test {
    use axum::extract::ws::Message;

    use super::Relay;

    #[test]
    fn messages_reach_everyone_but_the_sender() {
        let relay = Relay::new();

        let (alice, mut alice_rx) = relay.connect();
        let (_bob, mut bob_rx) = relay.connect();
        let (_carol, mut carol_rx) = relay.connect();

        let reached = relay.broadcast(alice, &Message::Text("hello".to_string()));

        assert_eq!(reached, 2);
        assert_eq!(bob_rx.try_recv().unwrap(), Message::Text("hello".to_string()));
        assert_eq!(carol_rx.try_recv().unwrap(), Message::Text("hello".to_string()));
        assert!(alice_rx.try_recv().is_err());
    }

    #[test]
    fn every_connection_gets_its_own_id() {
        let relay = Relay::new();

        let (first, _first_rx) = relay.connect();
        let (second, _second_rx) = relay.connect();

        assert_ne!(first, second);
        assert_eq!(relay.peer_count(), 2);
    }

    #[test]
    fn disconnected_peers_stop_receiving() {
        let relay = Relay::new();

        let (alice, _alice_rx) = relay.connect();
        let (bob, mut bob_rx) = relay.connect();

        relay.disconnect(bob);

        assert_eq!(relay.broadcast(alice, &Message::Binary(vec![1, 2, 3])), 0);
        assert_eq!(relay.peer_count(), 1);
        assert!(bob_rx.try_recv().is_err());
    }
}
