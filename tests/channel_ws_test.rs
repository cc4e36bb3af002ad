//! End-to-end tests: a real `RoomChannel` against a stub WebSocket server.
//!
//! The stub is a miniature of the platform's event-stream endpoint: it
//! records every decoded client request, pushes canned server events, and
//! can drop a connection on demand to simulate transport loss.

#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;

use courtside_channel::channel::{RoomChannel, RoomEvents};
use courtside_channel::config::ChannelConfig;
use courtside_channel::domain::{ChatMessage, LikeUpdate, MessageId, RoomId, UserId};
use courtside_channel::ws::messages::{ClientRequest, ServerEvent};

/// Shared state of the stub server.
#[derive(Clone)]
struct StubState {
    /// Decoded requests from every connection, in arrival order.
    inbound: mpsc::UnboundedSender<ClientRequest>,
    /// Frames to push to whoever is currently connected.
    push: broadcast::Sender<String>,
    /// Fired to drop the current connection.
    kick: broadcast::Sender<()>,
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<StubState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_stub_connection(socket, state))
}

async fn run_stub_connection(socket: WebSocket, state: StubState) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut push_rx = state.push.subscribe();
    let mut kick_rx = state.kick.subscribe();

    loop {
        tokio::select! {
            msg = ws_rx.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    if let Ok(request) = serde_json::from_str::<ClientRequest>(&text) {
                        let _ = state.inbound.send(request);
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            },
            frame = push_rx.recv() => {
                if let Ok(text) = frame {
                    if ws_tx.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
            },
            _ = kick_rx.recv() => break,
        }
    }
}

struct Stub {
    addr: SocketAddr,
    inbound: mpsc::UnboundedReceiver<ClientRequest>,
    push: broadcast::Sender<String>,
    kick: broadcast::Sender<()>,
}

async fn start_stub() -> Stub {
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (push_tx, _) = broadcast::channel(64);
    let (kick_tx, _) = broadcast::channel(4);

    let state = StubState {
        inbound: inbound_tx,
        push: push_tx.clone(),
        kick: kick_tx.clone(),
    };
    let app = Router::new().route("/ws", get(ws_handler)).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Stub {
        addr,
        inbound: inbound_rx,
        push: push_tx,
        kick: kick_tx,
    }
}

/// What the subscriber saw, forwarded on a channel so tests can await it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Recorded {
    Message(ChatMessage),
    Like(LikeUpdate),
    Count(u32),
}

struct Forwarder(mpsc::UnboundedSender<Recorded>);

impl RoomEvents for Forwarder {
    fn on_message(&self, message: ChatMessage) {
        let _ = self.0.send(Recorded::Message(message));
    }
    fn on_like(&self, update: LikeUpdate) {
        let _ = self.0.send(Recorded::Like(update));
    }
    fn on_user_count(&self, count: u32) {
        let _ = self.0.send(Recorded::Count(count));
    }
}

fn test_config(addr: SocketAddr) -> ChannelConfig {
    let mut config = ChannelConfig::new(format!("ws://{addr}/ws"));
    // Keep reconnects snappy for the test suite.
    config.initial_backoff_ms = 50;
    config.max_backoff_ms = 200;
    config
}

fn open_channel(
    addr: SocketAddr,
    room: Option<i64>,
) -> (RoomChannel, mpsc::UnboundedReceiver<Recorded>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let channel = RoomChannel::connect(
        &test_config(addr),
        Arc::new(Forwarder(tx)),
        room.map(RoomId::new),
    )
    .expect("channel should open");
    (channel, rx)
}

async fn next_request(stub: &mut Stub) -> ClientRequest {
    timeout(Duration::from_secs(5), stub.inbound.recv())
        .await
        .expect("timed out waiting for a client request")
        .expect("stub server closed")
}

async fn next_recorded(rx: &mut mpsc::UnboundedReceiver<Recorded>) -> Recorded {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a subscriber callback")
        .expect("channel closed")
}

/// Polls until `predicate` holds, failing the test after five seconds.
async fn wait_until(mut predicate: impl FnMut() -> bool) {
    timeout(Duration::from_secs(5), async {
        while !predicate() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

fn join(room: i64) -> ClientRequest {
    ClientRequest::JoinRoom {
        room_id: RoomId::new(room),
    }
}

fn chat_frame(room: i64, body: &str) -> String {
    let message = ChatMessage {
        id: MessageId::new(),
        room_id: RoomId::new(room),
        author: "Dana".to_string(),
        body: body.to_string(),
        timestamp: Utc::now(),
    };
    serde_json::to_string(&ServerEvent::ChatMessage(message)).unwrap()
}

#[tokio::test]
async fn joins_the_initial_room_on_connect() {
    let mut stub = start_stub().await;
    let (channel, _events) = open_channel(stub.addr, Some(7));

    assert_eq!(next_request(&mut stub).await, join(7));
    wait_until(|| channel.is_connected()).await;
}

#[tokio::test]
async fn delivers_room_events_to_the_subscriber() {
    let mut stub = start_stub().await;
    let (_channel, mut events) = open_channel(stub.addr, Some(7));

    // The join confirms the connection is fully up before we push.
    assert_eq!(next_request(&mut stub).await, join(7));

    let _ = stub.push.send(chat_frame(7, "Go team!"));
    let Recorded::Message(message) = next_recorded(&mut events).await else {
        panic!("expected a chat message first");
    };
    assert_eq!(message.body, "Go team!");
    assert_eq!(message.room_id, RoomId::new(7));

    let liker = UserId::new();
    let like = ServerEvent::LikeUpdate(LikeUpdate {
        message_id: message.id,
        liker_ids: vec![liker],
    });
    let _ = stub.push.send(serde_json::to_string(&like).unwrap());
    let Recorded::Like(update) = next_recorded(&mut events).await else {
        panic!("expected a like update");
    };
    assert_eq!(update.liker_ids, vec![liker]);

    let count = ServerEvent::ParticipantCount {
        anonymous: 3,
        member: 5,
    };
    let _ = stub.push.send(serde_json::to_string(&count).unwrap());
    assert_eq!(next_recorded(&mut events).await, Recorded::Count(8));
}

#[tokio::test]
async fn room_switch_sends_leave_then_join_on_the_wire() {
    let mut stub = start_stub().await;
    let (channel, _events) = open_channel(stub.addr, Some(7));

    assert_eq!(next_request(&mut stub).await, join(7));

    channel.set_target_room(Some(RoomId::new(12)));
    assert_eq!(next_request(&mut stub).await, ClientRequest::LeaveRoom);
    assert_eq!(next_request(&mut stub).await, join(12));
}

#[tokio::test]
async fn rejoins_the_current_room_after_a_reconnect() {
    let mut stub = start_stub().await;
    let (channel, _events) = open_channel(stub.addr, Some(7));

    assert_eq!(next_request(&mut stub).await, join(7));
    wait_until(|| channel.is_connected()).await;

    // Drop the connection server-side; the transport reconnects on its own.
    let _ = stub.kick.send(());
    wait_until(|| !channel.is_connected()).await;
    wait_until(|| channel.is_connected()).await;

    // Membership is re-established with a plain join; the server dropped
    // the old membership with the connection, so no leave precedes it.
    assert_eq!(next_request(&mut stub).await, join(7));
}

#[tokio::test]
async fn close_drops_the_flag_and_silences_callbacks() {
    let mut stub = start_stub().await;
    let (channel, mut events) = open_channel(stub.addr, Some(7));

    assert_eq!(next_request(&mut stub).await, join(7));
    wait_until(|| channel.is_connected()).await;

    channel.close();
    wait_until(|| !channel.is_connected()).await;

    // Frames pushed after teardown must never reach the subscriber.
    let _ = stub.push.send(chat_frame(7, "after close"));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(events.try_recv().is_err());
}
