//! The viewer's connection task against a live server

use std::{sync::Arc, time::Duration};

use tokio::{sync::mpsc, time::timeout};

use speech_timer::{
    api::create_router,
    client::connection::{run_connection, ConnectionEvent},
    clock::SystemClock,
    protocol::{ClientAction, ServerMessage},
    state::{AppState, Phase, TimerSettings},
};

async fn next_event(events: &mut mpsc::Receiver<ConnectionEvent>) -> ConnectionEvent {
    timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for connection event")
        .expect("connection task ended")
}

#[tokio::test]
async fn forwards_state_and_actions() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(AppState::new(addr.port(), "127.0.0.1".to_string(), Arc::new(SystemClock)));
    let app = create_router(state, None);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let (event_tx, mut event_rx) = mpsc::channel(8);
    let (action_tx, action_rx) = mpsc::channel(8);
    let task = tokio::spawn(run_connection(
        format!("ws://{}/ws", addr),
        Duration::from_millis(50),
        event_tx,
        action_rx,
    ));

    assert_eq!(next_event(&mut event_rx).await, ConnectionEvent::Connected);
    let ConnectionEvent::State(ServerMessage::State { state: initial, .. }) = next_event(&mut event_rx).await else {
        panic!("expected initial state");
    };
    assert_eq!(initial.phase, Phase::Template);

    action_tx.send(ClientAction::start(TimerSettings::new(0, 0, 0, 30))).await.unwrap();
    let ConnectionEvent::State(ServerMessage::State { state: running, .. }) = next_event(&mut event_rx).await else {
        panic!("expected echoed state");
    };
    assert_eq!(running.phase, Phase::Running);
    assert_eq!(running.settings.bell, 30);

    drop(action_tx);
    timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
}

#[tokio::test]
async fn keeps_retrying_when_server_is_unreachable() {
    // Grab a free port and release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (event_tx, mut event_rx) = mpsc::channel(8);
    let (action_tx, action_rx) = mpsc::channel(8);
    let task = tokio::spawn(run_connection(
        format!("ws://{}/ws", addr),
        Duration::from_millis(20),
        event_tx,
        action_rx,
    ));

    assert_eq!(next_event(&mut event_rx).await, ConnectionEvent::Disconnected);
    assert_eq!(next_event(&mut event_rx).await, ConnectionEvent::Disconnected);

    // Actions issued while disconnected are dropped, not queued
    action_tx.send(ClientAction::Reset).await.unwrap();

    drop(action_tx);
    drop(event_rx);
    timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
}
