//! Connection lifecycle under paused virtual time.
//!
//! The read loop runs against a scripted peer. Time only advances when every
//! task is idle, so close timing is exact and reproducible.

use std::time::Duration;

use localchat_client::{CLOSE_TIMEOUT, ConnectionState, Outgoing};
use localchat_harness::{
    InvariantRegistry, ScriptedInbound, SimClient,
    scenario::{message, typing},
};
use localchat_proto::Payload;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn silent_peer_is_given_up_on_after_close_timeout() {
    let mut client = SimClient::new(10);
    let (read_loop, mut states) = client.read_loop();
    let inbound = ScriptedInbound::new().hold_open().start();

    let shutdown = client.shutdown.clone();
    let started = Instant::now();
    let (state, ()) = tokio::join!(read_loop.run(inbound, client.shutdown.clone()), async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        shutdown.trigger();
    });

    assert_eq!(state, ConnectionState::Closed);
    let waited = started.elapsed();
    assert!(waited >= Duration::from_millis(300) + CLOSE_TIMEOUT);
    assert!(waited < Duration::from_millis(300) + CLOSE_TIMEOUT + Duration::from_millis(50));

    assert_eq!(*states.borrow_and_update(), ConnectionState::Closed);
    let outgoing = client.take_outgoing();
    assert!(matches!(outgoing.as_slice(), [
        Outgoing::Payload(Payload::Authentication(_)),
        Outgoing::Close
    ]));
}

#[tokio::test(start_paused = true)]
async fn prompt_peer_ends_close_early() {
    let client = SimClient::new(11);
    let (read_loop, _states) = client.read_loop();
    let inbound = ScriptedInbound::new().wait(Duration::from_millis(400)).start();

    client.shutdown.trigger();
    let started = Instant::now();
    let state = read_loop.run(inbound, client.shutdown.clone()).await;

    assert_eq!(state, ConnectionState::Closed);
    assert!(started.elapsed() < CLOSE_TIMEOUT);
}

#[tokio::test(start_paused = true)]
async fn frames_after_close_are_dropped() {
    let client = SimClient::new(12);
    let (read_loop, _states) = client.read_loop();
    let inbound = ScriptedInbound::new()
        .payload(&Payload::Message(message("m0", "a", "before")))
        .wait(Duration::from_millis(500))
        .payload(&Payload::Message(message("m1", "a", "after")))
        .payload(&typing("a", true))
        .hold_open()
        .start();

    let shutdown = client.shutdown.clone();
    let (state, ()) = tokio::join!(read_loop.run(inbound, client.shutdown.clone()), async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.trigger();
    });

    assert_eq!(state, ConnectionState::Closed);
    assert_eq!(client.surface.rendered(), vec!["[000] 10:00 - Unknown: before"]);
    assert_eq!(client.session.message_count(), 1);
    assert!(client.session.typing_ids().is_empty());
}

#[tokio::test(start_paused = true)]
async fn read_error_ends_session_with_one_close() {
    let mut client = SimClient::new(13);
    let (read_loop, mut states) = client.read_loop();
    let inbound = ScriptedInbound::new()
        .payload(&Payload::Message(message("m0", "a", "hello")))
        .fail("connection reset")
        .start();

    let mut observed = vec![*states.borrow_and_update()];
    let state = read_loop.run(inbound, client.shutdown.clone()).await;
    observed.push(*states.borrow_and_update());

    assert_eq!(state, ConnectionState::Closed);
    let snapshot = client.snapshot(&observed);
    InvariantRegistry::standard().assert_all(&snapshot, "after read error");
    assert_eq!(snapshot.outgoing.iter().filter(|o| **o == Outgoing::Close).count(), 1);
}

#[tokio::test(start_paused = true)]
async fn peer_hang_up_releases_writer() {
    let mut client = SimClient::new(14);
    let (read_loop, _states) = client.read_loop();
    let inbound = ScriptedInbound::new().payload(&Payload::HistoryResync).start();

    let state = read_loop.run(inbound, client.shutdown.clone()).await;

    assert_eq!(state, ConnectionState::Closed);
    assert!(matches!(client.take_outgoing().as_slice(), [
        Outgoing::Payload(Payload::Authentication(_)),
        Outgoing::Payload(Payload::MessageListRequest),
        Outgoing::Close,
    ]));
}
