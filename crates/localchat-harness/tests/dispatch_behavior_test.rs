//! Dispatcher behavior against the session caches.
//!
//! Each test steps a real dispatcher through the recording collaborators
//! and checks what the user would see and what would go out on the socket.

use std::time::Duration;

use bytes::Bytes;
use localchat_client::{
    ClientAction, ClientEvent, ConnectionState, Outgoing, RenderCommand, TYPING_EXPIRY,
};
use localchat_harness::{
    InvariantRegistry, RecordingNotifier, SimClient, SurfaceCall,
    scenario::{history, message, reply, roster, typing},
};
use localchat_proto::Payload;

fn frame(payload: &Payload) -> ClientEvent {
    ClientEvent::FrameReceived(Bytes::from(payload.encode().unwrap()))
}

fn raw(text: &'static str) -> ClientEvent {
    ClientEvent::FrameReceived(Bytes::from_static(text.as_bytes()))
}

#[test]
fn history_reload_reindexes_from_zero() {
    let mut client = SimClient::new(1);
    let mut dispatcher = client.dispatcher();
    client.step(&mut dispatcher, ClientEvent::Connected).unwrap();
    client.step(&mut dispatcher, frame(&Payload::Message(message("old", "a", "stale")))).unwrap();
    client.surface.take_calls();

    let list = history(vec![
        message("m0", "a", "one"),
        message("m1", "b", "two"),
        message("m2", "me", "three"),
    ]);
    client.step(&mut dispatcher, frame(&list)).unwrap();

    let calls = client.surface.take_calls();
    assert_eq!(calls.first(), Some(&SurfaceCall::Clear));
    assert_eq!(calls.last(), Some(&SurfaceCall::ScrollToEnd));
    let indices: Vec<usize> = calls
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::Append(line) => Some(line.index),
            _ => None,
        })
        .collect();
    assert_eq!(indices, vec![0, 1, 2]);

    assert_eq!(client.session.message_count(), 3);
    assert_eq!(client.session.message_at(0).map(|m| m.db_id), Some("m0".to_string()));
    assert_eq!(client.session.message_at(3), None);

    let snapshot = client.snapshot(&[dispatcher.state()]);
    InvariantRegistry::standard().assert_all(&snapshot, "after history reload");
}

#[test]
fn roster_sync_resolves_names_before_resync() {
    let mut client = SimClient::new(2);
    let mut dispatcher = client.dispatcher();
    client.step(&mut dispatcher, ClientEvent::Connected).unwrap();
    client.take_outgoing();

    client.step(&mut dispatcher, frame(&Payload::Message(message("m0", "a", "hi")))).unwrap();
    assert_eq!(client.surface.rendered(), vec!["[000] 10:00 - Unknown: hi"]);

    let clients = roster(&[("a", "alice", "#f80"), ("me", "myself", "")]);
    let actions = client.step(&mut dispatcher, frame(&clients)).unwrap();

    // Exactly one resync, and by the time it is queued the roster is live.
    assert_eq!(actions, vec![ClientAction::Send(Payload::MessageListRequest)]);
    assert_eq!(client.session.username_for("a"), "alice");
    assert_eq!(client.take_outgoing(), vec![Outgoing::Payload(Payload::MessageListRequest)]);

    client.step(&mut dispatcher, frame(&history(vec![message("m0", "a", "hi")]))).unwrap();
    assert_eq!(client.surface.rendered(), vec!["[000] 10:00 - alice: hi"]);
    assert_eq!(client.surface.view().snapshot().lines[0].color, "#f80");
}

#[test]
fn peer_messages_notify_own_messages_do_not() {
    let mut client = SimClient::new(3);
    let mut dispatcher = client.dispatcher();
    client.step(&mut dispatcher, ClientEvent::Connected).unwrap();
    client.step(&mut dispatcher, frame(&roster(&[("a", "alice", "")]))).unwrap();

    client.step(&mut dispatcher, frame(&Payload::Message(message("m0", "a", "ping")))).unwrap();
    client.step(&mut dispatcher, frame(&Payload::Message(message("m1", "me", "pong")))).unwrap();

    assert_eq!(client.notifier.sent(), vec![(
        "message from alice".to_string(),
        "ping".to_string()
    )]);
    assert_eq!(client.session.message_count(), 2);
}

#[test]
fn typing_label_follows_indicators_and_expires() {
    let mut client = SimClient::new(4);
    let mut dispatcher = client.dispatcher();
    client.step(&mut dispatcher, ClientEvent::Connected).unwrap();
    let clients = roster(&[("a", "alice", ""), ("b", "bob", ""), ("c", "carol", "")]);
    client.step(&mut dispatcher, frame(&clients)).unwrap();

    client.step(&mut dispatcher, frame(&typing("a", true))).unwrap();
    client.env.advance(Duration::from_secs(4));
    client.step(&mut dispatcher, frame(&typing("b", true))).unwrap();
    client.step(&mut dispatcher, frame(&typing("c", true))).unwrap();
    assert_eq!(client.surface.view().snapshot().status_label, "alice, bob and carol are typing...");

    client.step(&mut dispatcher, frame(&typing("b", false))).unwrap();
    assert_eq!(client.surface.view().snapshot().status_label, "alice and carol are typing...");

    // alice started 4s before carol, so only alice has gone stale.
    client.env.advance(TYPING_EXPIRY - Duration::from_secs(2));
    assert!(client.bridge().handle_tick(&client.surface));
    assert_eq!(client.surface.view().snapshot().status_label, "carol is typing...");

    client.env.advance(Duration::from_secs(5));
    assert!(client.bridge().handle_tick(&client.surface));
    assert_eq!(client.surface.view().snapshot().status_label, "");
    assert!(!client.bridge().handle_tick(&client.surface));
}

#[test]
fn late_label_never_brings_back_an_expired_typist() {
    let mut client = SimClient::new(12);
    let mut dispatcher = client.dispatcher();
    client.step(&mut dispatcher, ClientEvent::Connected).unwrap();
    client.step(&mut dispatcher, frame(&roster(&[("a", "alice", "")]))).unwrap();

    // The read loop has decided on a label but not yet drawn it.
    let held = dispatcher.handle(frame(&typing("a", true))).unwrap();
    assert!(matches!(held.as_slice(), [ClientAction::Render(RenderCommand::SetStatusLabel(_))]));

    client.env.advance(TYPING_EXPIRY + Duration::from_secs(1));
    assert!(client.bridge().handle_tick(&client.surface));
    assert_eq!(client.surface.view().snapshot().status_label, "");

    client.execute(held);
    assert_eq!(client.surface.view().snapshot().status_label, "");

    let snapshot = client.snapshot(&[dispatcher.state()]);
    InvariantRegistry::standard().assert_all(&snapshot, "after late label");
}

#[test]
fn roster_sync_renames_current_typists() {
    let mut client = SimClient::new(13);
    let mut dispatcher = client.dispatcher();
    client.step(&mut dispatcher, ClientEvent::Connected).unwrap();
    client.step(&mut dispatcher, frame(&Payload::Message(message("m0", "a", "hi")))).unwrap();

    client.step(&mut dispatcher, frame(&typing("a", true))).unwrap();
    assert_eq!(client.surface.view().snapshot().status_label, "Unknown is typing...");

    client.step(&mut dispatcher, frame(&roster(&[("a", "alice", "")]))).unwrap();
    assert_eq!(client.surface.view().snapshot().status_label, "alice is typing...");
}

#[test]
fn bad_frames_never_stop_the_stream() {
    let mut client = SimClient::with_notifier(5, RecordingNotifier::failing("no display"));
    let mut dispatcher = client.dispatcher();
    client.step(&mut dispatcher, ClientEvent::Connected).unwrap();

    client.step(&mut dispatcher, raw("{not json")).unwrap();
    client.step(&mut dispatcher, raw(r#"{"payloadType":42}"#)).unwrap();
    client.step(&mut dispatcher, raw(r#"{"payloadType":4,"messageList":"nope"}"#)).unwrap();
    let still_here = Payload::Message(message("m0", "a", "still here"));
    client.step(&mut dispatcher, frame(&still_here)).unwrap();

    assert_eq!(dispatcher.state(), ConnectionState::Streaming);
    assert_eq!(client.session.message_count(), 1);
    assert_eq!(
        client.notifier.sent()[0],
        ("Error".to_string(), "Error parsing MessageList payload".to_string())
    );
}

#[test]
fn tag_seven_either_form_resyncs() {
    let mut client = SimClient::new(6);
    let mut dispatcher = client.dispatcher();
    client.step(&mut dispatcher, ClientEvent::Connected).unwrap();
    client.take_outgoing();

    client.step(&mut dispatcher, raw(r#"{"payloadType":7}"#)).unwrap();
    client
        .step(
            &mut dispatcher,
            raw(r#"{"payloadType":7,"reactionDbId":"r","reactionMessageId":"m0","reactionContext":"+1","reactionClientId":"a"}"#),
        )
        .unwrap();

    assert_eq!(client.take_outgoing(), vec![
        Outgoing::Payload(Payload::MessageListRequest),
        Outgoing::Payload(Payload::MessageListRequest),
    ]);
}

#[test]
fn quotes_and_reactions_render_in_blocks() {
    let mut client = SimClient::new(7);
    let mut dispatcher = client.dispatcher();
    client.step(&mut dispatcher, ClientEvent::Connected).unwrap();
    client.step(&mut dispatcher, frame(&roster(&[("a", "alice", ""), ("b", "bob", "")]))).unwrap();

    let first = message("m0", "a", "lunch?");
    let second = reply(message("m1", "b", "yes"), &first, &["👍", "🍕"]);
    client.step(&mut dispatcher, frame(&history(vec![first, second]))).unwrap();

    insta::assert_snapshot!(client.surface.rendered().join("\n"), @r"
    [000] 10:00 - alice: lunch?
                ┌ [10:00 - alice: lunch?]
    [001] 10:00 - bob: yes
                └ [ 👍 🍕 ]
    ");
}
