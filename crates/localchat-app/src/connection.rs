//! Connection lifecycle: the read loop.
//!
//! [`ReadLoop`] owns the [`Dispatcher`] and runs it against the inbound
//! channel until the session ends. It is the only place inbound frames are
//! processed, so they are handled strictly in arrival order.
//!
//! Closing is bounded: once a shutdown is requested the loop sends a close
//! frame and waits at most [`CLOSE_TIMEOUT`] for the peer to hang up.

use std::sync::Arc;

use localchat_client::{
    CLOSE_TIMEOUT, ClientAction, ClientEvent, ConnectionState, Dispatcher, Environment, Inbound,
    Outbox, RenderCommand,
};
use tokio::{
    sync::{Notify, watch},
    time::Instant,
};

use crate::{Notifier, Surface, apply_render, publish_typing_label};

/// Shutdown request shared by the UI loop and signal handlers.
///
/// Triggering before the read loop starts waiting is not lost.
#[derive(Debug, Clone, Default)]
pub struct Shutdown(Arc<Notify>);

impl Shutdown {
    /// Create an untriggered shutdown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the read loop to close the connection.
    pub fn trigger(&self) {
        self.0.notify_one();
    }

    async fn requested(&self) {
        self.0.notified().await;
    }
}

/// Drives one connection from handshake to close.
pub struct ReadLoop<E, S, N>
where
    E: Environment,
    S: Surface,
    N: Notifier,
{
    dispatcher: Dispatcher<E>,
    surface: S,
    notifier: N,
    outbox: Outbox,
    state: watch::Sender<ConnectionState>,
}

impl<E, S, N> ReadLoop<E, S, N>
where
    E: Environment,
    S: Surface,
    N: Notifier,
{
    /// Create a read loop. Returns the loop and a receiver that observes its
    /// lifecycle state.
    pub fn new(
        dispatcher: Dispatcher<E>,
        surface: S,
        notifier: N,
        outbox: Outbox,
    ) -> (Self, watch::Receiver<ConnectionState>) {
        let (state, state_rx) = watch::channel(dispatcher.state());
        (Self { dispatcher, surface, notifier, outbox, state }, state_rx)
    }

    /// Run until the connection is closed. Returns the final state.
    ///
    /// Call once the WebSocket handshake has completed.
    pub async fn run(mut self, mut inbound: Inbound, shutdown: Shutdown) -> ConnectionState {
        self.apply(ClientEvent::Connected);

        let mut close_deadline: Option<Instant> = None;
        loop {
            tokio::select! {
                () = shutdown.requested(), if close_deadline.is_none() => {
                    self.apply(ClientEvent::ShutdownRequested);
                    close_deadline = Some(Instant::now() + CLOSE_TIMEOUT);
                },
                frame = inbound.recv() => match frame {
                    Some(Ok(raw)) => self.apply(ClientEvent::FrameReceived(raw)),
                    Some(Err(e)) => {
                        self.apply(ClientEvent::ReadFailed { reason: e.to_string() });
                        break;
                    },
                    None => {
                        tracing::debug!("inbound stream ended");
                        break;
                    },
                },
                () = sleep_until(close_deadline), if close_deadline.is_some() => {
                    tracing::info!("peer did not acknowledge close within {CLOSE_TIMEOUT:?}");
                    break;
                },
            }
        }

        self.apply(ClientEvent::Disconnected);
        self.dispatcher.state()
    }

    fn apply(&mut self, event: ClientEvent) {
        match self.dispatcher.handle(event) {
            Ok(actions) => self.execute(actions),
            Err(e) => tracing::warn!("dispatcher rejected event: {e}"),
        }
        let next = self.dispatcher.state();
        self.state.send_if_modified(|current| {
            let changed = *current != next;
            *current = next;
            changed
        });
    }

    fn execute(&self, actions: Vec<ClientAction>) {
        for action in actions {
            match action {
                ClientAction::Send(payload) => {
                    let payload_type = payload.payload_type();
                    if let Err(e) = self.outbox.send(payload) {
                        tracing::warn!("failed to queue {payload_type}: {e}");
                    }
                },
                ClientAction::Render(RenderCommand::SetStatusLabel(_)) => {
                    publish_typing_label(self.dispatcher.session(), &self.surface);
                },
                ClientAction::Render(command) => apply_render(&self.surface, command),
                ClientAction::Notify { title, message } => {
                    if let Err(e) = self.notifier.notify(&title, &message) {
                        tracing::warn!("{e}");
                    }
                },
                ClientAction::Close => {
                    if let Err(e) = self.outbox.close() {
                        tracing::debug!("close frame not queued: {e}");
                    }
                },
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
