//! One simulated client, fully wired.
//!
//! [`SimClient`] owns the shared session, the recording collaborators and
//! the outbox receiver, and hands out the production pieces (dispatcher,
//! read loop, bridge, runtime) built around them.

use std::{sync::Arc, time::Duration};

use localchat_app::{
    Bridge, Notifier, ReadLoop, Runtime, Shutdown, apply_render, publish_typing_label,
};
use localchat_client::{
    ClientAction, ClientError, ClientEvent, ConnectionState, Dispatcher, OutboundBuilder, Outbox,
    Outgoing, RenderCommand, Session,
};
use tokio::sync::{mpsc, watch};

use crate::{RecordingNotifier, RecordingSurface, SimDriver, SimEnv, SystemSnapshot};

/// Id of the simulated client.
pub const OWN_ID: &str = "me";

/// Username of the simulated client.
pub const OWN_USERNAME: &str = "myself";

/// Read loop type produced by [`SimClient::read_loop`].
pub type SimReadLoop = ReadLoop<SimEnv, RecordingSurface, RecordingNotifier>;

/// A client session with recording collaborators.
pub struct SimClient {
    /// Deterministic environment.
    pub env: SimEnv,
    /// Shared caches.
    pub session: Arc<Session<Duration>>,
    /// Records render calls and keeps the chat view.
    pub surface: RecordingSurface,
    /// Records notifications.
    pub notifier: RecordingNotifier,
    /// Shutdown handle shared by the read loop and the runtime.
    pub shutdown: Shutdown,
    outbox: Outbox,
    outgoing: mpsc::UnboundedReceiver<Outgoing>,
    sent: Vec<Outgoing>,
}

impl SimClient {
    /// Client `me` ("myself") with a seeded environment.
    pub fn new(seed: u64) -> Self {
        Self::with_notifier(seed, RecordingNotifier::new())
    }

    /// Client whose notifications go to `notifier`.
    pub fn with_notifier(seed: u64, notifier: RecordingNotifier) -> Self {
        let (outbox, outgoing) = Outbox::channel();
        Self {
            env: SimEnv::with_seed(seed),
            session: Arc::new(Session::new(OWN_ID)),
            surface: RecordingSurface::new(),
            notifier,
            shutdown: Shutdown::new(),
            outbox,
            outgoing,
            sent: Vec::new(),
        }
    }

    /// Payload builder for this client.
    pub fn builder(&self) -> OutboundBuilder<SimEnv> {
        OutboundBuilder::new(self.env.clone(), OWN_ID, OWN_USERNAME)
    }

    /// Dispatcher over this client's session.
    pub fn dispatcher(&self) -> Dispatcher<SimEnv> {
        Dispatcher::new(self.env.clone(), Arc::clone(&self.session), self.builder())
    }

    /// Read loop over this client's session and collaborators.
    pub fn read_loop(&self) -> (SimReadLoop, watch::Receiver<ConnectionState>) {
        ReadLoop::new(
            self.dispatcher(),
            self.surface.clone(),
            self.notifier.clone(),
            self.outbox.clone(),
        )
    }

    /// Input bridge writing to this client's outbox.
    pub fn bridge(&self) -> Bridge<SimEnv> {
        Bridge::new(
            self.env.clone(),
            self.builder(),
            Arc::clone(&self.session),
            self.outbox.clone(),
        )
    }

    /// Runtime around `driver`, observing `connection`.
    pub fn runtime(
        &self,
        driver: SimDriver,
        connection: watch::Receiver<ConnectionState>,
    ) -> Runtime<SimDriver, SimEnv> {
        Runtime::new(
            driver,
            "ws://localhost:8080/chat".to_string(),
            self.bridge(),
            self.surface.view(),
            connection,
            self.shutdown.clone(),
        )
    }

    /// Feed one event to `dispatcher` and execute its actions synchronously,
    /// the way the read loop does.
    pub fn step(
        &mut self,
        dispatcher: &mut Dispatcher<SimEnv>,
        event: ClientEvent,
    ) -> Result<Vec<ClientAction>, ClientError> {
        let actions = dispatcher.handle(event)?;
        self.execute(actions.clone());
        Ok(actions)
    }

    /// Execute dispatcher actions the way the read loop does.
    pub fn execute(&self, actions: Vec<ClientAction>) {
        for action in actions {
            match action {
                ClientAction::Send(payload) => {
                    let _ = self.outbox.send(payload);
                },
                ClientAction::Render(RenderCommand::SetStatusLabel(_)) => {
                    publish_typing_label(&self.session, &self.surface);
                },
                ClientAction::Render(command) => apply_render(&self.surface, command),
                ClientAction::Notify { title, message } => {
                    let _ = self.notifier.notify(&title, &message);
                },
                ClientAction::Close => {
                    let _ = self.outbox.close();
                },
            }
        }
    }

    /// Everything queued for the socket writer since the last call.
    pub fn take_outgoing(&mut self) -> Vec<Outgoing> {
        let fresh: Vec<Outgoing> = std::iter::from_fn(|| self.outgoing.try_recv().ok()).collect();
        self.sent.extend(fresh.iter().cloned());
        fresh
    }

    /// Observable state for invariant checks. `states` is the lifecycle
    /// history the caller observed.
    pub fn snapshot(&mut self, states: &[ConnectionState]) -> SystemSnapshot {
        self.take_outgoing();
        let view = self.surface.view().snapshot();
        let typing_ids = self.session.typing_ids();
        SystemSnapshot {
            message_count: self.session.message_count(),
            shown_indices: view.lines.iter().map(|l| l.index).collect(),
            typing_ids: typing_ids.clone(),
            typing_names: typing_ids.iter().map(|id| self.session.username_for(id)).collect(),
            typing_label: view.status_label,
            states: states.to_vec(),
            outgoing: self.sent.clone(),
        }
    }
}
