//! Input-to-protocol translation layer.
//!
//! The [`Bridge`] sits on the input path: it turns a submitted
//! [`InlineCommand`] into a payload and queues it on the shared [`Outbox`].
//! It also prunes expired typing entries on UI ticks.
//!
//! Sends never wait for a reply. The message shows up when the server
//! echoes it back through the read loop.

use std::sync::Arc;

use localchat_client::{
    ClientError, Environment, InlineCommand, OutboundBuilder, Outbox, Session, TYPING_EXPIRY,
};

use crate::{AppEvent, Surface, publish_typing_label};

/// Bridge between submitted input and the socket writer.
///
/// Generic over Environment to support both production and simulation.
pub struct Bridge<E: Environment> {
    env: E,
    builder: OutboundBuilder<E>,
    session: Arc<Session<E::Instant>>,
    outbox: Outbox,
}

impl<E: Environment> Bridge<E> {
    /// Create a bridge writing to `outbox`.
    pub fn new(
        env: E,
        builder: OutboundBuilder<E>,
        session: Arc<Session<E::Instant>>,
        outbox: Outbox,
    ) -> Self {
        Self { env, builder, session, outbox }
    }

    /// Build and queue the payload for a submitted command.
    ///
    /// Invalid settings values are logged and dropped. A stopped writer is
    /// reported back to the UI.
    pub fn submit(&self, command: &InlineCommand) -> Vec<AppEvent> {
        let payload = match self.builder.build(command, &self.session) {
            Ok(payload) => payload,
            Err(ClientError::Validation { field, value }) => {
                tracing::info!(field, value = %value, "dropping invalid settings value");
                return vec![];
            },
            Err(e) => {
                tracing::warn!("failed to build payload: {e}");
                return vec![];
            },
        };

        let payload_type = payload.payload_type();
        match self.outbox.send(payload) {
            Ok(()) => {
                tracing::debug!("queued {payload_type}");
                vec![]
            },
            Err(e) => {
                tracing::warn!("failed to queue {payload_type}: {e}");
                vec![AppEvent::Error { message: e.to_string() }]
            },
        }
    }

    /// Drop typing entries older than [`TYPING_EXPIRY`] and, if any went,
    /// publish the new label to `surface`.
    ///
    /// Returns whether anything expired.
    pub fn handle_tick<S: Surface + ?Sized>(&self, surface: &S) -> bool {
        if self.session.expire_typing(self.env.now(), TYPING_EXPIRY).is_none() {
            return false;
        }
        publish_typing_label(&self.session, surface);
        true
    }
}
