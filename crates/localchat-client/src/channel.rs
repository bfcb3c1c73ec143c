//! Channels between the socket tasks and the rest of the client.
//!
//! All socket writes go through one [`Outbox`]. The read loop and the input
//! path each hold a clone and a single task owns the write half, so sends
//! from different call sites are serialized.

use bytes::Bytes;
use localchat_proto::Payload;
use tokio::sync::mpsc;

use crate::error::TransportError;

/// Inbound frames from the socket reader.
pub type InboundFrame = Result<Bytes, TransportError>;

/// Receiving end of inbound frames. The channel closes when the peer does.
pub type Inbound = mpsc::Receiver<InboundFrame>;

/// Inbound frames buffered between the socket reader and the read loop.
pub const INBOUND_CAPACITY: usize = 64;

/// Create the inbound channel.
pub fn inbound_channel() -> (mpsc::Sender<InboundFrame>, Inbound) {
    mpsc::channel(INBOUND_CAPACITY)
}

/// Item queued for the socket writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    /// Encode and send as a text frame
    Payload(Payload),
    /// Send a close frame and stop writing
    Close,
}

/// Single-writer queue in front of the socket.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<Outgoing>,
}

impl Outbox {
    /// Create an outbox and the receiver the writer task drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Outgoing>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue a payload.
    ///
    /// # Errors
    ///
    /// `TransportError::Closed` if the writer has stopped.
    pub fn send(&self, payload: Payload) -> Result<(), TransportError> {
        self.tx.send(Outgoing::Payload(payload)).map_err(|_| TransportError::Closed)
    }

    /// Queue a close frame.
    ///
    /// # Errors
    ///
    /// `TransportError::Closed` if the writer has stopped.
    pub fn close(&self) -> Result<(), TransportError> {
        self.tx.send(Outgoing::Close).map_err(|_| TransportError::Closed)
    }

    /// Whether the writer has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_queue() {
        let (outbox, mut rx) = Outbox::channel();
        let other = outbox.clone();

        outbox.send(Payload::MessageListRequest).unwrap();
        other.close().unwrap();

        assert_eq!(rx.try_recv().unwrap(), Outgoing::Payload(Payload::MessageListRequest));
        assert_eq!(rx.try_recv().unwrap(), Outgoing::Close);
    }

    #[test]
    fn send_after_writer_stops_fails() {
        let (outbox, rx) = Outbox::channel();
        drop(rx);

        assert!(outbox.is_closed());
        assert_eq!(outbox.send(Payload::ClientListRequest), Err(TransportError::Closed));
    }
}
