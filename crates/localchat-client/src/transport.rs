//! WebSocket transport for the client.
//!
//! Provides [`ConnectedClient`], which owns the socket through two tasks: a
//! writer draining the [`Outbox`] and a reader forwarding text frames into
//! the [`Inbound`] channel. Protocol logic stays in the Sans-IO
//! [`Dispatcher`](crate::Dispatcher).

use bytes::Bytes;
use futures::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{net::TcpStream, sync::mpsc, task::AbortHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{
        Message,
        protocol::{CloseFrame, frame::coding::CloseCode},
    },
};

use crate::{
    channel::{Inbound, InboundFrame, Outbox, Outgoing, inbound_channel},
    error::TransportError,
};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Handle to an open WebSocket.
pub struct ConnectedClient {
    /// Queue frames for the writer task.
    pub outbox: Outbox,
    /// Frames from the reader task. Ends when the peer closes.
    pub inbound: Inbound,
    /// The reader and writer tasks.
    pub tasks: SocketTasks,
}

/// Abort handles for the socket tasks.
#[derive(Debug)]
pub struct SocketTasks {
    writer: AbortHandle,
    reader: AbortHandle,
}

impl SocketTasks {
    /// Abort both socket tasks.
    pub fn stop(&self) {
        self.writer.abort();
        self.reader.abort();
    }
}

/// Open a WebSocket to `url` (`ws://host:port/chat`).
///
/// # Errors
///
/// `TransportError::Connect` if the handshake fails.
pub async fn connect(url: &str) -> Result<ConnectedClient, TransportError> {
    let (socket, _response) =
        connect_async(url).await.map_err(|e| TransportError::Connect(format!("{url}: {e}")))?;
    tracing::info!("connected to {url}");

    let (sink, stream) = socket.split();
    let (outbox, outgoing) = Outbox::channel();
    let (inbound_tx, inbound) = inbound_channel();

    let writer = tokio::spawn(run_writer(sink, outgoing));
    let reader = tokio::spawn(run_reader(stream, inbound_tx));

    Ok(ConnectedClient {
        outbox,
        inbound,
        tasks: SocketTasks { writer: writer.abort_handle(), reader: reader.abort_handle() },
    })
}

/// Drain the outbox into the socket. Write failures are logged, not retried.
async fn run_writer(
    mut sink: SplitSink<Socket, Message>,
    mut outgoing: mpsc::UnboundedReceiver<Outgoing>,
) {
    while let Some(item) = outgoing.recv().await {
        match item {
            Outgoing::Payload(payload) => {
                let text = match payload.encode() {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("dropping outbound {}: {e}", payload.payload_type());
                        continue;
                    },
                };
                if let Err(e) = sink.send(Message::Text(text)).await {
                    tracing::warn!("{}", TransportError::Write(e.to_string()));
                }
            },
            Outgoing::Close => {
                let frame = CloseFrame { code: CloseCode::Normal, reason: "".into() };
                if let Err(e) = sink.send(Message::Close(Some(frame))).await {
                    tracing::debug!("close frame not sent: {e}");
                }
                break;
            },
        }
    }
}

/// Forward inbound text frames until the peer closes or a read fails.
async fn run_reader(mut stream: SplitStream<Socket>, inbound: mpsc::Sender<InboundFrame>) {
    while let Some(message) = stream.next().await {
        let frame = match message {
            Ok(Message::Text(text)) => Ok(Bytes::from(text)),
            Ok(Message::Binary(data)) => Ok(Bytes::from(data)),
            Ok(Message::Close(frame)) => {
                tracing::debug!("peer closed: {frame:?}");
                break;
            },
            Ok(_) => continue,
            Err(e) => Err(TransportError::Read(e.to_string())),
        };

        let failed = frame.is_err();
        if inbound.send(frame).await.is_err() || failed {
            break;
        }
    }
}
