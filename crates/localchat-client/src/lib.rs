//! Client
//!
//! Protocol engine for the localchat terminal client. Decodes inbound
//! envelopes, keeps the session caches (messages, roster, typing), parses
//! inline commands and builds outbound payloads.
//!
//! # Architecture
//!
//! The engine is Sans-IO. The [`Dispatcher`] receives [`ClientEvent`]s from
//! the read loop and returns [`ClientAction`]s for the caller to execute:
//! frames to send, lines to render, notifications to raise. All shared state
//! lives in one [`Session`] behind a single lock, so the read loop and the
//! input path can both hold an `Arc<Session>`.
//!
//! Every write to the socket goes through the [`Outbox`], a single-writer
//! queue drained by one task.
//!
//! # Components
//!
//! - [`Dispatcher`]: connection state machine and inbound dispatch table
//! - [`Session`]: message cache, roster cache and typing set
//! - [`OutboundBuilder`]: fixed-shape outbound payloads
//! - [`command`]: inline command grammar
//! - [`ChatLine`]: a rendered message ready for the surface
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::ConnectedClient`]: WebSocket reader and writer tasks
//! - [`transport::connect`]: Connect to a server

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod channel;
pub mod command;
mod dispatcher;
pub mod env;
mod error;
mod event;
mod message_cache;
mod outbound;
mod render;
mod roster;
mod session;
mod typing;

#[cfg(feature = "transport")]
pub mod transport;

pub use channel::{Inbound, InboundFrame, Outbox, Outgoing, inbound_channel};
pub use command::{InlineCommand, InputMode, SettingsCommand};
pub use dispatcher::{CLOSE_TIMEOUT, ConnectionState, Dispatcher};
pub use env::{Environment, LocalStamp, SystemEnv};
pub use error::{ClientError, TransportError};
pub use event::{ClientAction, ClientEvent, RenderCommand};
pub use message_cache::{MessageCache, MessageRecord, Quote, Reaction};
pub use outbound::OutboundBuilder;
pub use render::{ChatLine, QuoteLine};
pub use roster::{DEFAULT_COLOR, RosterCache, UNKNOWN_USERNAME};
pub use session::Session;
pub use typing::{TYPING_EXPIRY, TypingSet, typing_label};
