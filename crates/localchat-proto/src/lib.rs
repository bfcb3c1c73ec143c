//! Wire protocol for the localchat chat service.
//!
//! Every message on the socket is a JSON object carrying a numeric
//! `payloadType` tag next to type-specific fields. Decoding happens in two
//! passes: [`Envelope::decode`] reads only the tag and keeps the raw bytes,
//! then [`Payload::decode`] parses the body for that tag.
//!
//! Outbound payloads are built as typed values and serialized with
//! [`Payload::encode`], which injects the tag.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod content;
pub mod envelope;
pub mod errors;
pub mod payloads;

pub use envelope::{Envelope, PayloadType};
pub use errors::{ProtocolError, Result};
pub use payloads::Payload;
