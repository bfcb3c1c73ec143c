//! Fuzz target for envelope and payload decoding
//!
//! Feeds arbitrary bytes through `Envelope::decode` and `Payload::decode`.
//! Inbound frames come straight off the socket, so every input must end in
//! `Ok` or `Err`, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use localchat_proto::{Envelope, Payload};

fuzz_target!(|data: &[u8]| {
    if let Ok(envelope) = Envelope::decode(data.to_vec()) {
        let _ = Payload::decode(&envelope);
    }
});
