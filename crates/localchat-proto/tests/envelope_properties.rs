//! Property-based tests for envelope decoding and content encoding.
//!
//! Decoding runs on every byte the server sends, so it must never panic and
//! must classify the tag the same way regardless of what else is in the
//! object.

use localchat_proto::{
    Envelope, Payload, PayloadType, ProtocolError,
    content::{decode_content, encode_content},
};
use proptest::prelude::*;

/// Strategy for known payload types
fn arbitrary_payload_type() -> impl Strategy<Value = PayloadType> {
    prop::sample::select(PayloadType::ALL.to_vec())
}

/// Strategy for extra JSON fields that should not affect the tag
fn arbitrary_extra_fields() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z]{1,8}", "[ -~]{0,16}"), 0..4)
}

#[test]
fn prop_content_decode_inverts_encode() {
    proptest!(|(text in "\\PC{1,64}")| {
        let encoded = encode_content(&text);
        let decoded = decode_content(&encoded).expect("encoded content must decode");

        // PROPERTY: decode after encode is the identity
        prop_assert_eq!(decoded, text);
    });
}

#[test]
fn prop_decode_never_panics_on_arbitrary_bytes() {
    proptest!(|(raw in prop::collection::vec(any::<u8>(), 0..256))| {
        // PROPERTY: any input yields Ok or a typed error
        let _ = Envelope::decode(raw.clone());
        let _ = decode_content(&String::from_utf8_lossy(&raw));
    });
}

#[test]
fn prop_tag_survives_extra_fields() {
    proptest!(|(payload_type in arbitrary_payload_type(), extra in arbitrary_extra_fields())| {
        let mut object = serde_json::Map::new();
        for (key, value) in extra {
            if key != "payloadType" {
                object.insert(key, serde_json::Value::String(value));
            }
        }
        object.insert("payloadType".into(), serde_json::Value::from(payload_type.to_u8()));
        let raw = serde_json::to_vec(&object).expect("map serializes");

        let envelope = Envelope::decode(raw).expect("tagged object must decode");

        // PROPERTY: only the tag decides the payload type
        prop_assert_eq!(envelope.payload_type(), payload_type);
    });
}

#[test]
fn prop_out_of_range_tags_are_unknown() {
    proptest!(|(tag in prop_oneof![i64::MIN..0i64, 8i64..i64::MAX])| {
        let raw = format!(r#"{{"payloadType":{tag}}}"#);

        // PROPERTY: integers outside 0-7 never map to a payload type
        prop_assert_eq!(
            Envelope::decode(raw.into_bytes()),
            Err(ProtocolError::UnknownPayloadType(tag))
        );
    });
}

#[test]
fn prop_bodiless_requests_decode_back() {
    let requests =
        [Payload::ClientListRequest, Payload::MessageListRequest, Payload::HistoryResync];

    for request in requests {
        let raw = request.encode().expect("request encodes");
        let envelope = Envelope::decode(raw.into_bytes()).expect("request decodes");

        assert_eq!(Payload::decode(&envelope).expect("body decodes"), request);
    }
}
