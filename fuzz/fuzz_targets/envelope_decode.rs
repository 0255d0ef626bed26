//! Fuzz target for Envelope::from_json and ServerEvent::from_envelope
//!
//! This fuzzer feeds arbitrary text through the inbound decoding path:
//! - Malformed JSON and non-array envelopes
//! - Unknown event names
//! - Payloads with missing, extra or mistyped fields
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error,
//! and every event that decodes must survive re-encoding unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomlink_proto::{Envelope, ServerEvent};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(envelope) = Envelope::from_json(text) else {
        return;
    };
    let Ok(event) = ServerEvent::from_envelope(envelope) else {
        return;
    };

    let text = event.to_envelope().to_json();
    let reencoded = ServerEvent::from_envelope(Envelope::from_json(&text).unwrap());
    assert_eq!(reencoded.as_ref(), Ok(&event), "re-encoding changed {}", event.name());
});
