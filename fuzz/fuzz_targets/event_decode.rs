//! Fuzz target for event payload decoding
//!
//! Pairs arbitrary payload bytes with every event name and decodes them in
//! both directions:
//! - Malformed CBOR
//! - Payloads of the wrong shape for the name (type confusion)
//! - Names of the other direction
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use bluff_proto::{ClientIntent, EventName, Frame, ServerEvent};
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let payload = Bytes::copy_from_slice(data);

    for name in EventName::ALL {
        let frame = Frame::new(name, payload.clone());

        if let Ok(event) = ServerEvent::from_frame(&frame) {
            assert_eq!(event.name(), name);
        }
        if let Ok(intent) = ClientIntent::from_frame(&frame) {
            assert_eq!(intent.name(), name);
        }
    }
});
