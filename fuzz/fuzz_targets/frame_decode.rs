//! Fuzz target for Frame::decode
//!
//! Feeds arbitrary bytes to the stream frame decoder to find:
//! - Parser panics on truncated prefixes or names
//! - Length prefixes that bypass the size ceiling
//! - Non-UTF-8 or unknown event names that decode anyway
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use bluff_proto::Frame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(frame) = Frame::decode(data) {
        // A decoded frame re-encodes to the bytes it came from
        let mut wire = Vec::new();
        frame.encode(&mut wire).expect("decoded frame must re-encode");
        assert_eq!(&wire[..], &data[..wire.len()]);
        assert!(frame.body_len() <= Frame::MAX_SIZE);
    }
});
