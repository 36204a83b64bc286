//! Fuzz target: `Framer::poll`
//!
//! Streams arbitrary bytes through the framer the way the control loop
//! does (poll, copy, reset) and asserts it never panics and never holds
//! more than its capacity.
//!
//! cargo fuzz run fuzz_framer

#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;
use thermocycle::protocol::framer::{Framer, MAX_MESSAGE_LEN};

fuzz_target!(|data: &[u8]| {
    let mut framer = Framer::new();
    let mut source: VecDeque<u8> = data.iter().copied().collect();

    while !source.is_empty() {
        if framer.poll(&mut source) {
            let message = framer.copy_message();
            assert!(message.len() <= MAX_MESSAGE_LEN);
            assert!(!message.contains(&b'<'), "start byte leaked into payload");
            framer.reset();
        }
    }
    assert!(framer.len() <= MAX_MESSAGE_LEN);
});
