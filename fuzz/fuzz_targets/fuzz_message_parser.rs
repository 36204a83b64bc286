//! Fuzz target: `parse_message` + `pairs`
//!
//! Any UTF-8 payload must parse (or be rejected) without panicking, and
//! the tokenizer must terminate with every token borrowed from the input.
//!
//! cargo fuzz run fuzz_message_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermocycle::app::commands::Command;
use thermocycle::protocol::parser::{Token, pairs, parse_message};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Some(msg) = parse_message(text) else {
        return;
    };
    let _ = Command::from_message(msg);

    let mut count = 0usize;
    for token in pairs(msg.remainder) {
        let key = match token {
            Token::Pair { key, .. } | Token::Dangling(key) => key,
        };
        assert!(!key.is_empty());
        count += 1;
        assert!(count <= text.len(), "tokenizer failed to make progress");
    }
});
