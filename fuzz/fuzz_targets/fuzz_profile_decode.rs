//! Fuzz target: `profile::decode`
//!
//! Arbitrary card contents must decode or be rejected without panicking;
//! whatever decodes must survive a re-encode unchanged.
//!
//! cargo fuzz run fuzz_profile_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermocycle::profile::{INTEGRITY_MARKER, decode, encode};

fuzz_target!(|data: &[u8]| {
    match decode(data) {
        Ok(profile) => {
            assert_eq!(data.last(), Some(&INTEGRITY_MARKER));
            assert_eq!(decode(&encode(&profile)), Ok(profile));
        }
        Err(_) => {}
    }
});
