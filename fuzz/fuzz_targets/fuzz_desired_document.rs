//! Fuzz target: inbound desired-state document parsing.
//!
//! The remote side's delta documents cross a trust boundary; arbitrary
//! bytes must never panic the parser.
//!
//! cargo fuzz run fuzz_desired_document

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermogate::document::parse_desired;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = core::str::from_utf8(data) {
        let _ = parse_desired(text);
    }
});
