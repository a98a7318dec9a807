// SPDX-License-Identifier: AGPL-3.0-only
//! Fuzz target: address and amount parsing
//!
//! Feeds arbitrary strings to `Address::from_str` and `parse_units`:
//! 1. No panics on any input
//! 2. Parsed addresses round-trip through Display
//!
//! Run: cargo +nightly fuzz run fuzz_address_parse -- -max_len=256

#![no_main]
use libfuzzer_sys::fuzz_target;
use mutkn_core::{format_units, parse_units, Address, DECIMALS};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(addr) = s.parse::<Address>() {
        let back: Address = addr.to_string().parse().expect("display must parse");
        assert_eq!(addr, back);
    }

    if let Ok(value) = parse_units(s, DECIMALS) {
        let shown = format_units(value, DECIMALS);
        assert_eq!(parse_units(&shown, DECIMALS), Ok(value));
    }

    // Label derivation is total
    let _ = Address::from_label(s);
});
