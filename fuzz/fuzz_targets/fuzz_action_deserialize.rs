// SPDX-License-Identifier: AGPL-3.0-only
//! Fuzz target: JSON action decoding
//!
//! Feeds arbitrary bytes to `execute_json` on a freshly deployed ledger.
//! Whatever the input, the ledger must stay consistent and a rejected call
//! must not add events.
//!
//! Run: cargo +nightly fuzz run fuzz_action_deserialize -- -max_len=1024

#![no_main]
use libfuzzer_sys::fuzz_target;
use mutkn_core::Address;
use mutkn_token::TokenLedger;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let deployer = Address::from_label("deployer");
    let Ok(mut ledger) = TokenLedger::deploy(deployer, "Fuzz", "FZZ", 1_000) else {
        return;
    };

    let before = ledger.event_log().len();
    let resp = ledger.execute_json(deployer, json);
    if !resp.success {
        assert_eq!(ledger.event_log().len(), before);
    }
    ledger
        .check_invariants()
        .expect("ledger invariants must hold after any action");
});
