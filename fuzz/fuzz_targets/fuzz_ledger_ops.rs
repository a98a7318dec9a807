// SPDX-License-Identifier: AGPL-3.0-only
//! Fuzz target: ledger operation sequences
//!
//! Runs structured random transfer/approve/transferFrom calls between a few
//! accounts (plus the zero address). Every call must return Ok/Err without
//! panicking, rejected calls must leave the ledger untouched, and supply
//! must stay conserved.
//!
//! Run: cargo +nightly fuzz run fuzz_ledger_ops

#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mutkn_core::{Address, ApprovalPolicy};
use mutkn_token::TokenLedger;

#[derive(Arbitrary, Debug)]
enum Op {
    Transfer { caller: u8, to: u8, amount: u128 },
    Approve { caller: u8, spender: u8, amount: u128 },
    TransferFrom { caller: u8, from: u8, to: u8, amount: u128 },
}

#[derive(Arbitrary, Debug)]
struct FuzzLedgerInput {
    supply: u64,
    unbounded: bool,
    ops: Vec<Op>,
}

fn account(idx: u8) -> Address {
    match idx % 5 {
        0 => Address::ZERO,
        n => Address::from_label(&format!("account-{}", n)),
    }
}

fuzz_target!(|input: FuzzLedgerInput| {
    let policy = if input.unbounded {
        ApprovalPolicy::Unbounded
    } else {
        ApprovalPolicy::CappedBySupply
    };
    let Ok(mut ledger) = TokenLedger::deploy_with_policy(
        account(1),
        "Fuzz",
        "FZZ",
        u128::from(input.supply),
        policy,
    ) else {
        return;
    };

    // Cap sequence length (prevent timeouts on huge vectors)
    for op in input.ops.iter().take(64) {
        let before = ledger.clone();
        let result = match *op {
            Op::Transfer { caller, to, amount } => {
                ledger.transfer(account(caller), account(to), amount)
            }
            Op::Approve {
                caller,
                spender,
                amount,
            } => ledger.approve(account(caller), account(spender), amount),
            Op::TransferFrom {
                caller,
                from,
                to,
                amount,
            } => ledger.transfer_from(account(caller), account(from), account(to), amount),
        };
        match result {
            Ok(receipt) => assert_eq!(receipt.events.len(), 1),
            Err(_) => assert_eq!(ledger, before),
        }
        ledger
            .check_invariants()
            .expect("supply must be conserved");
    }
});
