// SPDX-License-Identifier: AGPL-3.0-only
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MY UNSTABLE TOKEN (MUTKN) - TOKEN LEDGER
//
// Fixed-supply fungible token: deploy, transfer, approve, transferFrom.
// - Whole supply minted to the deployer; never changes afterwards
// - Every rejected call leaves the ledger untouched
// - Successful calls return a Receipt and append to the event log
// - JSON action dispatch and a JSON state file for hosts and the CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod abi;
pub mod error;
pub mod store;
pub mod token;

pub use abi::{validate_action, TokenAction, TokenResponse};
pub use error::{Result, TokenError};
pub use store::{LedgerStore, StoreError, StoreLock};
pub use token::{LoggedEvent, Receipt, TokenEvent, TokenLedger, TokenMetadata};
