// SPDX-License-Identifier: AGPL-3.0-only
//! Ledger rejections.
//!
//! Every variant means the operation was rejected and the ledger is exactly
//! as it was before the call.

use mutkn_core::Address;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("invalid receiver: {0}")]
    InvalidReceiver(Address),

    #[error("invalid sender: {0}")]
    InvalidSender(Address),

    #[error("invalid spender: {0}")]
    InvalidSpender(Address),

    #[error("invalid approver: {0}")]
    InvalidApprover(Address),

    #[error("invalid deployer: {0}")]
    InvalidDeployer(Address),

    #[error("insufficient balance: {account} has {balance}, needs {needed}")]
    InsufficientBalance {
        account: Address,
        balance: u128,
        needed: u128,
    },

    #[error("insufficient allowance: {spender} may spend {allowance} for {owner}, needs {needed}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        allowance: u128,
        needed: u128,
    },

    #[error("approval of {amount} exceeds total supply {total_supply}")]
    ApprovalExceedsSupply { amount: u128, total_supply: u128 },

    #[error("initial supply of {whole} tokens overflows at 18 decimals")]
    SupplyOverflow { whole: u128 },

    #[error("balance of {0} would overflow")]
    BalanceOverflow(Address),

    #[error("balances sum to {sum:?} but total supply is {total_supply}")]
    SupplyMismatch { sum: Option<u128>, total_supply: u128 },

    #[error("ledger invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, TokenError>;
