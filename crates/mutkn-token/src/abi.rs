// SPDX-License-Identifier: AGPL-3.0-only
//! JSON action surface.
//!
//! A host (or the CLI's `exec` command) drives the ledger with a single
//! message type, [`TokenAction`], and gets back a [`TokenResponse`] carrying
//! the outcome and the events the call produced.
//!
//! ```json
//! {"action": "Transfer", "to": "0x…", "amount": "100000000000000000000"}
//! ```

use crate::error::TokenError;
use crate::token::{reject, TokenEvent, TokenLedger};
use log::warn;
use mutkn_core::amount_serde::u128_str;
use mutkn_core::Address;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────
// ACTIONS
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum TokenAction {
    /// Transfer `amount` from the caller to `to`.
    Transfer {
        to: Address,
        #[serde(with = "u128_str")]
        amount: u128,
    },

    /// Set the caller's allowance for `spender` to `amount`.
    Approve {
        spender: Address,
        #[serde(with = "u128_str")]
        amount: u128,
    },

    /// Move `amount` from `from` to `to`, spending the caller's allowance.
    TransferFrom {
        from: Address,
        to: Address,
        #[serde(with = "u128_str")]
        amount: u128,
    },

    // ── Read-only queries ──
    BalanceOf { account: Address },

    Allowance { owner: Address, spender: Address },

    TotalSupply,

    TokenInfo,
}

impl TokenAction {
    pub fn name(&self) -> &'static str {
        match self {
            TokenAction::Transfer { .. } => "transfer",
            TokenAction::Approve { .. } => "approve",
            TokenAction::TransferFrom { .. } => "transfer_from",
            TokenAction::BalanceOf { .. } => "balance_of",
            TokenAction::Allowance { .. } => "allowance",
            TokenAction::TotalSupply => "total_supply",
            TokenAction::TokenInfo => "token_info",
        }
    }

    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            TokenAction::Transfer { .. }
                | TokenAction::Approve { .. }
                | TokenAction::TransferFrom { .. }
        )
    }
}

/// Stateless pre-flight checks; the ledger repeats them with full state.
pub fn validate_action(action: &TokenAction) -> Result<(), TokenError> {
    match action {
        TokenAction::Transfer { to, .. } => {
            if to.is_zero() {
                return Err(TokenError::InvalidReceiver(*to));
            }
            Ok(())
        }
        TokenAction::Approve { spender, .. } => {
            if spender.is_zero() {
                return Err(TokenError::InvalidSpender(*spender));
            }
            Ok(())
        }
        TokenAction::TransferFrom { from, to, .. } => {
            if to.is_zero() {
                return Err(TokenError::InvalidReceiver(*to));
            }
            if from.is_zero() {
                return Err(TokenError::InvalidSender(*from));
            }
            Ok(())
        }
        TokenAction::BalanceOf { .. }
        | TokenAction::Allowance { .. }
        | TokenAction::TotalSupply
        | TokenAction::TokenInfo => Ok(()),
    }
}

// ─────────────────────────────────────────────────────────────
// RESPONSE
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub success: bool,
    /// Query result (decimal amount or JSON metadata).
    #[serde(default)]
    pub data: Option<String>,
    pub message: String,
    #[serde(default)]
    pub events: Vec<TokenEvent>,
}

impl TokenResponse {
    fn ok(message: String, data: Option<String>, events: Vec<TokenEvent>) -> Self {
        Self {
            success: true,
            data,
            message,
            events,
        }
    }

    fn rejected(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
            events: Vec::new(),
        }
    }
}

impl From<TokenError> for TokenResponse {
    fn from(err: TokenError) -> Self {
        TokenResponse::rejected(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────
// DISPATCH
// ─────────────────────────────────────────────────────────────

impl TokenLedger {
    /// Execute one action on behalf of `caller`.
    pub fn execute(&mut self, caller: Address, action: TokenAction) -> TokenResponse {
        if let Err(e) = validate_action(&action) {
            return reject(action.name(), e).into();
        }

        match action {
            TokenAction::Transfer { to, amount } => match self.transfer(caller, to, amount) {
                Ok(receipt) => TokenResponse::ok(
                    format!("Transferred {} to {}", amount, to),
                    None,
                    receipt.events,
                ),
                Err(e) => e.into(),
            },

            TokenAction::Approve { spender, amount } => {
                match self.approve(caller, spender, amount) {
                    Ok(receipt) => TokenResponse::ok(
                        format!("Approved {} for {}", amount, spender),
                        None,
                        receipt.events,
                    ),
                    Err(e) => e.into(),
                }
            }

            TokenAction::TransferFrom { from, to, amount } => {
                match self.transfer_from(caller, from, to, amount) {
                    Ok(receipt) => TokenResponse::ok(
                        format!("Transferred {} from {} to {}", amount, from, to),
                        None,
                        receipt.events,
                    ),
                    Err(e) => e.into(),
                }
            }

            TokenAction::BalanceOf { account } => {
                let balance = self.balance_of(account);
                TokenResponse::ok(
                    format!("Balance: {}", balance),
                    Some(balance.to_string()),
                    Vec::new(),
                )
            }

            TokenAction::Allowance { owner, spender } => {
                let allowance = self.allowance(owner, spender);
                TokenResponse::ok(
                    format!("Allowance: {}", allowance),
                    Some(allowance.to_string()),
                    Vec::new(),
                )
            }

            TokenAction::TotalSupply => TokenResponse::ok(
                "Total supply".to_string(),
                Some(self.total_supply().to_string()),
                Vec::new(),
            ),

            TokenAction::TokenInfo => TokenResponse::ok(
                "Token info".to_string(),
                Some(
                    serde_json::to_string(self.metadata()).unwrap_or_else(|_| "{}".to_string()),
                ),
                Vec::new(),
            ),
        }
    }

    /// Decode a JSON action and execute it.
    pub fn execute_json(&mut self, caller: Address, json: &str) -> TokenResponse {
        match serde_json::from_str::<TokenAction>(json) {
            Ok(action) => self.execute(caller, action),
            Err(e) => {
                warn!("action rejected: malformed JSON: {}", e);
                TokenResponse::rejected(format!("Invalid action: {}", e))
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────
