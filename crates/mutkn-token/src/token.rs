// SPDX-License-Identifier: AGPL-3.0-only
//! # Token Ledger
//!
//! Fixed-supply fungible token with the ERC-20 mutation surface:
//! `transfer`, `approve`, `transfer_from`.
//!
//! ## State
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │  TokenLedger                                          │
//! │  ┌──────────┐  ┌──────────────┐  ┌─────────────────┐  │
//! │  │ Metadata │  │ Balances     │  │ Allowances      │  │
//! │  │ name     │  │ addr → u128  │  │ owner → spender │  │
//! │  │ symbol   │  │              │  │   → u128        │  │
//! │  │ decimals │  │              │  │                 │  │
//! │  │ supply   │  │              │  │                 │  │
//! │  └──────────┘  └──────────────┘  └─────────────────┘  │
//! │  event_log: append-only Transfer / Approval history   │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutating call validates all preconditions before touching state, so
//! a rejected call leaves balances, allowances and the event log untouched.
//! The caller identity is always an explicit argument.

use crate::error::{Result, TokenError};
use log::{debug, info, warn};
use mutkn_core::amount_serde::{checked_sum, nested_len, u128_map, u128_nested_map, u128_str};
use mutkn_core::{to_base_units, Address, ApprovalPolicy, TokenConfig, DECIMALS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─────────────────────────────────────────────────────────────
// METADATA & EVENTS
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    /// Always 18.
    pub decimals: u8,
    /// Smallest units; fixed at deployment.
    #[serde(with = "u128_str")]
    pub total_supply: u128,
}

/// Notifications emitted by successful mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum TokenEvent {
    /// Emitted on transfer / transfer_from, and once at deployment as a mint
    /// from the zero address.
    Transfer {
        from: Address,
        to: Address,
        #[serde(with = "u128_str")]
        value: u128,
    },
    /// Emitted on approve.
    Approval {
        owner: Address,
        spender: Address,
        #[serde(with = "u128_str")]
        value: u128,
    },
}

impl TokenEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TokenEvent::Transfer { .. } => "Transfer",
            TokenEvent::Approval { .. } => "Approval",
        }
    }
}

/// An event together with its position in the ledger's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub seq: u64,
    pub event: TokenEvent,
}

/// Output of one successful mutating call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Sequence number of the first event in `events`.
    pub seq: u64,
    pub events: Vec<TokenEvent>,
}

// ─────────────────────────────────────────────────────────────
// LEDGER
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLedger {
    metadata: TokenMetadata,
    deployer: Address,
    #[serde(default)]
    approval_policy: ApprovalPolicy,
    /// Zero balances are not stored.
    #[serde(with = "u128_map")]
    balances: BTreeMap<Address, u128>,
    /// owner → spender → remaining allowance. Zero allowances are not stored.
    #[serde(with = "u128_nested_map")]
    allowances: BTreeMap<Address, BTreeMap<Address, u128>>,
    #[serde(default)]
    event_log: Vec<LoggedEvent>,
}

pub(crate) fn reject(op: &str, err: TokenError) -> TokenError {
    warn!("{} rejected: {}", op, err);
    err
}

impl TokenLedger {
    /// Deploy a token and mint `initial_supply_whole * 10^18` to `deployer`.
    pub fn deploy(
        deployer: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        initial_supply_whole: u128,
    ) -> Result<Self> {
        Self::deploy_with_policy(
            deployer,
            name,
            symbol,
            initial_supply_whole,
            ApprovalPolicy::default(),
        )
    }

    pub fn deploy_with_policy(
        deployer: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
        initial_supply_whole: u128,
        approval_policy: ApprovalPolicy,
    ) -> Result<Self> {
        if deployer.is_zero() {
            return Err(reject("deploy", TokenError::InvalidDeployer(deployer)));
        }
        let total_supply = to_base_units(initial_supply_whole).ok_or_else(|| {
            reject(
                "deploy",
                TokenError::SupplyOverflow {
                    whole: initial_supply_whole,
                },
            )
        })?;

        let mut ledger = Self {
            metadata: TokenMetadata {
                name: name.into(),
                symbol: symbol.into(),
                decimals: DECIMALS,
                total_supply,
            },
            deployer,
            approval_policy,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            event_log: Vec::new(),
        };
        ledger.set_balance(deployer, total_supply);
        ledger.emit(TokenEvent::Transfer {
            from: Address::ZERO,
            to: deployer,
            value: total_supply,
        });

        info!(
            "deployed {} ({}) with supply {} to {}",
            ledger.metadata.name, ledger.metadata.symbol, total_supply, deployer
        );
        Ok(ledger)
    }

    /// Deploy using the token section of a [`TokenConfig`].
    pub fn from_config(deployer: Address, config: &TokenConfig) -> Result<Self> {
        Self::deploy_with_policy(
            deployer,
            config.token.name.clone(),
            config.token.symbol.clone(),
            config.token.initial_supply,
            config.token.approval_policy,
        )
    }

    // ── Read accessors ──

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn total_supply(&self) -> u128 {
        self.metadata.total_supply
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn deployer(&self) -> Address {
        self.deployer
    }

    pub fn approval_policy(&self) -> ApprovalPolicy {
        self.approval_policy
    }

    pub fn balance_of(&self, account: Address) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.allowances
            .get(&owner)
            .and_then(|spenders| spenders.get(&spender))
            .copied()
            .unwrap_or(0)
    }

    /// Accounts with a non-zero balance, ordered by address.
    pub fn holders(&self) -> impl Iterator<Item = (Address, u128)> + '_ {
        self.balances.iter().map(|(addr, bal)| (*addr, *bal))
    }

    /// Number of non-zero (owner, spender) allowances.
    pub fn allowance_count(&self) -> usize {
        nested_len(&self.allowances)
    }

    pub fn event_log(&self) -> &[LoggedEvent] {
        &self.event_log
    }

    // ── Mutations ──

    /// Move `amount` from `caller` to `to`.
    pub fn transfer(&mut self, caller: Address, to: Address, amount: u128) -> Result<Receipt> {
        self.check_move(caller, to, amount)
            .map_err(|e| reject("transfer", e))?;

        self.move_balance(caller, to, amount);
        debug!("transfer {} -> {}: {}", caller, to, amount);
        Ok(self.emit(TokenEvent::Transfer {
            from: caller,
            to,
            value: amount,
        }))
    }

    /// Set the allowance `spender` may draw from `caller` to exactly `amount`.
    pub fn approve(&mut self, caller: Address, spender: Address, amount: u128) -> Result<Receipt> {
        self.check_approve(caller, spender, amount)
            .map_err(|e| reject("approve", e))?;

        self.set_allowance(caller, spender, amount);
        debug!("approve {} -> {}: {}", caller, spender, amount);
        Ok(self.emit(TokenEvent::Approval {
            owner: caller,
            spender,
            value: amount,
        }))
    }

    /// `caller` spends `amount` of `owner`'s allowance, moving it to `to`.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        owner: Address,
        to: Address,
        amount: u128,
    ) -> Result<Receipt> {
        let allowance = self
            .check_transfer_from(caller, owner, to, amount)
            .map_err(|e| reject("transfer_from", e))?;

        self.set_allowance(owner, caller, allowance - amount);
        self.move_balance(owner, to, amount);
        debug!(
            "transfer_from {} -> {} by {}: {} (allowance left {})",
            owner,
            to,
            caller,
            amount,
            allowance - amount
        );
        Ok(self.emit(TokenEvent::Transfer {
            from: owner,
            to,
            value: amount,
        }))
    }

    /// Recheck the structural invariants: balances sum to total supply, the
    /// zero address holds nothing, no zero entries are stored, decimals are
    /// 18, the event log is gap-free.
    pub fn check_invariants(&self) -> Result<()> {
        let sum = checked_sum(self.balances.values());
        if sum != Some(self.metadata.total_supply) {
            return Err(TokenError::SupplyMismatch {
                sum,
                total_supply: self.metadata.total_supply,
            });
        }
        if self.balances.contains_key(&Address::ZERO) {
            return Err(TokenError::InvariantViolation(
                "zero address holds a balance".to_string(),
            ));
        }
        if self.allowances.contains_key(&Address::ZERO)
            || self
                .allowances
                .values()
                .any(|spenders| spenders.contains_key(&Address::ZERO))
        {
            return Err(TokenError::InvariantViolation(
                "allowance involves the zero address".to_string(),
            ));
        }
        if self.balances.values().any(|bal| *bal == 0) {
            return Err(TokenError::InvariantViolation(
                "zero balance stored".to_string(),
            ));
        }
        if self
            .allowances
            .values()
            .any(|spenders| spenders.is_empty() || spenders.values().any(|amt| *amt == 0))
        {
            return Err(TokenError::InvariantViolation(
                "zero allowance stored".to_string(),
            ));
        }
        if self.metadata.decimals != DECIMALS {
            return Err(TokenError::InvariantViolation(format!(
                "decimals is {}, expected {}",
                self.metadata.decimals, DECIMALS
            )));
        }
        if self.deployer.is_zero() {
            return Err(TokenError::InvariantViolation(
                "deployer is the zero address".to_string(),
            ));
        }
        if let Some(gap) = self
            .event_log
            .iter()
            .enumerate()
            .find(|(i, logged)| logged.seq != *i as u64)
        {
            return Err(TokenError::InvariantViolation(format!(
                "event log out of sequence at position {}",
                gap.0
            )));
        }
        Ok(())
    }

    // ── Precondition checks (no mutation) ──

    fn check_move(&self, from: Address, to: Address, amount: u128) -> Result<()> {
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver(to));
        }
        if from.is_zero() {
            return Err(TokenError::InvalidSender(from));
        }
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(TokenError::InsufficientBalance {
                account: from,
                balance,
                needed: amount,
            });
        }
        if from != to && self.balance_of(to).checked_add(amount).is_none() {
            return Err(TokenError::BalanceOverflow(to));
        }
        Ok(())
    }

    fn check_approve(&self, owner: Address, spender: Address, amount: u128) -> Result<()> {
        if spender.is_zero() {
            return Err(TokenError::InvalidSpender(spender));
        }
        if owner.is_zero() {
            return Err(TokenError::InvalidApprover(owner));
        }
        if self.approval_policy == ApprovalPolicy::CappedBySupply
            && amount > self.metadata.total_supply
        {
            return Err(TokenError::ApprovalExceedsSupply {
                amount,
                total_supply: self.metadata.total_supply,
            });
        }
        Ok(())
    }

    /// Returns the current allowance on success.
    fn check_transfer_from(
        &self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: u128,
    ) -> Result<u128> {
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver(to));
        }
        if owner.is_zero() {
            return Err(TokenError::InvalidSender(owner));
        }
        if spender.is_zero() {
            return Err(TokenError::InvalidSpender(spender));
        }
        let allowance = self.allowance(owner, spender);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                owner,
                spender,
                allowance,
                needed: amount,
            });
        }
        self.check_move(owner, to, amount)?;
        Ok(allowance)
    }

    // ── State writes (preconditions already checked) ──

    fn set_balance(&mut self, account: Address, amount: u128) {
        if amount == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: u128) {
        if amount == 0 {
            if let Some(spenders) = self.allowances.get_mut(&owner) {
                spenders.remove(&spender);
                if spenders.is_empty() {
                    self.allowances.remove(&owner);
                }
            }
        } else {
            self.allowances
                .entry(owner)
                .or_default()
                .insert(spender, amount);
        }
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: u128) {
        if from == to || amount == 0 {
            return;
        }
        // Bounds checked in check_move.
        let from_balance = self.balance_of(from).saturating_sub(amount);
        let to_balance = self.balance_of(to).saturating_add(amount);
        self.set_balance(from, from_balance);
        self.set_balance(to, to_balance);
    }

    fn emit(&mut self, event: TokenEvent) -> Receipt {
        let seq = self.event_log.len() as u64;
        self.event_log.push(LoggedEvent {
            seq,
            event: event.clone(),
        });
        Receipt {
            seq,
            events: vec![event],
        }
    }
}

// ─────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mutkn_core::UNIT;

    const NAME: &str = "My Unstable Token";
    const SYMBOL: &str = "MUTKN";

    fn tokens(n: u128) -> u128 {
        n * UNIT
    }

    struct Accounts {
        deployer: Address,
        receiver: Address,
        exchange: Address,
    }

    fn accounts() -> Accounts {
        Accounts {
            deployer: Address::from_label("deployer"),
            receiver: Address::from_label("receiver"),
            exchange: Address::from_label("exchange"),
        }
    }

    fn make_token() -> (TokenLedger, Accounts) {
        let acc = accounts();
        let token = TokenLedger::deploy(acc.deployer, NAME, SYMBOL, 1_000_000).unwrap();
        (token, acc)
    }

    // ── Deployment ──

    #[test]
    fn test_deploy_has_correct_name() {
        let (token, _) = make_token();
        assert_eq!(token.name(), NAME);
    }

    #[test]
    fn test_deploy_has_correct_symbol() {
        let (token, _) = make_token();
        assert_eq!(token.symbol(), SYMBOL);
    }

    #[test]
    fn test_deploy_has_correct_decimals() {
        let (token, _) = make_token();
        assert_eq!(token.decimals(), 18);
    }

    #[test]
    fn test_deploy_has_correct_total_supply() {
        let (token, _) = make_token();
        assert_eq!(token.total_supply(), tokens(1_000_000));
    }

    #[test]
    fn test_deploy_assigns_total_supply_to_deployer() {
        let (token, acc) = make_token();
        assert_eq!(token.balance_of(acc.deployer), tokens(1_000_000));
        assert_eq!(token.balance_of(acc.receiver), 0);
        assert_eq!(token.allowance(acc.deployer, acc.exchange), 0);
        assert_eq!(token.deployer(), acc.deployer);
    }

    #[test]
    fn test_deploy_logs_mint_event() {
        let (token, acc) = make_token();
        assert_eq!(token.event_log().len(), 1);
        assert_eq!(
            token.event_log()[0],
            LoggedEvent {
                seq: 0,
                event: TokenEvent::Transfer {
                    from: Address::ZERO,
                    to: acc.deployer,
                    value: tokens(1_000_000),
                },
            }
        );
    }

    #[test]
    fn test_deploy_rejects_zero_deployer() {
        let err = TokenLedger::deploy(Address::ZERO, NAME, SYMBOL, 1).unwrap_err();
        assert_eq!(err, TokenError::InvalidDeployer(Address::ZERO));
    }

    #[test]
    fn test_deploy_rejects_supply_overflow() {
        let err =
            TokenLedger::deploy(Address::from_label("d"), NAME, SYMBOL, u128::MAX).unwrap_err();
        assert_eq!(err, TokenError::SupplyOverflow { whole: u128::MAX });
    }

    #[test]
    fn test_deploy_from_config() {
        let mut config = TokenConfig::default();
        config.token.approval_policy = ApprovalPolicy::Unbounded;
        let token = TokenLedger::from_config(Address::from_label("d"), &config).unwrap();
        assert_eq!(token.symbol(), "MUTKN");
        assert_eq!(token.approval_policy(), ApprovalPolicy::Unbounded);
    }

    // ── Sending Tokens: Success ──

    #[test]
    fn test_transfer_moves_balances() {
        let (mut token, acc) = make_token();
        token
            .transfer(acc.deployer, acc.receiver, tokens(100))
            .unwrap();
        assert_eq!(token.balance_of(acc.deployer), tokens(999_900));
        assert_eq!(token.balance_of(acc.receiver), tokens(100));
        assert_eq!(token.total_supply(), tokens(1_000_000));
    }

    #[test]
    fn test_transfer_emits_transfer_event() {
        let (mut token, acc) = make_token();
        let receipt = token
            .transfer(acc.deployer, acc.receiver, tokens(100))
            .unwrap();
        assert_eq!(receipt.seq, 1);
        assert_eq!(receipt.events.len(), 1);
        assert_eq!(receipt.events[0].name(), "Transfer");
        assert_eq!(
            receipt.events[0],
            TokenEvent::Transfer {
                from: acc.deployer,
                to: acc.receiver,
                value: tokens(100),
            }
        );
        assert_eq!(token.event_log().last().unwrap().event, receipt.events[0]);
    }

    #[test]
    fn test_transfer_to_self_keeps_balance() {
        let (mut token, acc) = make_token();
        let receipt = token
            .transfer(acc.deployer, acc.deployer, tokens(5))
            .unwrap();
        assert_eq!(token.balance_of(acc.deployer), tokens(1_000_000));
        assert_eq!(receipt.events.len(), 1);
    }

    #[test]
    fn test_transfer_zero_amount_allowed() {
        let (mut token, acc) = make_token();
        token.transfer(acc.receiver, acc.exchange, 0).unwrap();
        assert_eq!(token.balance_of(acc.exchange), 0);
        assert_eq!(token.holders().count(), 1);
    }

    #[test]
    fn test_transfer_entire_balance_drops_holder() {
        let (mut token, acc) = make_token();
        token
            .transfer(acc.deployer, acc.receiver, tokens(1_000_000))
            .unwrap();
        let holders: Vec<_> = token.holders().collect();
        assert_eq!(holders, vec![(acc.receiver, tokens(1_000_000))]);
        assert!(token.check_invariants().is_ok());
    }

    // ── Sending Tokens: Failure ──

    #[test]
    fn test_transfer_rejects_insufficient_balance() {
        let (mut token, acc) = make_token();
        let before = token.clone();
        let err = token
            .transfer(acc.deployer, acc.receiver, tokens(100_000_000))
            .unwrap_err();
        assert!(matches!(err, TokenError::InsufficientBalance { .. }));
        assert_eq!(token, before);
    }

    #[test]
    fn test_transfer_rejects_invalid_recipient() {
        let (mut token, acc) = make_token();
        let before = token.clone();
        let err = token
            .transfer(acc.deployer, Address::ZERO, tokens(100))
            .unwrap_err();
        assert_eq!(err, TokenError::InvalidReceiver(Address::ZERO));
        assert_eq!(token, before);
    }

    #[test]
    fn test_transfer_rejects_zero_sender() {
        let (mut token, acc) = make_token();
        let err = token.transfer(Address::ZERO, acc.receiver, 0).unwrap_err();
        assert_eq!(err, TokenError::InvalidSender(Address::ZERO));
    }

    // ── Approving Tokens ──

    #[test]
    fn test_approve_allocates_allowance() {
        let (mut token, acc) = make_token();
        token
            .approve(acc.deployer, acc.exchange, tokens(100))
            .unwrap();
        assert_eq!(token.allowance(acc.deployer, acc.exchange), tokens(100));
        assert_eq!(token.allowance(acc.exchange, acc.deployer), 0);
        assert_eq!(token.allowance_count(), 1);
    }

    #[test]
    fn test_approve_emits_approval_event() {
        let (mut token, acc) = make_token();
        let receipt = token
            .approve(acc.deployer, acc.exchange, tokens(100))
            .unwrap();
        assert_eq!(
            receipt.events,
            vec![TokenEvent::Approval {
                owner: acc.deployer,
                spender: acc.exchange,
                value: tokens(100),
            }]
        );
    }

    #[test]
    fn test_approve_overwrites_previous_value() {
        let (mut token, acc) = make_token();
        token
            .approve(acc.deployer, acc.exchange, tokens(100))
            .unwrap();
        token.approve(acc.deployer, acc.exchange, tokens(30)).unwrap();
        assert_eq!(token.allowance(acc.deployer, acc.exchange), tokens(30));
        token.approve(acc.deployer, acc.exchange, 0).unwrap();
        assert_eq!(token.allowance(acc.deployer, acc.exchange), 0);
        assert_eq!(token.allowance_count(), 0);
    }

    #[test]
    fn test_approve_does_not_require_balance() {
        let (mut token, acc) = make_token();
        token
            .approve(acc.receiver, acc.exchange, tokens(500))
            .unwrap();
        assert_eq!(token.allowance(acc.receiver, acc.exchange), tokens(500));
    }

    #[test]
    fn test_approve_rejects_invalid_spender() {
        let (mut token, acc) = make_token();
        let before = token.clone();
        let err = token
            .approve(acc.deployer, Address::ZERO, tokens(100))
            .unwrap_err();
        assert_eq!(err, TokenError::InvalidSpender(Address::ZERO));
        assert_eq!(token, before);
    }

    #[test]
    fn test_approve_rejects_zero_caller() {
        let (mut token, acc) = make_token();
        let before = token.clone();
        let err = token
            .approve(Address::ZERO, acc.exchange, tokens(1))
            .unwrap_err();
        assert_eq!(err, TokenError::InvalidApprover(Address::ZERO));
        assert_eq!(token, before);
    }

    #[test]
    fn test_approve_rejects_amount_above_supply() {
        let (mut token, acc) = make_token();
        let before = token.clone();
        let err = token
            .approve(acc.deployer, acc.exchange, tokens(100_000_000))
            .unwrap_err();
        assert!(matches!(err, TokenError::ApprovalExceedsSupply { .. }));
        assert_eq!(token, before);
    }

    #[test]
    fn test_approve_exact_supply_allowed() {
        let (mut token, acc) = make_token();
        token
            .approve(acc.deployer, acc.exchange, tokens(1_000_000))
            .unwrap();
    }

    #[test]
    fn test_unbounded_policy_accepts_large_approval() {
        let acc = accounts();
        let mut token = TokenLedger::deploy_with_policy(
            acc.deployer,
            NAME,
            SYMBOL,
            1_000_000,
            ApprovalPolicy::Unbounded,
        )
        .unwrap();
        token
            .approve(acc.deployer, acc.exchange, u128::MAX)
            .unwrap();
        assert_eq!(token.allowance(acc.deployer, acc.exchange), u128::MAX);
    }

    // ── Delegated Token Transfers ──

    fn approved_token() -> (TokenLedger, Accounts) {
        let (mut token, acc) = make_token();
        token
            .approve(acc.deployer, acc.exchange, tokens(100))
            .unwrap();
        (token, acc)
    }

    #[test]
    fn test_transfer_from_moves_balances() {
        let (mut token, acc) = approved_token();
        token
            .transfer_from(acc.exchange, acc.deployer, acc.receiver, tokens(100))
            .unwrap();
        assert_eq!(token.balance_of(acc.deployer), tokens(999_900));
        assert_eq!(token.balance_of(acc.receiver), tokens(100));
    }

    #[test]
    fn test_transfer_from_resets_allowance() {
        let (mut token, acc) = approved_token();
        token
            .transfer_from(acc.exchange, acc.deployer, acc.receiver, tokens(100))
            .unwrap();
        assert_eq!(token.allowance(acc.deployer, acc.exchange), 0);
    }

    #[test]
    fn test_transfer_from_partial_spend() {
        let (mut token, acc) = approved_token();
        token
            .transfer_from(acc.exchange, acc.deployer, acc.receiver, tokens(40))
            .unwrap();
        assert_eq!(token.allowance(acc.deployer, acc.exchange), tokens(60));
    }

    #[test]
    fn test_transfer_from_emits_transfer_event() {
        let (mut token, acc) = approved_token();
        let receipt = token
            .transfer_from(acc.exchange, acc.deployer, acc.receiver, tokens(100))
            .unwrap();
        assert_eq!(
            receipt.events,
            vec![TokenEvent::Transfer {
                from: acc.deployer,
                to: acc.receiver,
                value: tokens(100),
            }]
        );
        assert_eq!(receipt.seq, 2);
    }

    #[test]
    fn test_transfer_from_rejects_amount_above_allowance() {
        let (mut token, acc) = approved_token();
        let before = token.clone();
        let err = token
            .transfer_from(acc.exchange, acc.deployer, acc.receiver, tokens(200))
            .unwrap_err();
        assert_eq!(
            err,
            TokenError::InsufficientAllowance {
                owner: acc.deployer,
                spender: acc.exchange,
                allowance: tokens(100),
                needed: tokens(200),
            }
        );
        assert_eq!(token, before);
    }

    #[test]
    fn test_transfer_from_rejects_amount_above_balance() {
        let (mut token, acc) = make_token();
        token
            .approve(acc.receiver, acc.exchange, tokens(50))
            .unwrap();
        let before = token.clone();
        let err = token
            .transfer_from(acc.exchange, acc.receiver, acc.deployer, tokens(10))
            .unwrap_err();
        assert!(matches!(err, TokenError::InsufficientBalance { .. }));
        assert_eq!(token, before);
    }

    #[test]
    fn test_transfer_from_rejects_invalid_recipient() {
        let (mut token, acc) = approved_token();
        let before = token.clone();
        let err = token
            .transfer_from(acc.exchange, acc.deployer, Address::ZERO, tokens(10))
            .unwrap_err();
        assert_eq!(err, TokenError::InvalidReceiver(Address::ZERO));
        assert_eq!(token, before);
    }

    #[test]
    fn test_transfer_from_without_approval() {
        let (mut token, acc) = make_token();
        let err = token
            .transfer_from(acc.receiver, acc.deployer, acc.receiver, 1)
            .unwrap_err();
        assert!(matches!(err, TokenError::InsufficientAllowance { .. }));
    }

    #[test]
    fn test_transfer_from_rejects_zero_spender() {
        let (mut token, acc) = approved_token();
        let before = token.clone();
        let err = token
            .transfer_from(Address::ZERO, acc.deployer, acc.receiver, 1)
            .unwrap_err();
        assert_eq!(err, TokenError::InvalidSpender(Address::ZERO));
        assert_eq!(token, before);
    }

    #[test]
    fn test_transfer_from_owner_to_self_spends_allowance() {
        let (mut token, acc) = approved_token();
        let receipt = token
            .transfer_from(acc.exchange, acc.deployer, acc.deployer, tokens(30))
            .unwrap();
        assert_eq!(token.balance_of(acc.deployer), tokens(1_000_000));
        assert_eq!(token.allowance(acc.deployer, acc.exchange), tokens(70));
        assert_eq!(
            receipt.events,
            vec![TokenEvent::Transfer {
                from: acc.deployer,
                to: acc.deployer,
                value: tokens(30),
            }]
        );
    }

    // ── Invariants & serialization ──

    fn assert_violation(token: &TokenLedger) {
        assert!(matches!(
            token.check_invariants(),
            Err(TokenError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_invariants_reject_zero_address_holder() {
        let (mut token, acc) = make_token();
        token.balances.insert(acc.deployer, tokens(999_999));
        token.balances.insert(Address::ZERO, tokens(1));
        assert_violation(&token);
    }

    #[test]
    fn test_invariants_reject_zero_address_allowance() {
        let (mut token, acc) = make_token();
        token
            .allowances
            .entry(acc.deployer)
            .or_default()
            .insert(Address::ZERO, 5);
        assert_violation(&token);

        let (mut token, acc) = make_token();
        token
            .allowances
            .entry(Address::ZERO)
            .or_default()
            .insert(acc.exchange, 5);
        assert_violation(&token);
    }

    #[test]
    fn test_invariants_reject_stored_zeros() {
        let (mut token, acc) = make_token();
        token.balances.insert(acc.receiver, 0);
        assert_violation(&token);

        let (mut token, acc) = make_token();
        token
            .allowances
            .entry(acc.deployer)
            .or_default()
            .insert(acc.exchange, 0);
        assert_violation(&token);

        let (mut token, acc) = make_token();
        token.allowances.insert(acc.deployer, BTreeMap::new());
        assert_violation(&token);
    }

    #[test]
    fn test_invariants_reject_wrong_decimals() {
        let (mut token, _) = make_token();
        token.metadata.decimals = 6;
        assert_violation(&token);
    }

    #[test]
    fn test_invariants_reject_zero_deployer() {
        let (mut token, _) = make_token();
        token.deployer = Address::ZERO;
        assert_violation(&token);
    }

    #[test]
    fn test_invariants_reject_event_gap() {
        let (mut token, acc) = make_token();
        token
            .transfer(acc.deployer, acc.receiver, tokens(1))
            .unwrap();
        token.event_log[1].seq = 5;
        assert_violation(&token);
    }

    #[test]
    fn test_invariants_after_mixed_operations() {
        let (mut token, acc) = approved_token();
        token
            .transfer(acc.deployer, acc.receiver, tokens(7))
            .unwrap();
        token
            .transfer_from(acc.exchange, acc.deployer, acc.exchange, tokens(3))
            .unwrap();
        assert!(token.check_invariants().is_ok());
        assert_eq!(token.event_log().len(), 4);
    }

    #[test]
    fn test_json_roundtrip_preserves_state() {
        let (mut token, acc) = approved_token();
        token
            .transfer(acc.deployer, acc.receiver, tokens(1))
            .unwrap();
        let json = serde_json::to_string(&token).unwrap();
        let decoded: TokenLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, token);
    }

    #[test]
    fn test_event_json_shape() {
        let event = TokenEvent::Approval {
            owner: Address::from_label("o"),
            spender: Address::from_label("s"),
            value: tokens(100),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "Approval");
        assert_eq!(json["value"], "100000000000000000000");
    }
}
