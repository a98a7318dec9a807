// SPDX-License-Identifier: AGPL-3.0-only
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MY UNSTABLE TOKEN (MUTKN) - CORE MODULE
//
// Primitives shared by the ledger and its front-ends:
// - Account identity (20-byte address, distinguished zero address)
// - Whole-token <-> smallest-unit conversion (18 decimals)
// - Serde adapters for u128 amounts (JSON and TOML cannot carry 128-bit ints)
// - TOML / environment configuration for a token deployment
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod address;
pub mod amount_serde;
pub mod token_config;
pub mod units;

pub use address::{Address, AddressError};
pub use token_config::{ApprovalPolicy, ConfigError, TokenConfig};
pub use units::{format_units, parse_units, to_base_units, UnitsError};

/// Decimal places of every MUTKN amount. Fixed; not configurable.
pub const DECIMALS: u8 = 18;

/// 1 token = 10^18 smallest units.
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// Name used when no configuration overrides it.
pub const DEFAULT_NAME: &str = "My Unstable Token";

/// Ticker used when no configuration overrides it.
pub const DEFAULT_SYMBOL: &str = "MUTKN";

/// Initial supply in whole tokens used when no configuration overrides it.
pub const DEFAULT_INITIAL_SUPPLY: u128 = 1_000_000;

/// Longest accepted token name (bytes).
pub const MAX_NAME_LEN: usize = 64;

/// Longest accepted ticker symbol (bytes).
pub const MAX_SYMBOL_LEN: usize = 8;
