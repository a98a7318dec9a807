// SPDX-License-Identifier: AGPL-3.0-only
//! Deployment configuration.
//!
//! ```toml
//! [token]
//! name = "My Unstable Token"
//! symbol = "MUTKN"
//! initial_supply = "1000000"             # whole tokens, string or integer
//! approval_policy = "capped-by-supply"   # or "unbounded"
//!
//! [state]
//! path = "mutkn-state.json"
//! ```

use crate::amount_serde::u128_str;
use crate::{
    to_base_units, DEFAULT_INITIAL_SUPPLY, DEFAULT_NAME, DEFAULT_SYMBOL, MAX_NAME_LEN,
    MAX_SYMBOL_LEN,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_NAME: &str = "MUTKN_NAME";
pub const ENV_SYMBOL: &str = "MUTKN_SYMBOL";
pub const ENV_INITIAL_SUPPLY: &str = "MUTKN_INITIAL_SUPPLY";
pub const ENV_APPROVAL_POLICY: &str = "MUTKN_APPROVAL_POLICY";
pub const ENV_STATE_PATH: &str = "MUTKN_STATE_PATH";

const DEFAULT_STATE_FILE: &str = "mutkn-state.json";

/// Rule applied to the amount passed to `approve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApprovalPolicy {
    /// Reject approvals larger than the total supply.
    #[default]
    CappedBySupply,
    /// Any amount may be approved.
    Unbounded,
}

impl fmt::Display for ApprovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalPolicy::CappedBySupply => f.write_str("capped-by-supply"),
            ApprovalPolicy::Unbounded => f.write_str("unbounded"),
        }
    }
}

impl FromStr for ApprovalPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "capped-by-supply" | "capped" => Ok(ApprovalPolicy::CappedBySupply),
            "unbounded" => Ok(ApprovalPolicy::Unbounded),
            other => Err(ConfigError::Invalid(format!(
                "unknown approval policy {:?} (expected capped-by-supply or unbounded)",
                other
            ))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to encode TOML: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("environment variable {var}: {reason}")]
    Env { var: &'static str, reason: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub token: TokenSection,
    #[serde(default)]
    pub state: StateSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSection {
    pub name: String,
    pub symbol: String,
    /// Whole tokens minted to the deployer.
    #[serde(with = "u128_str")]
    pub initial_supply: u128,
    #[serde(default)]
    pub approval_policy: ApprovalPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSection {
    pub path: PathBuf,
}

impl Default for StateSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            token: TokenSection {
                name: DEFAULT_NAME.to_string(),
                symbol: DEFAULT_SYMBOL.to_string(),
                initial_supply: DEFAULT_INITIAL_SUPPLY,
                approval_policy: ApprovalPolicy::default(),
            },
            state: StateSection::default(),
        }
    }
}

impl TokenConfig {
    /// Load config from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: TokenConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from `MUTKN_*` environment variables; unset ones keep
    /// their defaults.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(name) = lookup(ENV_NAME) {
            config.token.name = name;
        }
        if let Some(symbol) = lookup(ENV_SYMBOL) {
            config.token.symbol = symbol;
        }
        if let Some(supply) = lookup(ENV_INITIAL_SUPPLY) {
            config.token.initial_supply =
                supply.trim().parse().map_err(|e| ConfigError::Env {
                    var: ENV_INITIAL_SUPPLY,
                    reason: format!("{}", e),
                })?;
        }
        if let Some(policy) = lookup(ENV_APPROVAL_POLICY) {
            config.token.approval_policy = policy.parse().map_err(|e| ConfigError::Env {
                var: ENV_APPROVAL_POLICY,
                reason: format!("{}", e),
            })?;
        }
        if let Some(path) = lookup(ENV_STATE_PATH) {
            config.state.path = PathBuf::from(path);
        }
        Ok(config)
    }

    /// Save config to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let token = &self.token;
        if token.name.is_empty() || token.name.len() > MAX_NAME_LEN {
            return Err(ConfigError::Invalid(format!(
                "name must be 1-{} characters",
                MAX_NAME_LEN
            )));
        }
        if token.symbol.is_empty() || token.symbol.len() > MAX_SYMBOL_LEN {
            return Err(ConfigError::Invalid(format!(
                "symbol must be 1-{} characters",
                MAX_SYMBOL_LEN
            )));
        }
        if token.initial_supply == 0 {
            return Err(ConfigError::Invalid(
                "initial_supply must be > 0".to_string(),
            ));
        }
        self.total_supply_base()?;
        if self.state.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("state.path cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Initial supply scaled to smallest units.
    pub fn total_supply_base(&self) -> Result<u128, ConfigError> {
        to_base_units(self.token.initial_supply).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "initial_supply {} overflows at 18 decimals",
                self.token.initial_supply
            ))
        })
    }
}
