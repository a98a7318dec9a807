// SPDX-License-Identifier: AGPL-3.0-only
use colored::*;
use log::debug;
use mutkn_core::{format_units, parse_units, Address, TokenConfig, DECIMALS};
use mutkn_token::{LedgerStore, TokenEvent, TokenLedger};
use std::error::Error;
use std::path::{Path, PathBuf};

/// Shared state for every command: where the ledger lives, the effective
/// deployment config, and how amounts are typed.
pub struct Context {
    pub store: LedgerStore,
    pub config: TokenConfig,
    pub raw: bool,
}

impl Context {
    /// Resolve config (file, else env + defaults) and the state file path
    /// (explicit, else the config file's `[state].path`, else
    /// `~/.mutkn/state.json`).
    pub fn resolve(
        state: Option<PathBuf>,
        config_path: Option<&Path>,
        raw: bool,
    ) -> Result<Self, Box<dyn Error>> {
        let (config, from_file) = match config_path {
            Some(path) => {
                let config = TokenConfig::load_from_file(path)?;
                config.validate()?;
                (config, true)
            }
            None => (TokenConfig::load_from_env()?, false),
        };

        let state_path = match state {
            Some(path) => path,
            None if from_file => config.state.path.clone(),
            None => default_state_path(),
        };
        debug!("using state file {}", state_path.display());

        Ok(Self {
            store: LedgerStore::new(state_path),
            config,
            raw,
        })
    }

    pub fn load(&self) -> Result<TokenLedger, Box<dyn Error>> {
        Ok(self.store.load()?)
    }

    pub fn save(&self, ledger: &TokenLedger) -> Result<(), Box<dyn Error>> {
        Ok(self.store.save(ledger)?)
    }

    /// Parse a user-typed amount into smallest units.
    pub fn parse_amount(&self, input: &str) -> Result<u128, Box<dyn Error>> {
        if self.raw {
            let value = input
                .trim()
                .parse::<u128>()
                .map_err(|e| format!("invalid raw amount {:?}: {}", input, e))?;
            Ok(value)
        } else {
            Ok(parse_units(input, DECIMALS)?)
        }
    }

    pub fn show_amount(&self, ledger: &TokenLedger, value: u128) -> String {
        if self.raw {
            format!("{} (raw)", value)
        } else {
            format!(
                "{} {}",
                format_units(value, ledger.decimals()),
                ledger.symbol()
            )
        }
    }

    pub fn print_event(&self, ledger: &TokenLedger, seq: u64, event: &TokenEvent) {
        match event {
            TokenEvent::Transfer { from, to, value } => println!(
                "  {} #{} {} {} → {}  {}",
                "•".cyan(),
                seq,
                "Transfer".bold(),
                from.to_string().dimmed(),
                to.to_string().green(),
                self.show_amount(ledger, *value).yellow()
            ),
            TokenEvent::Approval {
                owner,
                spender,
                value,
            } => println!(
                "  {} #{} {} {} ⇢ {}  {}",
                "•".cyan(),
                seq,
                "Approval".bold(),
                owner.to_string().dimmed(),
                spender.to_string().green(),
                self.show_amount(ledger, *value).yellow()
            ),
        }
    }
}

fn default_state_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mutkn")
        .join("state.json")
}

/// Accept `0x…` hex or `@label` (derived with [`Address::from_label`]).
pub fn resolve_address(input: &str) -> Result<Address, Box<dyn Error>> {
    match input.trim().strip_prefix('@') {
        Some("") => Err("empty account label after '@'".into()),
        Some(label) => Ok(Address::from_label(label)),
        None => Ok(input.trim().parse::<Address>()?),
    }
}
