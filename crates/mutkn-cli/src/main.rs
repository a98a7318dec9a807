// SPDX-License-Identifier: AGPL-3.0-only
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MY UNSTABLE TOKEN (MUTKN) CLI - Deploy, transfer and query a local ledger
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "mutkn")]
#[command(about = "My Unstable Token - fixed-supply token ledger CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Ledger state file (reads MUTKN_STATE_PATH; falls back to [state].path
    /// from --config, then ~/.mutkn/state.json)
    #[arg(long, global = true, env = "MUTKN_STATE_PATH")]
    state: Option<PathBuf>,

    /// TOML deployment config (without it, MUTKN_* env vars and defaults apply)
    #[arg(long, global = true, env = "MUTKN_CONFIG")]
    config: Option<PathBuf>,

    /// Amounts are smallest units instead of whole tokens
    #[arg(long, global = true)]
    raw: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Token operations (deploy and state-changing calls)
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },

    /// Query ledger state
    Query {
        #[command(subcommand)]
        action: QueryCommands,
    },

    /// Derive the address for a label (same derivation as `@label` arguments)
    Account {
        /// Account label, e.g. "deployer"
        label: String,
    },

    /// Deployment config helpers
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Deploy a new ledger; the whole supply goes to the deployer
    Deploy {
        /// Deployer address (0x… or @label)
        #[arg(short, long)]
        deployer: String,

        /// Token name (1-64 chars)
        #[arg(long)]
        name: Option<String>,

        /// Token symbol (1-8 chars)
        #[arg(long)]
        symbol: Option<String>,

        /// Initial supply in whole tokens
        #[arg(long)]
        supply: Option<u128>,

        /// Approval rule: capped-by-supply | unbounded
        #[arg(long)]
        approval_policy: Option<String>,

        /// Replace an existing state file
        #[arg(long, default_value = "false")]
        force: bool,
    },

    /// Transfer tokens from the caller
    Transfer {
        /// Caller / sender address
        #[arg(short, long)]
        from: String,

        /// Recipient address
        #[arg(short, long)]
        to: String,

        /// Amount (whole tokens, or smallest units with --raw)
        #[arg(short, long)]
        amount: String,
    },

    /// Set a spender's allowance
    Approve {
        /// Caller / owner address
        #[arg(short, long)]
        owner: String,

        /// Spender address
        #[arg(short, long)]
        spender: String,

        /// Amount to allow
        #[arg(short, long)]
        amount: String,
    },

    /// Spend an allowance on the owner's behalf
    TransferFrom {
        /// Caller / spender address
        #[arg(short, long)]
        spender: String,

        /// Owner whose tokens move
        #[arg(short, long)]
        owner: String,

        /// Recipient address
        #[arg(short, long)]
        to: String,

        /// Amount to move
        #[arg(short, long)]
        amount: String,
    },

    /// Execute a raw JSON action, e.g. '{"action":"TotalSupply"}'
    Exec {
        /// Caller address
        #[arg(short, long)]
        caller: String,

        /// JSON-encoded action
        json: String,
    },
}

#[derive(Subcommand)]
enum QueryCommands {
    /// Token metadata and holder summary
    Info,

    /// Balance of an account
    Balance {
        /// Account address
        account: String,
    },

    /// Remaining allowance of a spender
    Allowance {
        /// Owner address
        #[arg(short, long)]
        owner: String,

        /// Spender address
        #[arg(short, long)]
        spender: String,
    },

    /// Event history
    Events {
        /// Only show the last N events
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write the effective config to a TOML file
    Init {
        /// Output path
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long, default_value = "false")]
        force: bool,
    },

    /// Print the effective config
    Show,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        state,
        config,
        raw,
        command,
    } = cli;
    // Config and env are only read by commands that touch the ledger.
    let context = || commands::common::Context::resolve(state, config.as_deref(), raw);

    match command {
        Commands::Token { action } => commands::token::handle(action, &context()?)?,
        Commands::Query { action } => commands::query::handle(action, &context()?)?,
        Commands::Account { label } => commands::query::account(&label),
        Commands::Config { action } => commands::config::handle(action, &context()?)?,
    }

    Ok(())
}

fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

// ─────────────────────────────────────────────────────────────────
// UNIT TESTS
// ─────────────────────────────────────────────────────────────────
