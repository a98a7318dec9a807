// SPDX-License-Identifier: AGPL-3.0-only
use crate::commands::common::{resolve_address, Context};
use crate::{print_info, print_success, TokenCommands};
use colored::*;
use mutkn_token::{Receipt, TokenError, TokenLedger};
use std::error::Error;

pub fn handle(action: TokenCommands, ctx: &Context) -> Result<(), Box<dyn Error>> {
    match action {
        TokenCommands::Deploy {
            deployer,
            name,
            symbol,
            supply,
            approval_policy,
            force,
        } => deploy(
            ctx,
            &deployer,
            name,
            symbol,
            supply,
            approval_policy.as_deref(),
            force,
        )?,
        TokenCommands::Transfer { from, to, amount } => {
            let caller = resolve_address(&from)?;
            let to = resolve_address(&to)?;
            let amount = ctx.parse_amount(&amount)?;
            commit(ctx, |ledger| ledger.transfer(caller, to, amount))?
        }
        TokenCommands::Approve {
            owner,
            spender,
            amount,
        } => {
            let caller = resolve_address(&owner)?;
            let spender = resolve_address(&spender)?;
            let amount = ctx.parse_amount(&amount)?;
            commit(ctx, |ledger| ledger.approve(caller, spender, amount))?
        }
        TokenCommands::TransferFrom {
            spender,
            owner,
            to,
            amount,
        } => {
            let caller = resolve_address(&spender)?;
            let owner = resolve_address(&owner)?;
            let to = resolve_address(&to)?;
            let amount = ctx.parse_amount(&amount)?;
            commit(ctx, |ledger| ledger.transfer_from(caller, owner, to, amount))?
        }
        TokenCommands::Exec { caller, json } => exec(ctx, &caller, &json)?,
    }
    Ok(())
}

fn deploy(
    ctx: &Context,
    deployer: &str,
    name: Option<String>,
    symbol: Option<String>,
    supply: Option<u128>,
    approval_policy: Option<&str>,
    force: bool,
) -> Result<(), Box<dyn Error>> {
    let _lock = ctx.store.lock()?;
    if ctx.store.exists() && !force {
        return Err(format!(
            "a ledger is already deployed at {} (use --force to replace it)",
            ctx.store.path().display()
        )
        .into());
    }

    let mut config = ctx.config.clone();
    if let Some(name) = name {
        config.token.name = name;
    }
    if let Some(symbol) = symbol {
        config.token.symbol = symbol;
    }
    if let Some(supply) = supply {
        config.token.initial_supply = supply;
    }
    if let Some(policy) = approval_policy {
        config.token.approval_policy = policy.parse()?;
    }
    config.validate()?;

    let deployer = resolve_address(deployer)?;
    let ledger = TokenLedger::from_config(deployer, &config)?;
    ctx.save(&ledger)?;

    print_success(&format!(
        "Deployed {} ({})",
        ledger.name().bold(),
        ledger.symbol().yellow()
    ));
    println!("    {}: {}", "Deployer".dimmed(), deployer.to_string().green());
    println!(
        "    {}: {}",
        "Supply".dimmed(),
        ctx.show_amount(&ledger, ledger.total_supply()).cyan()
    );
    println!("    {}: {}", "Decimals".dimmed(), ledger.decimals());
    println!("    {}: {}", "Approvals".dimmed(), ledger.approval_policy());
    println!(
        "    {}: {}",
        "State".dimmed(),
        ctx.store.path().display()
    );
    Ok(())
}

/// Load, apply one mutation, persist, print its events, all under the store
/// lock. A rejected mutation is returned as an error and nothing is written.
fn commit<F>(ctx: &Context, op: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut TokenLedger) -> Result<Receipt, TokenError>,
{
    let _lock = ctx.store.lock()?;
    let mut ledger = ctx.load()?;
    let receipt = op(&mut ledger)?;
    ctx.save(&ledger)?;

    print_success("Committed");
    for (offset, event) in receipt.events.iter().enumerate() {
        ctx.print_event(&ledger, receipt.seq + offset as u64, event);
    }
    Ok(())
}

fn exec(ctx: &Context, caller: &str, json: &str) -> Result<(), Box<dyn Error>> {
    let caller = resolve_address(caller)?;
    let _lock = ctx.store.lock()?;
    let mut ledger = ctx.load()?;
    let response = ledger.execute_json(caller, json);

    if !response.success {
        return Err(response.message.into());
    }
    if !response.events.is_empty() {
        ctx.save(&ledger)?;
    } else {
        print_info("Read-only action, state unchanged");
    }
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
