// SPDX-License-Identifier: AGPL-3.0-only
use crate::commands::common::{resolve_address, Context};
use crate::{print_info, QueryCommands};
use colored::*;
use mutkn_core::Address;
use std::error::Error;

pub fn handle(action: QueryCommands, ctx: &Context) -> Result<(), Box<dyn Error>> {
    match action {
        QueryCommands::Info => info(ctx)?,
        QueryCommands::Balance { account } => balance(ctx, &account)?,
        QueryCommands::Allowance { owner, spender } => allowance(ctx, &owner, &spender)?,
        QueryCommands::Events { limit } => events(ctx, limit)?,
    }
    Ok(())
}

fn info(ctx: &Context) -> Result<(), Box<dyn Error>> {
    let ledger = ctx.load()?;

    println!(
        "{} ({})",
        ledger.name().bold(),
        ledger.symbol().yellow()
    );
    println!(
        "    {}: {}",
        "Supply".dimmed(),
        ctx.show_amount(&ledger, ledger.total_supply()).cyan()
    );
    println!("    {}: {}", "Decimals".dimmed(), ledger.decimals());
    println!(
        "    {}: {}",
        "Deployer".dimmed(),
        ledger.deployer().to_string().green()
    );
    println!("    {}: {}", "Approvals".dimmed(), ledger.approval_policy());
    println!(
        "    {}: {}",
        "Allowances".dimmed(),
        ledger.allowance_count()
    );
    println!("    {}: {}", "Events".dimmed(), ledger.event_log().len());
    println!();

    println!("{}", "Holders:".bold());
    let mut count = 0usize;
    for (holder, balance) in ledger.holders() {
        println!(
            "  {} {}  {}",
            "•".cyan(),
            holder.to_string().green(),
            ctx.show_amount(&ledger, balance)
        );
        count += 1;
    }
    println!();
    println!(
        "{} {} {}",
        "Total:".bold(),
        count.to_string().cyan(),
        "holder(s)".dimmed()
    );
    Ok(())
}

fn balance(ctx: &Context, account: &str) -> Result<(), Box<dyn Error>> {
    let account = resolve_address(account)?;
    let ledger = ctx.load()?;
    println!(
        "{} {}",
        account.to_string().green(),
        ctx.show_amount(&ledger, ledger.balance_of(account)).cyan()
    );
    Ok(())
}

fn allowance(ctx: &Context, owner: &str, spender: &str) -> Result<(), Box<dyn Error>> {
    let owner = resolve_address(owner)?;
    let spender = resolve_address(spender)?;
    let ledger = ctx.load()?;
    println!(
        "{} ⇢ {}  {}",
        owner.to_string().dimmed(),
        spender.to_string().green(),
        ctx.show_amount(&ledger, ledger.allowance(owner, spender)).cyan()
    );
    Ok(())
}

fn events(ctx: &Context, limit: Option<usize>) -> Result<(), Box<dyn Error>> {
    let ledger = ctx.load()?;
    let log = ledger.event_log();
    let skip = limit.map_or(0, |n| log.len().saturating_sub(n));

    if log.is_empty() {
        print_info("No events recorded.");
        return Ok(());
    }
    for logged in &log[skip..] {
        ctx.print_event(&ledger, logged.seq, &logged.event);
    }
    Ok(())
}

pub fn account(label: &str) {
    println!(
        "{} {}",
        format!("@{}", label).bold(),
        Address::from_label(label).to_string().green()
    );
}
