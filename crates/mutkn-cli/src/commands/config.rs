// SPDX-License-Identifier: AGPL-3.0-only
use crate::commands::common::Context;
use crate::{print_success, ConfigCommands};
use colored::*;
use std::error::Error;
use std::path::Path;

pub fn handle(action: ConfigCommands, ctx: &Context) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigCommands::Init { output, force } => init(ctx, &output, force)?,
        ConfigCommands::Show => show(ctx),
    }
    Ok(())
}

fn init(ctx: &Context, output: &Path, force: bool) -> Result<(), Box<dyn Error>> {
    if output.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            output.display()
        )
        .into());
    }
    ctx.config.validate()?;
    ctx.config.save_to_file(output)?;
    print_success(&format!("Wrote config to {}", output.display()));
    Ok(())
}

fn show(ctx: &Context) {
    let token = &ctx.config.token;
    println!("{}", "[token]".bold());
    println!("    {}: {}", "name".dimmed(), token.name);
    println!("    {}: {}", "symbol".dimmed(), token.symbol.yellow());
    println!("    {}: {}", "initial_supply".dimmed(), token.initial_supply);
    println!("    {}: {}", "approval_policy".dimmed(), token.approval_policy);
    println!("{}", "[state]".bold());
    println!(
        "    {}: {}",
        "path".dimmed(),
        ctx.store.path().display()
    );
}
