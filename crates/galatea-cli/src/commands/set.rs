//! Substrate-set commands.

use anyhow::Result;
use colored::Colorize;

use super::{done, print_page_footer, Context};

pub fn add(ctx: &mut Context, id: Option<&str>, name: &str) -> Result<()> {
    let set = ctx.catalog.create_substrate_set(id, name)?;
    done(format!("Created substrate set {} ({})", set.name.bold(), set.id.to_string().cyan()));
    Ok(())
}

pub fn list(ctx: &Context, page: usize, page_size: Option<usize>) -> Result<()> {
    let page = ctx.catalog.list_substrate_sets(page, ctx.page_size(page_size))?;

    println!("{}", "Substrate sets".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    for set in &page.items {
        println!(
            "  {:<38} {:<24} {} substrates, {} mixes",
            set.id.to_string().cyan(),
            set.name,
            set.substrate_count(),
            set.mixed_substrate_count()
        );
    }
    print_page_footer(&page);
    Ok(())
}

pub fn show(ctx: &Context, id: &str) -> Result<()> {
    let set = ctx.catalog.get_substrate_set(id)?;

    println!("{}", set.name.white().bold());
    println!("  Id: {}", set.id.to_string().cyan());
    println!();

    println!("{}", "Substrates".blue().bold());
    for s in set.get_substrates() {
        let users = set.mixes_using(&s.id).len();
        println!("  {:<38} {:<24} used by {} mixes", s.id.to_string().cyan(), s.name, users);
    }
    println!();

    println!("{}", "Mixes".blue().bold());
    for ms in set.get_mixed_substrates() {
        let parts: Vec<String> = ms
            .get_substrates()
            .iter()
            .map(|sp| format!("{} {:.0}%", sp.substrate.name, sp.percentage))
            .collect();
        println!("  {:<38} {:<24} {}", ms.id.to_string().cyan(), ms.name, parts.join(", ").dimmed());
    }
    Ok(())
}

pub fn rename(ctx: &mut Context, id: &str, name: &str) -> Result<()> {
    ctx.catalog.rename_substrate_set(id, name)?;
    done(format!("Renamed substrate set {}", id.cyan()));
    Ok(())
}

pub fn remove(ctx: &mut Context, id: &str) -> Result<()> {
    ctx.catalog.delete_substrate_set(id)?;
    done(format!("Deleted substrate set {}", id.cyan()));
    Ok(())
}

pub fn add_substrate(ctx: &mut Context, set: &str, substrate: &str) -> Result<()> {
    ctx.catalog.add_substrate_to_set(set, substrate)?;
    done(format!("Added {} to {}", substrate.cyan(), set.cyan()));
    Ok(())
}

pub fn remove_substrate(ctx: &mut Context, set: &str, substrate: &str) -> Result<()> {
    ctx.catalog.remove_substrate_from_set(set, substrate)?;
    done(format!("Removed {} from {}", substrate.cyan(), set.cyan()));
    Ok(())
}

pub fn add_mix(ctx: &mut Context, set: &str, mix: &str) -> Result<()> {
    ctx.catalog.add_mixed_substrate_to_set(set, mix)?;
    done(format!("Added mix {} to {}", mix.cyan(), set.cyan()));
    Ok(())
}

pub fn remove_mix(ctx: &mut Context, set: &str, mix: &str) -> Result<()> {
    ctx.catalog.remove_mixed_substrate_from_set(set, mix)?;
    done(format!("Removed mix {} from {}", mix.cyan(), set.cyan()));
    Ok(())
}

pub fn refresh_mix(ctx: &mut Context, set: &str, mix: &str) -> Result<()> {
    ctx.catalog.refresh_mixed_substrate_in_set(set, mix)?;
    done(format!("Refreshed mix {} in {}", mix.cyan(), set.cyan()));
    Ok(())
}
