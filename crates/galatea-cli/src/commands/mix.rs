//! Mixed-substrate commands.

use anyhow::Result;
use colored::Colorize;
use galatea::prelude::*;

use super::{done, print_page_footer, Context};

pub fn add(ctx: &mut Context, id: Option<&str>, name: &str, color: &str) -> Result<()> {
    let mix = ctx.catalog.create_mixed_substrate(id, name, color)?;
    done(format!("Created mix {} ({})", mix.name.bold(), mix.id.to_string().cyan()));
    Ok(())
}

pub fn list(ctx: &Context, page: usize, page_size: Option<usize>, containing: Option<&str>) -> Result<()> {
    let page_size = ctx.page_size(page_size);
    let page = match containing {
        Some(substrate) => ctx.catalog.mixes_containing(substrate, page, page_size)?,
        None => ctx.catalog.list_mixed_substrates(page, page_size)?,
    };

    println!("{}", "Mixed substrates".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    for ms in &page.items {
        println!(
            "  {:<38} {:<24} {} components, {}",
            ms.id.to_string().cyan(),
            ms.name,
            ms.len(),
            completeness(ms)
        );
    }
    print_page_footer(&page);
    Ok(())
}

pub fn show(ctx: &Context, id: &str) -> Result<()> {
    let ms = ctx.catalog.get_mixed_substrate(id)?;

    println!("{}", ms.name.white().bold());
    println!("  Id:     {}", ms.id.to_string().cyan());
    println!("  Color:  {}", ms.color);
    println!("  Status: {}", completeness(&ms));
    println!();
    for sp in ms.get_substrates() {
        println!("  {:>7.2}%  {}", sp.percentage, sp.substrate.name);
    }
    Ok(())
}

pub fn update(ctx: &mut Context, id: &str, name: &str, color: &str) -> Result<()> {
    ctx.catalog.update_mixed_substrate(id, name, color)?;
    done(format!("Updated mix {}", id.cyan()));
    Ok(())
}

pub fn remove(ctx: &mut Context, id: &str) -> Result<()> {
    ctx.catalog.delete_mixed_substrate(id)?;
    done(format!("Deleted mix {}", id.cyan()));
    Ok(())
}

pub fn put(ctx: &mut Context, mix: &str, substrate: &str, percentage: f64) -> Result<()> {
    ctx.catalog.add_substrate_to_mix(mix, substrate, percentage)?;
    report_remaining(ctx, mix)
}

pub fn drop(ctx: &mut Context, mix: &str, substrate: &str) -> Result<()> {
    ctx.catalog.remove_substrate_from_mix(mix, substrate)?;
    report_remaining(ctx, mix)
}

pub fn share(ctx: &mut Context, mix: &str, substrate: &str, percentage: f64) -> Result<()> {
    ctx.catalog.update_substrate_percentage(mix, substrate, percentage)?;
    report_remaining(ctx, mix)
}

fn report_remaining(ctx: &Context, mix: &str) -> Result<()> {
    let ms = ctx.catalog.get_mixed_substrate(mix)?;
    done(format!("{}: {}", ms.name.bold(), completeness(&ms)));
    Ok(())
}

fn completeness(ms: &MixedSubstrate) -> String {
    if ms.is_empty() {
        "empty".dimmed().to_string()
    } else if ms.validate().is_ok() {
        "complete".green().to_string()
    } else {
        format!("{:.2}% left", ms.remaining_percentage()).yellow().to_string()
    }
}
