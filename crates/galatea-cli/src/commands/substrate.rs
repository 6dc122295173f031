//! Substrate commands.

use anyhow::Result;
use colored::Colorize;
use galatea::prelude::*;

use super::{done, print_page_footer, Context};

pub fn add(ctx: &mut Context, id: Option<&str>, name: &str, color: &str) -> Result<()> {
    let substrate = ctx.catalog.create_substrate(id, name, color)?;
    done(format!("Created substrate {} ({})", substrate.name.bold(), substrate.id.to_string().cyan()));
    Ok(())
}

pub fn list(ctx: &Context, page: usize, page_size: Option<usize>) -> Result<()> {
    let page = ctx.catalog.list_substrates(page, ctx.page_size(page_size))?;

    println!("{}", "Substrates".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    for s in &page.items {
        println!("  {:<38} {:<24} {}", s.id.to_string().cyan(), s.name, s.color.dimmed());
    }
    print_page_footer(&page);
    Ok(())
}

pub fn show(ctx: &Context, id: &str) -> Result<()> {
    let substrate = ctx.catalog.get_substrate(id)?;
    let users = ctx.catalog.mixes_containing(id, 1, ctx.page_size(None))?;

    println!("{}", substrate.name.white().bold());
    println!("  Id:     {}", substrate.id.to_string().cyan());
    println!("  Color:  {}", substrate.color);
    println!("  Mixes:  {}", users.total_count.to_string().cyan());
    for ms in &users.items {
        println!("    {} {}", "•".dimmed(), ms.name);
    }
    Ok(())
}

pub fn update(ctx: &mut Context, id: &str, name: &str, color: &str) -> Result<()> {
    ctx.catalog.update_substrate(id, name, color)?;
    done(format!("Updated substrate {}", id.cyan()));
    Ok(())
}

pub fn remove(ctx: &mut Context, id: &str) -> Result<()> {
    ctx.catalog.delete_substrate(id)?;
    done(format!("Deleted substrate {}", id.cyan()));
    Ok(())
}
