//! Stage commands.

use anyhow::Result;
use colored::Colorize;
use galatea::prelude::*;

use super::{done, print_page_footer, Context};

pub fn add(
    ctx: &mut Context,
    id: Option<&str>,
    name: &str,
    width: usize,
    height: usize,
    set: &str,
) -> Result<()> {
    let stage = ctx.catalog.create_stage(id, name, width, height, set)?;
    done(format!(
        "Created stage {} ({}) {}x{}",
        stage.name.bold(),
        stage.id.to_string().cyan(),
        width,
        height
    ));
    Ok(())
}

pub fn list(ctx: &Context, page: usize, page_size: Option<usize>) -> Result<()> {
    let page = ctx.catalog.list_stages(page, ctx.page_size(page_size))?;

    println!("{}", "Stages".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    for stage in &page.items {
        println!(
            "  {:<38} {:<24} {}x{} on {}",
            stage.id.to_string().cyan(),
            stage.name,
            stage.width(),
            stage.height(),
            stage.substrate_set_id()
        );
    }
    print_page_footer(&page);
    Ok(())
}

pub fn show(ctx: &Context, id: &str) -> Result<()> {
    let stage = ctx.catalog.get_stage(id)?;
    let set = ctx.catalog.stage_substrate_set(id)?;

    println!("{}", stage.name.white().bold());
    println!("  Id:       {}", stage.id.to_string().cyan());
    println!("  Set:      {} ({})", set.name, set.id.to_string().cyan());
    println!("  Size:     {}x{}", stage.width(), stage.height());
    println!("  Occupied: {}", stage.occupied_cells());
    if !stage.comment.is_empty() {
        println!("  Comment:  {}", stage.comment.dimmed());
    }
    println!();

    for row in stage.cells() {
        let line: Vec<String> = row.iter().map(render_cell).collect();
        println!("  {}", line.join(""));
    }
    Ok(())
}

pub fn update(ctx: &mut Context, id: &str, name: &str, comment: &str) -> Result<()> {
    ctx.catalog.update_stage(id, name, comment)?;
    done(format!("Updated stage {}", id.cyan()));
    Ok(())
}

pub fn remove(ctx: &mut Context, id: &str) -> Result<()> {
    ctx.catalog.delete_stage(id)?;
    done(format!("Deleted stage {}", id.cyan()));
    Ok(())
}

pub fn resize(ctx: &mut Context, id: &str, width: usize, height: usize) -> Result<()> {
    ctx.catalog.resize_stage(id, width, height)?;
    done(format!("Resized stage {} to {}x{}", id.cyan(), width, height));
    Ok(())
}

pub fn place_substrate(ctx: &mut Context, id: &str, x: usize, y: usize, substrate: &str) -> Result<()> {
    ctx.catalog.place_substrate(id, x, y, substrate)?;
    done(format!("Placed {} at ({}, {})", substrate.cyan(), x, y));
    Ok(())
}

pub fn place_mix(ctx: &mut Context, id: &str, x: usize, y: usize, mix: &str) -> Result<()> {
    ctx.catalog.place_mixed_substrate(id, x, y, mix)?;
    done(format!("Placed mix {} at ({}, {})", mix.cyan(), x, y));
    Ok(())
}

pub fn clear(ctx: &mut Context, id: &str, x: usize, y: usize) -> Result<()> {
    ctx.catalog.clear_cell(id, x, y)?;
    done(format!("Cleared ({}, {})", x, y));
    Ok(())
}

pub fn cell(ctx: &Context, id: &str, x: usize, y: usize) -> Result<()> {
    match ctx.catalog.get_cell(id, x, y)? {
        Cell::Empty => println!("({}, {}) {}", x, y, "empty".dimmed()),
        Cell::Substrate(s) => println!("({}, {}) substrate {} ({})", x, y, s.name.bold(), s.id),
        Cell::Mixed(ms) => println!("({}, {}) mix {} ({})", x, y, ms.name.bold(), ms.id),
    }
    Ok(())
}

pub fn change_set(ctx: &mut Context, id: &str, set: &str) -> Result<()> {
    let reset = ctx.catalog.change_stage_substrate_set(id, set)?;
    done(format!("Stage {} now uses {} ({} cells reset)", id.cyan(), set.cyan(), reset));
    Ok(())
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => "[ ]".dimmed().to_string(),
        Cell::Substrate(s) => format!("[S:{}]", s.id).green().to_string(),
        Cell::Mixed(ms) => format!("[M:{}]", ms.id).blue().to_string(),
    }
}
