//! Export items to JSON files and import them back.

use anyhow::{Context as _, Result};
use colored::Colorize;
use galatea::prelude::*;
use std::path::Path;

use super::{done, Context};
use crate::Kind;

pub fn export(ctx: &Context, kind: Kind, id: &str, output: &str) -> Result<()> {
    let path = Path::new(output);
    match kind {
        Kind::Substrate => export_substrate(&ctx.catalog.get_substrate(id)?, path),
        Kind::Mix => export_mixed_substrate(&ctx.catalog.get_mixed_substrate(id)?, path),
        Kind::Set => export_substrate_set(&ctx.catalog.get_substrate_set(id)?, path),
    }
    .with_context(|| format!("Failed to export to {}", path.display()))?;

    done(format!("Exported {} to {}", id.cyan(), path.display()));
    Ok(())
}

pub fn import(ctx: &mut Context, kind: Kind, input: &str) -> Result<()> {
    let path = Path::new(input);
    let context = || format!("Failed to import {}", path.display());

    let id = match kind {
        Kind::Substrate => {
            let substrate = import_substrate(path).with_context(context)?;
            ctx.catalog.import_substrate(substrate)?.id.to_string()
        }
        Kind::Mix => {
            let ms = import_mixed_substrate(path).with_context(context)?;
            ctx.catalog.import_mixed_substrate(ms)?.id.to_string()
        }
        Kind::Set => {
            let set = import_substrate_set(path).with_context(context)?;
            ctx.catalog.import_substrate_set(set)?.id.to_string()
        }
    };

    done(format!("Imported {} from {}", id.cyan(), path.display()));
    Ok(())
}
