//! Initialize a new Galatea project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::{Config, CONFIG_FILE, DATA_DIR};

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    println!("{} Initializing Galatea project...", "→".blue());
    let created = scaffold(&base_path)?;
    for path in &created {
        println!("  {} Created {}", "✓".green(), path.display());
    }

    let config_path = base_path.join(CONFIG_FILE);
    if !created.contains(&config_path) {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    println!();
    println!("{} Galatea project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} galatea substrate add Sand --color \"#c2b280\"", "1.".blue());
    println!("  {} galatea set add Nursery", "2.".blue());
    println!("  {} galatea stage add Bench -W 3 -H 3 --set <set-id>", "3.".blue());

    Ok(())
}

/// Create the data directory, default config and .gitignore; returns what was new.
fn scaffold(base_path: &Path) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();

    let data_dir = base_path.join(DATA_DIR);
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        created.push(data_dir.clone());
    }

    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        Config::default().save(&config_path)?;
        created.push(config_path);
    }

    let gitignore_path = data_dir.join(".gitignore");
    if !gitignore_path.exists() {
        std::fs::write(&gitignore_path, "*.db\n*.db-wal\n*.db-shm\n")?;
        created.push(gitignore_path);
    }

    Ok(created)
}
