//! Config file commands

use anyhow::{bail, Context, Result};
use colored::*;
use roomwatch_core::config::{config_dir, MonitorConfig};
use std::path::Path;

/// Print the effective configuration as TOML
pub fn show(explicit: Option<&Path>) -> Result<()> {
    let config = MonitorConfig::load(explicit)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

/// List the config search path
pub fn paths() -> Result<()> {
    println!("{}", "Config search order:".cyan().bold());
    for path in MonitorConfig::search_paths() {
        let marker = if path.is_file() {
            "✓".green()
        } else {
            "·".dimmed()
        };
        println!("  {} {}", marker, path.display());
    }
    Ok(())
}

/// Write the default configuration to `~/.roomwatch/config.toml`
pub fn init(force: bool) -> Result<()> {
    let dir = config_dir().context("Could not determine home directory")?;
    let path = dir.join("config.toml");
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    std::fs::write(&path, MonitorConfig::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}
