//! Probe a database snapshot for the sensor layout

use anyhow::Result;
use colored::*;
use roomwatch_library::store::{probe, MemoryStore};
use std::path::Path;

pub fn run_probe(snapshot: &Path, json: bool) -> Result<()> {
    let store = MemoryStore::from_snapshot(snapshot)?;
    let report = probe(&store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "Root keys:".cyan().bold(), report.root_keys.join(", "));
    println!();
    for (candidate, present) in &report.candidates {
        if *present {
            println!("  {} {}", "✓".green(), candidate);
        } else {
            println!("  {} {}", "✗".dimmed(), candidate.dimmed());
        }
    }
    println!();

    match report.paths {
        Some(paths) => {
            println!("{}", "Sensor paths:".green().bold());
            println!("  temperature = {}", paths.temperature.yellow());
            println!("  humidity    = {}", paths.humidity.yellow());
            println!("  light       = {}", paths.light.yellow());
            println!("  alerts      = {}", paths.alerts.yellow());
        }
        None => println!("{}", "No temperature data found at any known path".yellow()),
    }
    Ok(())
}
