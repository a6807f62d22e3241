//! The `dashboard` command: wires the store, simulator and a terminal
//! surface to the reactor

use crate::dashboard_tui::{DashboardView, TuiDashboard, TuiDisplay};
use anyhow::{Context, Result};
use colored::*;
use parking_lot::Mutex;
use roomwatch_core::config::StorePaths;
use roomwatch_core::ports::{
    DisplaySurface, IdentityProvider, Permission, PushedRecordAdapter, ScalarLeafAdapter,
    SchemaAdapter, SchemaLayout,
};
use roomwatch_core::reactor::{Dashboard, DashboardRun, Reactor};
use roomwatch_core::{AlertKind, MonitorConfig, RoomwatchError};
use roomwatch_library::store::{probe, MemoryStore};
use roomwatch_library::{ConsoleDisplay, LogNotifier, SensorSimulator, SimConfig, TerminalBell};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub tui: bool,
    /// Drive the store with the sensor simulator
    pub simulate: bool,
    /// JSON export to seed the store with
    pub snapshot: Option<PathBuf>,
    /// Resolve sensor paths from the data before subscribing
    pub probe: bool,
    pub notifications: Permission,
    pub seed: Option<u64>,
    pub mute: bool,
}

pub async fn run_dashboard<I>(
    mut config: MonitorConfig,
    identity: Arc<I>,
    options: DashboardOptions,
) -> Result<()>
where
    I: IdentityProvider + ?Sized + 'static,
{
    let store = match &options.snapshot {
        Some(path) => MemoryStore::from_snapshot(path)?,
        None => MemoryStore::new(),
    };

    if options.probe {
        let report = probe(&store)?;
        match report.paths {
            Some(paths) => {
                info!("Using probed temperature path {}", paths.temperature);
                apply_probed_paths(&mut config, paths);
            }
            None => warn!("Probe found no temperature data, keeping configured paths"),
        }
    }

    if options.simulate {
        let sim_config = SimConfig {
            seed: options.seed,
            ..SimConfig::default()
        };
        let simulator = SensorSimulator::new(store.clone(), config.clone(), sim_config);
        tokio::spawn(simulator.run());
    }

    match config.schema {
        SchemaLayout::Scalar => {
            let schema = ScalarLeafAdapter::new(store);
            launch(config, schema, identity, &options).await
        }
        SchemaLayout::Records => {
            let schema = PushedRecordAdapter::new(store, &config.record_value_field);
            launch(config, schema, identity, &options).await
        }
    }
}

/// Take the probed sensor paths; the alerts path stays as configured
pub fn apply_probed_paths(config: &mut MonitorConfig, probed: StorePaths) {
    config.paths.temperature = probed.temperature;
    config.paths.humidity = probed.humidity;
    config.paths.light = probed.light;
}

async fn launch<S, I>(
    config: MonitorConfig,
    schema: S,
    identity: Arc<I>,
    options: &DashboardOptions,
) -> Result<()>
where
    S: SchemaAdapter + 'static,
    I: IdentityProvider + ?Sized + 'static,
{
    let view = Arc::new(Mutex::new(DashboardView {
        user: identity
            .current_session()
            .map(|s| s.email)
            .unwrap_or_default(),
        ..DashboardView::default()
    }));
    let display: Box<dyn DisplaySurface> = if options.tui {
        Box::new(TuiDisplay::new(view.clone()))
    } else {
        Box::new(ConsoleDisplay::stdout())
    };

    let reactor = Reactor::new(
        config,
        schema,
        display,
        LogNotifier::new(options.notifications),
        TerminalBell::stderr().muted(options.mute),
    );

    let run = match Dashboard::new(identity).enter(reactor) {
        Ok(run) => run,
        Err(RoomwatchError::Unauthenticated) => {
            println!(
                "{} Not signed in. Run {} first.",
                "✗".red(),
                "roomwatch login".yellow()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if options.tui {
        run_tui(run, view).await
    } else {
        run_console(run).await
    }
}

async fn run_tui(mut run: DashboardRun, view: Arc<Mutex<DashboardView>>) -> Result<()> {
    let tui = TuiDashboard::new(view, run.handle.clone());
    let mut ui = tokio::task::spawn_blocking(move || tui.run());

    tokio::select! {
        result = &mut ui => {
            result.context("Terminal UI task failed")??;
            run.stop().await?;
        }
        result = run.join() => {
            // The UI notices the closed reactor on its next frame
            ui.await.context("Terminal UI task failed")??;
            result?;
            println!("Session ended. Run {} to sign in again.", "roomwatch login".yellow());
        }
    }
    Ok(())
}

async fn run_console(mut run: DashboardRun) -> Result<()> {
    println!(
        "{} Dashboard running. Commands: {} ack temperature, {} ack light, {} quit",
        "→".cyan(),
        "t".yellow(),
        "l".yellow(),
        "q".yellow()
    );
    let handle = run.handle.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = line.context("Failed to read stdin")?;
                match line.as_deref().map(str::trim) {
                    Some("t") => handle.acknowledge(AlertKind::Temperature)?,
                    Some("l") => handle.acknowledge(AlertKind::Light)?,
                    Some("q") | None => break,
                    Some("") => {}
                    Some(other) => println!("Unknown command '{}'", other),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
            result = run.join() => {
                result?;
                println!("Session ended. Run {} to sign in again.", "roomwatch login".yellow());
                return Ok(());
            }
        }
    }

    run.stop().await?;
    Ok(())
}
