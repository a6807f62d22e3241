use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::generate;
use colored::*;
use roomwatch_core::config::{config_dir, MonitorConfig};
use roomwatch_core::ports::Permission;
use roomwatch_library::FileIdentity;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use roomwatch_manager::commands::{self, dashboard::DashboardOptions};
use roomwatch_manager::logging;

#[derive(Parser)]
#[command(name = "roomwatch")]
#[command(about = "ROOMWATCH - hostel room temperature, humidity and light monitor")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (TOML or YAML)
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        /// Email address (prompted if omitted)
        email: Option<String>,
    },

    /// Sign in
    Login {
        /// Email address (prompted if omitted)
        email: Option<String>,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Open the live dashboard
    Dashboard {
        /// Use Terminal UI mode instead of line output
        #[arg(short = 't', long = "tui")]
        tui: bool,

        /// Feed the store from the sensor simulator
        #[arg(short = 's', long = "simulate")]
        simulate: bool,

        /// Seed the store from a JSON export
        #[arg(long = "snapshot", value_name = "FILE")]
        snapshot: Option<PathBuf>,

        /// Locate the sensor paths in the data before subscribing
        #[arg(long = "probe")]
        probe: bool,

        /// Notification permission: granted, denied or prompt
        #[arg(long = "notifications", default_value = "prompt")]
        notifications: Permission,

        /// Simulator random seed
        #[arg(long = "seed")]
        seed: Option<u64>,

        /// Do not ring the terminal bell on alarms
        #[arg(long = "mute")]
        mute: bool,
    },

    /// Look for sensor data in a JSON export
    Probe {
        /// JSON export of the database
        snapshot: PathBuf,

        /// Print the report as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    #[command(hide = true)]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// List the files searched for configuration
    Paths,
    /// Write the default configuration to ~/.roomwatch/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_command(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_command(cli: Cli) -> Result<()> {
    let tui = matches!(cli.command, Commands::Dashboard { tui: true, .. });
    if tui {
        let dir = config_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        logging::init_file(&dir.join("roomwatch.log"))?;
    } else {
        logging::init_stderr();
    }

    match cli.command {
        Commands::Signup { email } => {
            commands::auth::run_signup(&FileIdentity::open_default()?, email)
        }
        Commands::Login { email } => commands::auth::run_login(&FileIdentity::open_default()?, email),
        Commands::Logout => commands::auth::run_logout(&FileIdentity::open_default()?),
        Commands::Whoami => commands::auth::run_whoami(&FileIdentity::open_default()?),

        Commands::Dashboard {
            tui,
            simulate,
            snapshot,
            probe,
            notifications,
            seed,
            mute,
        } => {
            let config = MonitorConfig::load(cli.config.as_deref())?;
            let identity = Arc::new(FileIdentity::open_default()?);
            let options = DashboardOptions {
                tui,
                simulate,
                snapshot,
                probe,
                notifications,
                seed,
                mute,
            };
            if !tui {
                println!("{} Opening ROOMWATCH dashboard...", "→".cyan());
            }
            tokio::runtime::Runtime::new()?.block_on(commands::dashboard::run_dashboard(
                config, identity, options,
            ))
        }

        Commands::Probe { snapshot, json } => commands::probe::run_probe(&snapshot, json),

        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show(cli.config.as_deref()),
            ConfigCommands::Paths => commands::config::paths(),
            ConfigCommands::Init { force } => commands::config::init(force),
        },

        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut io::stdout());
            Ok(())
        }
    }
}
