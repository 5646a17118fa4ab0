//! LBS CLI - Command-line interface
//!
//! Coordinate conversion and tile arithmetic work offline. Provider commands
//! read their credentials from the config file (see `lbs config`).

mod commands;
mod error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::amap::AmapCommands;
use commands::baidu::BaiduCommands;
use commands::config::ConfigCommands;
use commands::convert::ConvertArgs;
use commands::qq::QqCommands;
use commands::tile::TileCommands;
use error::CliError;

/// Coordinate conversion, tile addressing and Chinese map provider APIs
#[derive(Debug, Parser)]
#[command(name = "lbs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Coordinate conversion, tile addressing and Chinese map provider APIs", long_about = None)]
struct Cli {
    /// Log filter (trace, debug, info, warn, error, or a tracing directive)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a point between WGS84, GCJ02 and BD09
    Convert(ConvertArgs),

    /// Pixel, tile and quad key arithmetic
    Tile {
        #[command(subcommand)]
        command: TileCommands,
    },

    /// Amap (高德) Web Service API
    Amap {
        #[command(subcommand)]
        command: AmapCommands,
    },

    /// QQ Maps (腾讯) Web Service API
    Qq {
        #[command(subcommand)]
        command: QqCommands,
    },

    /// Baidu Maps (百度) Web Service API
    Baidu {
        #[command(subcommand)]
        command: BaiduCommands,
    },

    /// View or edit the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Convert(args) => commands::convert::run(args),
        Commands::Tile { command } => commands::tile::run(command),
        Commands::Amap { command } => commands::amap::run(command),
        Commands::Qq { command } => commands::qq::run(command),
        Commands::Baidu { command } => commands::baidu::run(command),
        Commands::Config { command } => commands::config::run(command),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
