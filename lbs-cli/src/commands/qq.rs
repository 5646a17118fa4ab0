//! QQ Maps CLI commands.

use clap::Subcommand;

use super::common::{load_config, print_json, qq_client};
use crate::error::CliError;

/// QQ Maps subcommands.
#[derive(Debug, Subcommand)]
pub enum QqCommands {
    /// Geocode an address
    Geocoder {
        address: String,
        /// City to restrict the search to
        #[arg(long)]
        region: Option<String>,
    },

    /// Locate an IP address
    Ip { ip: String },
}

/// Run a QQ Maps subcommand.
pub fn run(command: QqCommands) -> Result<(), CliError> {
    let client = qq_client(&load_config())?;

    let result = match command {
        QqCommands::Geocoder { address, region } => {
            client.geocoder(&address, region.as_deref())?
        }
        QqCommands::Ip { ip } => client.ip(&ip)?,
    };
    print_json(&result)
}
