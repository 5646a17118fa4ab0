//! Amap CLI commands.

use clap::Subcommand;
use lbs::coord::LngLat;
use lbs::provider::RegeoOptions;

use super::common::{amap_client, load_config, print_json};
use crate::error::CliError;

/// Amap subcommands.
#[derive(Debug, Subcommand)]
pub enum AmapCommands {
    /// Geocode an address
    Geo {
        address: String,
        /// City name, citycode or adcode to narrow the search
        #[arg(long)]
        city: Option<String>,
    },

    /// Reverse geocode a GCJ02 point
    Regeo {
        #[arg(allow_negative_numbers = true)]
        lng: f64,
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        /// Search radius in metres
        #[arg(long)]
        radius: Option<u32>,
    },
}

/// Run an Amap subcommand.
pub fn run(command: AmapCommands) -> Result<(), CliError> {
    let client = amap_client(&load_config())?;

    let result = match command {
        AmapCommands::Geo { address, city } => client.geo(&address, city.as_deref())?,
        AmapCommands::Regeo { lng, lat, radius } => {
            let options = RegeoOptions {
                radius,
                ..Default::default()
            };
            client.regeo(LngLat::new(lng, lat), &options)?
        }
    };
    print_json(&result)
}
