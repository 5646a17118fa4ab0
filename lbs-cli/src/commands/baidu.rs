//! Baidu Maps CLI commands.

use clap::Subcommand;
use lbs::provider::Params;

use super::common::{baidu_client, load_config, parse_param, print_json};
use crate::error::CliError;

/// Baidu Maps subcommands.
#[derive(Debug, Subcommand)]
pub enum BaiduCommands {
    /// Call any Web Service endpoint
    Get {
        /// Endpoint path, e.g. /place/v2/search
        path: String,

        /// Query parameters as name=value
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

/// Run a Baidu Maps subcommand.
pub fn run(command: BaiduCommands) -> Result<(), CliError> {
    let client = baidu_client(&load_config())?;

    match command {
        BaiduCommands::Get { path, params } => {
            let params = params
                .iter()
                .fold(Params::new(), |acc, (name, value)| acc.with(name, value));
            print_json(&client.get(&path, params)?)
        }
    }
}
