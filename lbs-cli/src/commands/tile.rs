//! Tile commands - pixel, tile and quad key arithmetic.

use clap::Subcommand;
use lbs::tile::{self, QuadKey, MAX_LEVEL};

use crate::error::CliError;

fn level_parser() -> clap::builder::RangedI64ValueParser<u8> {
    clap::value_parser!(u8).range(0..=MAX_LEVEL as i64)
}

/// Tile subcommands.
#[derive(Debug, Subcommand)]
pub enum TileCommands {
    /// Project a latitude/longitude to pixel coordinates
    Pixel {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
        #[arg(value_parser = level_parser())]
        level: u8,
    },

    /// Convert pixel coordinates back to latitude/longitude
    Latlng {
        px: u32,
        py: u32,
        #[arg(value_parser = level_parser())]
        level: u8,
    },

    /// Build the quad key for a tile
    Quadkey {
        tx: u32,
        ty: u32,
        #[arg(value_parser = level_parser())]
        level: u8,
    },

    /// Decode a quad key to tile coordinates and level
    Decode { quadkey: String },

    /// Show ground resolution and map scale
    Resolution {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(value_parser = level_parser())]
        level: u8,
        /// Screen resolution in dots per inch
        #[arg(long, default_value_t = 96.0)]
        dpi: f64,
    },
}

/// Run a tile subcommand.
pub fn run(command: TileCommands) -> Result<(), CliError> {
    println!("{}", render(command)?);
    Ok(())
}

/// Computes the output line for a subcommand.
pub fn render(command: TileCommands) -> Result<String, CliError> {
    let output = match command {
        TileCommands::Pixel { lat, lng, level } => {
            let (px, py) = tile::lat_long_to_pixel_xy(lat, lng, level);
            let (tx, ty) = tile::pixel_xy_to_tile_xy(px, py);
            format!(
                "pixel {} {}\ntile {} {}\nquadkey {}",
                px,
                py,
                tx,
                ty,
                tile::tile_xy_to_quad_key(tx, ty, level)
            )
        }
        TileCommands::Latlng { px, py, level } => {
            let (lat, lng) = tile::pixel_xy_to_lat_long(px, py, level);
            format!("{:.6} {:.6}", lat, lng)
        }
        TileCommands::Quadkey { tx, ty, level } => tile::tile_xy_to_quad_key(tx, ty, level),
        TileCommands::Decode { quadkey } => {
            let key: QuadKey = quadkey.parse()?;
            let (tx, ty) = key.tile_xy();
            let (lat, lng) = tile::tile_xy_to_lat_long(tx, ty, key.level());
            format!(
                "tile {} {}\nlevel {}\nnorthwest {:.6} {:.6}",
                tx,
                ty,
                key.level(),
                lat,
                lng
            )
        }
        TileCommands::Resolution { lat, level, dpi } => {
            if dpi <= 0.0 {
                return Err(CliError::InvalidArgument(format!(
                    "dpi must be positive, got {}",
                    dpi
                )));
            }
            format!(
                "ground resolution {:.4} m/px\nmap scale 1:{:.2}",
                tile::ground_resolution(lat, level),
                tile::map_scale(lat, level, dpi)
            )
        }
    };
    Ok(output)
}
