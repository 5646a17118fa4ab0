//! Convert command - transform a point between coordinate systems.

use clap::Args;
use lbs::coord::{convert, CoordSystem, LngLat};

use crate::error::CliError;

/// Arguments for `lbs convert`.
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Source system: wgs84, gcj02 or bd09
    #[arg(long)]
    pub from: CoordSystem,

    /// Target system: wgs84, gcj02 or bd09
    #[arg(long)]
    pub to: CoordSystem,

    /// Longitude in degrees
    #[arg(allow_negative_numbers = true)]
    pub lng: f64,

    /// Latitude in degrees
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,
}

/// Run the convert command.
pub fn run(args: ConvertArgs) -> Result<(), CliError> {
    let point = convert(LngLat::new(args.lng, args.lat), args.from, args.to);
    println!("{}", format_point(point));
    Ok(())
}

/// Formats a point as `lng,lat` with six decimals (about 0.1 m).
pub fn format_point(point: LngLat) -> String {
    format!("{:.6},{:.6}", point.lng, point.lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_point() {
        assert_eq!(
            format_point(LngLat::new(116.41362900001, 39.9)),
            "116.413629,39.900000"
        );
    }
}
