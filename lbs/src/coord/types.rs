//! Coordinate value types.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A geographic point in decimal degrees.
///
/// Longitude comes first, matching the `lng,lat` order every supported
/// provider uses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LngLat {
    /// Longitude in degrees
    pub lng: f64,
    /// Latitude in degrees
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for (f64, f64) {
    fn from(point: LngLat) -> Self {
        (point.lng, point.lat)
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lng, self.lat)
    }
}

/// Errors produced when parsing coordinate values from text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Unknown coordinate system name.
    #[error("Unknown coordinate system: {0} (expected wgs84, gcj02 or bd09)")]
    UnknownSystem(String),

    /// A `lng,lat` pair could not be parsed.
    #[error("Invalid coordinate pair: {0}")]
    InvalidPair(String),
}

impl FromStr for LngLat {
    type Err = CoordError;

    /// Parses `"lng,lat"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lng, lat) = s
            .split_once(',')
            .ok_or_else(|| CoordError::InvalidPair(s.to_string()))?;
        let lng = lng
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordError::InvalidPair(s.to_string()))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordError::InvalidPair(s.to_string()))?;
        Ok(Self { lng, lat })
    }
}

/// Reference systems used by Chinese mapping providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordSystem {
    /// GPS / global standard
    Wgs84,
    /// National obfuscated system ("Mars coordinates"), used by Amap and QQ
    Gcj02,
    /// Baidu's system, layered on top of GCJ02
    Bd09,
}

impl CoordSystem {
    pub fn name(&self) -> &'static str {
        match self {
            CoordSystem::Wgs84 => "wgs84",
            CoordSystem::Gcj02 => "gcj02",
            CoordSystem::Bd09 => "bd09",
        }
    }
}

impl fmt::Display for CoordSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoordSystem {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wgs84" | "gps" => Ok(CoordSystem::Wgs84),
            "gcj02" | "gcj" | "mars" => Ok(CoordSystem::Gcj02),
            "bd09" | "baidu" => Ok(CoordSystem::Bd09),
            _ => Err(CoordError::UnknownSystem(s.to_string())),
        }
    }
}
