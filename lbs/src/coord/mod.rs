//! Coordinate conversion module
//!
//! Converts points between the three reference systems used by Chinese
//! mapping providers: WGS84 (GPS), GCJ02 (Amap, QQ) and BD09 (Baidu).
//!
//! The offsets are the closed-form empirical formulas the providers use for
//! coordinate obfuscation, not a geodetic datum shift. Constants and term
//! structure are kept literal so results match other implementations to the
//! last bit.
//!
//! # Example
//!
//! ```
//! use lbs::coord::{convert, CoordSystem, LngLat};
//!
//! let gps = LngLat::new(116.407387, 39.904179);
//! let baidu = convert(gps, CoordSystem::Wgs84, CoordSystem::Bd09);
//! assert!((baidu.lng - 116.420033).abs() < 1e-5);
//! ```

mod types;

pub use types::{CoordError, CoordSystem, LngLat};

use std::f64::consts::PI;

/// Angular scale used by the BD09 polar offset.
pub const X_PI: f64 = PI * 3000.0 / 180.0;

/// Semi-major axis of the Krasovsky 1940 ellipsoid used by GCJ02.
pub const A: f64 = 6378245.0;

/// Eccentricity squared of the Krasovsky 1940 ellipsoid.
#[allow(clippy::excessive_precision)]
pub const EE: f64 = 0.00669342162296594323;

/// Convergence threshold for the iterative GCJ02 -> WGS84 inverse, in degrees.
const INVERSE_EPSILON: f64 = 1e-7;

/// Iteration cap for the GCJ02 -> WGS84 inverse.
const INVERSE_MAX_ITERATIONS: usize = 30;

/// Converts GCJ02 to BD09.
#[inline]
pub fn gcj02_to_bd09(lng: f64, lat: f64) -> (f64, f64) {
    let z = (lng * lng + lat * lat).sqrt() + 0.00002 * (lat * X_PI).sin();
    let theta = lat.atan2(lng) + 0.000003 * (lng * X_PI).cos();
    (z * theta.cos() + 0.0065, z * theta.sin() + 0.006)
}

/// Converts BD09 to GCJ02.
///
/// This is an approximate inverse of [`gcj02_to_bd09`]: a round trip lands
/// within about 1e-5 degrees, and repeated round trips drift.
#[inline]
pub fn bd09_to_gcj02(lng: f64, lat: f64) -> (f64, f64) {
    let x = lng - 0.0065;
    let y = lat - 0.006;
    let z = (x * x + y * y).sqrt() - 0.00002 * (y * X_PI).sin();
    let theta = y.atan2(x) - 0.000003 * (x * X_PI).cos();
    (z * theta.cos(), z * theta.sin())
}

/// Converts WGS84 to GCJ02.
///
/// Points outside [`in_china`] are returned unchanged.
pub fn wgs84_to_gcj02(lng: f64, lat: f64) -> (f64, f64) {
    if !in_china(lng, lat) {
        return (lng, lat);
    }
    let (d_lng, d_lat) = offset(lng, lat);
    (lng + d_lng, lat + d_lat)
}

/// Converts WGS84 to BD09.
pub fn wgs84_to_bd09(lng: f64, lat: f64) -> (f64, f64) {
    let (lng, lat) = wgs84_to_gcj02(lng, lat);
    gcj02_to_bd09(lng, lat)
}

/// Converts GCJ02 back to WGS84 by fixed-point iteration on the forward offset.
///
/// Points outside [`in_china`] are returned unchanged.
pub fn gcj02_to_wgs84(lng: f64, lat: f64) -> (f64, f64) {
    if !in_china(lng, lat) {
        return (lng, lat);
    }

    let (mut wgs_lng, mut wgs_lat) = (lng, lat);
    for _ in 0..INVERSE_MAX_ITERATIONS {
        let (d_lng, d_lat) = offset(wgs_lng, wgs_lat);
        let dx = wgs_lng + d_lng - lng;
        let dy = wgs_lat + d_lat - lat;
        if dx.abs() < INVERSE_EPSILON && dy.abs() < INVERSE_EPSILON {
            break;
        }
        wgs_lng -= dx;
        wgs_lat -= dy;
    }
    (wgs_lng, wgs_lat)
}

/// Converts BD09 back to WGS84.
pub fn bd09_to_wgs84(lng: f64, lat: f64) -> (f64, f64) {
    let (lng, lat) = bd09_to_gcj02(lng, lat);
    gcj02_to_wgs84(lng, lat)
}

/// Converts a point between any two reference systems.
pub fn convert(point: LngLat, from: CoordSystem, to: CoordSystem) -> LngLat {
    let (lng, lat) = (point.lng, point.lat);
    let converted = match (from, to) {
        (CoordSystem::Wgs84, CoordSystem::Gcj02) => wgs84_to_gcj02(lng, lat),
        (CoordSystem::Wgs84, CoordSystem::Bd09) => wgs84_to_bd09(lng, lat),
        (CoordSystem::Gcj02, CoordSystem::Bd09) => gcj02_to_bd09(lng, lat),
        (CoordSystem::Gcj02, CoordSystem::Wgs84) => gcj02_to_wgs84(lng, lat),
        (CoordSystem::Bd09, CoordSystem::Gcj02) => bd09_to_gcj02(lng, lat),
        (CoordSystem::Bd09, CoordSystem::Wgs84) => bd09_to_wgs84(lng, lat),
        _ => (lng, lat),
    };
    converted.into()
}

/// Returns true when the point lies inside the mainland China bounding box.
///
/// Outside this box no GCJ02 offset is applied.
#[inline]
pub fn in_china(lng: f64, lat: f64) -> bool {
    72.004 < lng && lng < 137.8347 && 0.8293 < lat && lat < 55.8271
}

/// The bounding test as older releases of the provider SDKs wrote it.
///
/// The comparisons are reversed, so this is false for every input. Kept for
/// callers that need output identical to those releases.
#[inline]
#[allow(clippy::nonminimal_bool)]
pub fn in_china_legacy(lng: f64, lat: f64) -> bool {
    72.004 > lng && lng > 137.8347 && 0.8293 > lat && lat > 55.8271
}

/// [`wgs84_to_gcj02`] gated by [`in_china_legacy`]; effectively the identity.
pub fn wgs84_to_gcj02_legacy(lng: f64, lat: f64) -> (f64, f64) {
    if !in_china_legacy(lng, lat) {
        return (lng, lat);
    }
    let (d_lng, d_lat) = offset(lng, lat);
    (lng + d_lng, lat + d_lat)
}

/// GCJ02 offset in degrees for a WGS84 point.
fn offset(lng: f64, lat: f64) -> (f64, f64) {
    let (lng_add, lat_add) = transform(lng - 105.0, lat - 35.0);

    let rad_lat = lat / 180.0 * PI;
    let magic = rad_lat.sin();
    let magic = 1.0 - EE * magic * magic;
    let sqrt_magic = magic.sqrt();

    let lat_add = (lat_add * 180.0) / ((A * (1.0 - EE)) / (magic * sqrt_magic) * PI);
    let lng_add = (lng_add * 180.0) / (A / sqrt_magic * rad_lat.cos() * PI);
    (lng_add, lat_add)
}

/// Raw empirical correction, in metres-ish units before ellipsoid scaling.
pub(crate) fn transform(x: f64, y: f64) -> (f64, f64) {
    let sqrt_x = x.abs().sqrt();
    let mut x_add = 300.0 + 1.0 * x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * sqrt_x;
    let mut y_add = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * sqrt_x;

    let t_x = (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    x_add += t_x;
    y_add += t_x;

    x_add += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    y_add += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;

    x_add += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    y_add += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;

    (x_add, y_add)
}
