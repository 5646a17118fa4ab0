//! Tile addressing module
//!
//! Web Mercator math for tiled maps: conversions between geographic
//! coordinates, pixel coordinates in the full map image at a level, 256×256
//! tile indices, and Bing-style quad keys.
//!
//! Out-of-range inputs are clamped rather than rejected, so slightly
//! overshooting viewport math still lands on a valid pixel. The only
//! fallible operation is quad key decoding.
//!
//! # Example
//!
//! ```
//! use lbs::tile;
//!
//! let (px, py) = tile::lat_long_to_pixel_xy(0.0, 0.0, 1);
//! assert_eq!((px, py), (256, 256));
//! assert_eq!(tile::tile_xy_to_quad_key(3, 5, 3), "213");
//! ```

mod types;

pub use types::{QuadKey, TileError};

use std::f64::consts::PI;

/// Equatorial radius of the WGS84 ellipsoid in metres.
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Southern limit of the projection. Beyond this Mercator diverges.
pub const MIN_LATITUDE: f64 = -85.05112878;

/// Northern limit of the projection.
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Western limit of the projection.
pub const MIN_LONGITUDE: f64 = -180.0;

/// Eastern limit of the projection.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Edge length of a tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Deepest level whose pixel coordinates fit in a `u32`.
pub const MAX_LEVEL: u8 = 23;

/// Clamps `value` to `[min, max]`.
#[inline]
pub fn clip<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Width and height of the map image at `level`, in pixels.
///
/// Levels above [`MAX_LEVEL`] are clamped to it.
#[inline]
pub fn map_size(level: u8) -> u32 {
    TILE_SIZE << level.min(MAX_LEVEL)
}

/// Ground resolution in metres per pixel at the given latitude and level.
pub fn ground_resolution(latitude: f64, level: u8) -> f64 {
    let latitude = clip(latitude, MIN_LATITUDE, MAX_LATITUDE);
    (latitude * PI / 180.0).cos() * 2.0 * PI * EARTH_RADIUS / map_size(level) as f64
}

/// Map scale, expressed as the denominator N of the ratio 1:N.
///
/// # Arguments
///
/// * `latitude` - Latitude in degrees
/// * `level` - Level of detail
/// * `screen_dpi` - Screen resolution in dots per inch
pub fn map_scale(latitude: f64, level: u8, screen_dpi: f64) -> f64 {
    ground_resolution(latitude, level) * screen_dpi / 0.0254
}

/// Projects a latitude/longitude to pixel coordinates at `level`.
///
/// Inputs are clamped to the projection's domain and the result to the map
/// image, so every input yields a valid pixel.
pub fn lat_long_to_pixel_xy(latitude: f64, longitude: f64, level: u8) -> (u32, u32) {
    let latitude = clip(latitude, MIN_LATITUDE, MAX_LATITUDE);
    let longitude = clip(longitude, MIN_LONGITUDE, MAX_LONGITUDE);

    let x = (longitude + 180.0) / 360.0;
    let sin_latitude = (latitude * PI / 180.0).sin();
    let y = 0.5 - ((1.0 + sin_latitude) / (1.0 - sin_latitude)).ln() / (4.0 * PI);

    let size = map_size(level) as f64;
    let pixel_x = clip(x * size + 0.5, 0.0, size - 1.0) as u32;
    let pixel_y = clip(y * size + 0.5, 0.0, size - 1.0) as u32;
    (pixel_x, pixel_y)
}

/// Inverse of [`lat_long_to_pixel_xy`]; returns `(latitude, longitude)`.
pub fn pixel_xy_to_lat_long(pixel_x: u32, pixel_y: u32, level: u8) -> (f64, f64) {
    let size = map_size(level);
    let x = clip(pixel_x, 0, size - 1) as f64 / size as f64 - 0.5;
    let y = 0.5 - clip(pixel_y, 0, size - 1) as f64 / size as f64;

    let latitude = 90.0 - 360.0 * (-y * 2.0 * PI).exp().atan() / PI;
    let longitude = 360.0 * x;
    (latitude, longitude)
}

/// Tile containing the given pixel.
#[inline]
pub fn pixel_xy_to_tile_xy(pixel_x: u32, pixel_y: u32) -> (u32, u32) {
    (pixel_x / TILE_SIZE, pixel_y / TILE_SIZE)
}

/// Top-left pixel of the given tile.
///
/// Tile indices are clamped to the last tile at [`MAX_LEVEL`].
#[inline]
pub fn tile_xy_to_pixel_xy(tile_x: u32, tile_y: u32) -> (u32, u32) {
    let max_tile = map_size(MAX_LEVEL) / TILE_SIZE - 1;
    (
        tile_x.min(max_tile) * TILE_SIZE,
        tile_y.min(max_tile) * TILE_SIZE,
    )
}

/// Tile containing a latitude/longitude at `level`.
pub fn lat_long_to_tile_xy(latitude: f64, longitude: f64, level: u8) -> (u32, u32) {
    let (pixel_x, pixel_y) = lat_long_to_pixel_xy(latitude, longitude, level);
    pixel_xy_to_tile_xy(pixel_x, pixel_y)
}

/// Latitude/longitude of a tile's northwest corner.
pub fn tile_xy_to_lat_long(tile_x: u32, tile_y: u32, level: u8) -> (f64, f64) {
    let (pixel_x, pixel_y) = tile_xy_to_pixel_xy(tile_x, tile_y);
    pixel_xy_to_lat_long(pixel_x, pixel_y, level)
}

/// Encodes a tile as a quad key, one base-4 digit per level, most
/// significant first.
///
/// Levels above [`MAX_LEVEL`] are clamped to it, so every key produced here
/// decodes with [`quad_key_to_tile_xy`].
pub fn tile_xy_to_quad_key(tile_x: u32, tile_y: u32, level: u8) -> String {
    let level = level.min(MAX_LEVEL);
    let mut quad_key = String::with_capacity(level as usize);
    for i in (1..=level).rev() {
        let mask = 1u32 << (i - 1);
        let mut digit = b'0';
        if tile_x & mask != 0 {
            digit += 1;
        }
        if tile_y & mask != 0 {
            digit += 2;
        }
        quad_key.push(digit as char);
    }
    quad_key
}

/// Decodes a quad key into `(tile_x, tile_y, level)`.
///
/// # Errors
///
/// [`TileError::InvalidQuadKeyDigit`] for any character outside `0`-`3`,
/// [`TileError::LevelOutOfRange`] for keys longer than [`MAX_LEVEL`].
pub fn quad_key_to_tile_xy(quad_key: &str) -> Result<(u32, u32, u8), TileError> {
    let level = quad_key.chars().count();
    if level > MAX_LEVEL as usize {
        return Err(TileError::LevelOutOfRange(level));
    }

    let mut tile_x = 0u32;
    let mut tile_y = 0u32;
    for (position, digit) in quad_key.chars().enumerate() {
        let mask = 1u32 << (level - position - 1);
        match digit {
            '0' => {}
            '1' => tile_x |= mask,
            '2' => tile_y |= mask,
            '3' => {
                tile_x |= mask;
                tile_y |= mask;
            }
            _ => return Err(TileError::InvalidQuadKeyDigit { digit, position }),
        }
    }

    Ok((tile_x, tile_y, level as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip() {
        assert_eq!(clip(5, 0, 10), 5);
        assert_eq!(clip(-1, 0, 10), 0);
        assert_eq!(clip(11, 0, 10), 10);
        assert_eq!(clip(90.0, MIN_LATITUDE, MAX_LATITUDE), MAX_LATITUDE);
        assert_eq!(clip(10, 10, 10), 10);
    }

    #[test]
    fn test_map_size() {
        assert_eq!(map_size(0), 256);
        assert_eq!(map_size(1), 512);
        assert_eq!(map_size(10), 262144);
        assert_eq!(map_size(23), 2147483648);
    }

    #[test]
    fn test_map_size_clamps_level() {
        assert_eq!(map_size(30), map_size(MAX_LEVEL));
    }

    #[test]
    fn test_ground_resolution_at_equator() {
        // 2πR / 256 at level 0
        let resolution = ground_resolution(0.0, 0);
        assert!((resolution - 156543.03392804097).abs() < 1e-6);

        // Halves with every level
        let level_1 = ground_resolution(0.0, 1);
        assert!((level_1 * 2.0 - resolution).abs() < 1e-6);
    }

    #[test]
    fn test_ground_resolution_clamps_latitude() {
        assert_eq!(ground_resolution(90.0, 5), ground_resolution(MAX_LATITUDE, 5));
        assert!(ground_resolution(60.0, 5) < ground_resolution(0.0, 5));
    }

    #[test]
    fn test_map_scale() {
        let scale = map_scale(0.0, 0, 96.0);
        let expected = ground_resolution(0.0, 0) * 96.0 / 0.0254;
        assert!((scale - expected).abs() < 1e-6);
        // Roughly 1:591 million at level 0 on a 96 DPI screen
        assert!((scale / 1e6 - 591.657).abs() < 0.01);
    }

    #[test]
    fn test_equator_prime_meridian_is_center_pixel() {
        assert_eq!(lat_long_to_pixel_xy(0.0, 0.0, 1), (256, 256));
        assert_eq!(lat_long_to_pixel_xy(0.0, 0.0, 0), (128, 128));
    }

    #[test]
    fn test_lat_long_to_pixel_clamps_to_map() {
        let size = map_size(3);
        assert_eq!(lat_long_to_pixel_xy(90.0, 180.0, 3), (size - 1, 0));
        assert_eq!(lat_long_to_pixel_xy(-90.0, -180.0, 3), (0, size - 1));
        assert_eq!(
            lat_long_to_pixel_xy(120.0, 400.0, 3),
            lat_long_to_pixel_xy(MAX_LATITUDE, MAX_LONGITUDE, 3)
        );
    }

    #[test]
    fn test_pixel_to_lat_long_center() {
        let (lat, lng) = pixel_xy_to_lat_long(256, 256, 1);
        assert!(lat.abs() < 1e-12);
        assert!(lng.abs() < 1e-12);
    }

    #[test]
    fn test_pixel_to_lat_long_origin_is_northwest() {
        let (lat, lng) = pixel_xy_to_lat_long(0, 0, 4);
        assert!((lat - MAX_LATITUDE).abs() < 1e-6);
        assert_eq!(lng, -180.0);
    }

    #[test]
    fn test_pixel_to_lat_long_clamps_pixels() {
        assert_eq!(
            pixel_xy_to_lat_long(u32::MAX, u32::MAX, 2),
            pixel_xy_to_lat_long(1023, 1023, 2)
        );
    }

    #[test]
    fn test_pixel_tile_conversion() {
        assert_eq!(pixel_xy_to_tile_xy(0, 0), (0, 0));
        assert_eq!(pixel_xy_to_tile_xy(255, 256), (0, 1));
        assert_eq!(pixel_xy_to_tile_xy(1023, 513), (3, 2));
        assert_eq!(tile_xy_to_pixel_xy(3, 2), (768, 512));
    }

    #[test]
    fn test_tile_to_pixel_clamps_index() {
        let last = map_size(MAX_LEVEL) - TILE_SIZE;
        assert_eq!(tile_xy_to_pixel_xy(1 << 24, 0), (last, 0));
        assert_eq!(tile_xy_to_pixel_xy(u32::MAX, u32::MAX), (last, last));
        assert_eq!(
            tile_xy_to_lat_long(u32::MAX, 0, 3),
            pixel_xy_to_lat_long(map_size(3) - 1, 0, 3)
        );
    }

    #[test]
    fn test_tile_of_new_york() {
        // Matches the slippy-map index for 40.7128°N, 74.0060°W
        let (tile_x, tile_y) = lat_long_to_tile_xy(40.7128, -74.0060, 16);
        assert_eq!((tile_x, tile_y), (19295, 24640));
    }

    #[test]
    fn test_tile_corner_contains_point() {
        let (lat, lng) = (39.904179, 116.407387);
        let (tile_x, tile_y) = lat_long_to_tile_xy(lat, lng, 12);
        let (north, west) = tile_xy_to_lat_long(tile_x, tile_y, 12);
        let (south, east) = tile_xy_to_lat_long(tile_x + 1, tile_y + 1, 12);
        assert!(north >= lat && lat >= south);
        assert!(west <= lng && lng <= east);
    }

    #[test]
    fn test_quad_key_reference_example() {
        assert_eq!(tile_xy_to_quad_key(3, 5, 3), "213");
        assert_eq!(quad_key_to_tile_xy("213"), Ok((3, 5, 3)));
    }

    #[test]
    fn test_quad_key_level_zero_is_empty() {
        assert_eq!(tile_xy_to_quad_key(0, 0, 0), "");
        assert_eq!(quad_key_to_tile_xy(""), Ok((0, 0, 0)));
    }

    #[test]
    fn test_quad_key_single_digits() {
        assert_eq!(tile_xy_to_quad_key(0, 0, 1), "0");
        assert_eq!(tile_xy_to_quad_key(1, 0, 1), "1");
        assert_eq!(tile_xy_to_quad_key(0, 1, 1), "2");
        assert_eq!(tile_xy_to_quad_key(1, 1, 1), "3");
    }

    #[test]
    fn test_quad_key_invalid_digit() {
        assert_eq!(
            quad_key_to_tile_xy("4"),
            Err(TileError::InvalidQuadKeyDigit {
                digit: '4',
                position: 0
            })
        );
        assert!(matches!(
            quad_key_to_tile_xy("01a3"),
            Err(TileError::InvalidQuadKeyDigit { digit: 'a', position: 2 })
        ));
    }

    #[test]
    fn test_quad_key_too_long() {
        let key = "0".repeat(24);
        assert_eq!(
            quad_key_to_tile_xy(&key),
            Err(TileError::LevelOutOfRange(24))
        );
    }

    #[test]
    fn test_quad_key_clamps_level() {
        let key = tile_xy_to_quad_key(1, 1, 24);
        assert_eq!(key.len(), MAX_LEVEL as usize);
        assert_eq!(quad_key_to_tile_xy(&key), Ok((1, 1, MAX_LEVEL)));
        assert_eq!(tile_xy_to_quad_key(5, 3, 40), tile_xy_to_quad_key(5, 3, MAX_LEVEL));
        assert_eq!(tile_xy_to_quad_key(0, 0, u8::MAX).len(), MAX_LEVEL as usize);
    }

    #[test]
    fn test_quad_key_prefix_is_parent_tile() {
        let key = tile_xy_to_quad_key(35210, 21493, 16);
        let (parent_x, parent_y, level) = quad_key_to_tile_xy(&key[..15]).unwrap();
        assert_eq!(level, 15);
        assert_eq!((parent_x, parent_y), (35210 / 2, 21493 / 2));
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_pixel_roundtrip_property(
                lat in -85.0..85.0_f64,
                lng in -180.0..180.0_f64,
                level in 0u8..=23
            ) {
                let (pixel_x, pixel_y) = lat_long_to_pixel_xy(lat, lng, level);
                let (back_lat, back_lng) = pixel_xy_to_lat_long(pixel_x, pixel_y, level);

                // One pixel spans at most this many degrees in either axis
                let pixel_degrees = 360.0 / map_size(level) as f64;

                prop_assert!(
                    (back_lat - lat).abs() <= pixel_degrees,
                    "Level {}: lat {} -> {} (pixel {})",
                    level, lat, back_lat, pixel_degrees
                );
                prop_assert!(
                    (back_lng - lng).abs() <= pixel_degrees,
                    "Level {}: lng {} -> {} (pixel {})",
                    level, lng, back_lng, pixel_degrees
                );
            }

            #[test]
            fn test_pixel_in_bounds_property(
                lat in -90.0..90.0_f64,
                lng in -200.0..200.0_f64,
                level in 0u8..=23
            ) {
                let (pixel_x, pixel_y) = lat_long_to_pixel_xy(lat, lng, level);
                prop_assert!(pixel_x < map_size(level));
                prop_assert!(pixel_y < map_size(level));
            }

            #[test]
            fn test_quad_key_roundtrip_property(
                x_raw in any::<u32>(),
                y_raw in any::<u32>(),
                level in 0u8..=23
            ) {
                let tiles = 1u32 << level;
                let tile_x = x_raw % tiles;
                let tile_y = y_raw % tiles;

                let key = tile_xy_to_quad_key(tile_x, tile_y, level);
                prop_assert_eq!(key.len(), level as usize);
                prop_assert_eq!(quad_key_to_tile_xy(&key), Ok((tile_x, tile_y, level)));
            }

            #[test]
            fn test_quad_key_always_decodes_property(
                tile_x in any::<u32>(),
                tile_y in any::<u32>(),
                level in any::<u8>()
            ) {
                let key = tile_xy_to_quad_key(tile_x, tile_y, level);
                prop_assert!(quad_key_to_tile_xy(&key).is_ok());
                let (px, py) = tile_xy_to_pixel_xy(tile_x, tile_y);
                prop_assert!(px < map_size(MAX_LEVEL) && py < map_size(MAX_LEVEL));
            }

            #[test]
            fn test_map_size_property(level in 0u8..=23) {
                prop_assert_eq!(map_size(level) as u64, 256u64 * 2u64.pow(level as u32));
            }

            #[test]
            fn test_tile_pixel_roundtrip_property(
                tile_x in 0u32..(1 << 20),
                tile_y in 0u32..(1 << 20)
            ) {
                let (pixel_x, pixel_y) = tile_xy_to_pixel_xy(tile_x, tile_y);
                prop_assert_eq!(pixel_xy_to_tile_xy(pixel_x + 255, pixel_y + 255), (tile_x, tile_y));
            }
        }
    }
}
