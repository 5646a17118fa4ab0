//! Quad key and tile error types.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{quad_key_to_tile_xy, tile_xy_to_quad_key, MAX_LEVEL};

/// Errors that can occur when decoding tile addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    /// A quad key contained a character other than `0`-`3`.
    #[error("Invalid quad key digit '{digit}' at position {position}")]
    InvalidQuadKeyDigit { digit: char, position: usize },

    /// A quad key was longer than the deepest supported level.
    #[error("Quad key level {0} exceeds maximum level {max}", max = MAX_LEVEL)]
    LevelOutOfRange(usize),
}

/// A validated quad key.
///
/// Each character selects one quadrant of the parent tile, so the key's
/// length is its level and every prefix names an ancestor tile.
///
/// # Example
///
/// ```
/// use lbs::tile::QuadKey;
///
/// let key: QuadKey = "213".parse().unwrap();
/// assert_eq!(key.tile_xy(), (3, 5));
/// assert_eq!(key.parent().unwrap().as_str(), "21");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuadKey(String);

impl QuadKey {
    /// Builds the quad key for a tile. Levels above [`MAX_LEVEL`] are clamped.
    pub fn from_tile_xy(tile_x: u32, tile_y: u32, level: u8) -> Self {
        Self(tile_xy_to_quad_key(tile_x, tile_y, level))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn level(&self) -> u8 {
        self.0.len() as u8
    }

    /// Tile indices of this key.
    pub fn tile_xy(&self) -> (u32, u32) {
        let mut tile_x = 0;
        let mut tile_y = 0;
        for (i, c) in self.0.bytes().rev().enumerate() {
            let mask = 1 << i;
            let digit = c - b'0';
            if digit & 1 != 0 {
                tile_x |= mask;
            }
            if digit & 2 != 0 {
                tile_y |= mask;
            }
        }
        (tile_x, tile_y)
    }

    /// The enclosing tile one level up, or `None` at level 0.
    pub fn parent(&self) -> Option<QuadKey> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_string()))
    }

    /// The four tiles one level down, in digit order. Empty at [`MAX_LEVEL`].
    pub fn children(&self) -> Vec<QuadKey> {
        if self.level() >= MAX_LEVEL {
            return Vec::new();
        }
        ['0', '1', '2', '3']
            .iter()
            .map(|digit| {
                let mut key = self.0.clone();
                key.push(*digit);
                Self(key)
            })
            .collect()
    }

    /// True when `other` lies inside this tile at the same or a deeper level.
    pub fn is_ancestor_of(&self, other: &QuadKey) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl FromStr for QuadKey {
    type Err = TileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        quad_key_to_tile_xy(s)?;
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for QuadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QuadKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_key() {
        let key: QuadKey = "0231".parse().unwrap();
        assert_eq!(key.level(), 4);
        assert_eq!(key.as_str(), "0231");
    }

    #[test]
    fn test_parse_rejects_bad_digit() {
        let result = "0291".parse::<QuadKey>();
        assert_eq!(
            result,
            Err(TileError::InvalidQuadKeyDigit {
                digit: '9',
                position: 2
            })
        );
    }

    #[test]
    fn test_tile_xy_matches_free_function() {
        let key = QuadKey::from_tile_xy(35210, 21493, 16);
        let (x, y, level) = quad_key_to_tile_xy(key.as_str()).unwrap();
        assert_eq!(key.tile_xy(), (x, y));
        assert_eq!(key.level(), level);
    }

    #[test]
    fn test_parent_chain_reaches_root() {
        let mut key: QuadKey = "213".parse().unwrap();
        let mut levels = vec![key.level()];
        while let Some(parent) = key.parent() {
            levels.push(parent.level());
            key = parent;
        }
        assert_eq!(levels, vec![3, 2, 1, 0]);
        assert_eq!(key.as_str(), "");
    }

    #[test]
    fn test_children_cover_parent() {
        let key: QuadKey = "21".parse().unwrap();
        let children = key.children();
        assert_eq!(children.len(), 4);

        let (px, py) = key.tile_xy();
        for child in &children {
            assert!(key.is_ancestor_of(child));
            assert_eq!(child.parent().as_ref(), Some(&key));
            let (cx, cy) = child.tile_xy();
            assert_eq!((cx / 2, cy / 2), (px, py));
        }
    }

    #[test]
    fn test_no_children_at_max_level() {
        let key = QuadKey::from_tile_xy(0, 0, MAX_LEVEL);
        assert!(key.children().is_empty());
    }

    #[test]
    fn test_from_tile_xy_clamps_level() {
        let key = QuadKey::from_tile_xy(0, 0, 40);
        assert_eq!(key.level(), MAX_LEVEL);
        assert_eq!(key.tile_xy(), (0, 0));
        assert_eq!(key.as_str().parse::<QuadKey>(), Ok(key.clone()));
    }

    #[test]
    fn test_ancestor_is_prefix() {
        let a: QuadKey = "12".parse().unwrap();
        let b: QuadKey = "1203".parse().unwrap();
        let c: QuadKey = "1302".parse().unwrap();
        assert!(a.is_ancestor_of(&b));
        assert!(a.is_ancestor_of(&a));
        assert!(!a.is_ancestor_of(&c));
        assert!(!b.is_ancestor_of(&a));
    }

    #[test]
    fn test_error_display() {
        let err = TileError::LevelOutOfRange(30);
        assert!(err.to_string().contains("30"));
        assert!(err.to_string().contains("23"));
    }
}
