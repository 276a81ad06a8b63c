//! Tile names and the ordering that decides in-game tile indices.
//!
//! A tile file is named either `<digits>` (passable) or `<letter><digits>`
//! (impassable). The name is parsed once into a [`TileClass`]; nothing
//! downstream looks at the raw string to find out what kind of tile it is.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Result, TileError};

/// The two tile classes, without their ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Passable,
    Impassable,
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileKind::Passable => write!(f, "passable"),
            TileKind::Impassable => write!(f, "impassable"),
        }
    }
}

/// Class and ordinal parsed from a tile file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileClass {
    Passable(u64),
    /// The leading letter is kept so the name can be rebuilt, but it
    /// plays no part in ordering.
    Impassable(char, u64),
}

impl TileClass {
    pub fn parse(name: &str) -> Result<Self> {
        let malformed = || TileError::MalformedTileName { name: name.to_string() };

        let mut chars = name.chars();
        let first = chars.next().ok_or_else(malformed)?;
        if first.is_ascii_alphabetic() {
            let ordinal = parse_ordinal(chars.as_str()).ok_or_else(malformed)?;
            Ok(TileClass::Impassable(first, ordinal))
        } else {
            let ordinal = parse_ordinal(name).ok_or_else(malformed)?;
            Ok(TileClass::Passable(ordinal))
        }
    }

    pub fn kind(&self) -> TileKind {
        match self {
            TileClass::Passable(_) => TileKind::Passable,
            TileClass::Impassable(..) => TileKind::Impassable,
        }
    }

    pub fn ordinal(&self) -> u64 {
        match *self {
            TileClass::Passable(n) | TileClass::Impassable(_, n) => n,
        }
    }
}

/// Strict `[0-9]+`; no sign, no whitespace.
fn parse_ordinal(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// A validated tile file name.
///
/// `Ord` is the tile ordering: passable before impassable, then by ordinal.
/// Two names with the same class and ordinal (`a1`/`b1`, `7`/`07`) fall
/// back to byte order so the ordering is total over a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileName {
    name: String,
    class: TileClass,
}

impl TileName {
    pub fn parse(name: &str) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            class: TileClass::parse(name)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> TileClass {
        self.class
    }

    pub fn kind(&self) -> TileKind {
        self.class.kind()
    }
}

impl Ord for TileName {
    fn cmp(&self, other: &Self) -> Ordering {
        let rank = |k: TileKind| match k {
            TileKind::Passable => 0u8,
            TileKind::Impassable => 1u8,
        };
        rank(self.kind())
            .cmp(&rank(other.kind()))
            .then(self.class.ordinal().cmp(&other.class.ordinal()))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for TileName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
