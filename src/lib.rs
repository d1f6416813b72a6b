use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

pub mod ambiguity;
pub mod assembler;
pub mod classify;
pub mod resolve;
pub mod rules;
#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

pub use assembler::{Diagnostic, INITIAL_MELD_THRESHOLD, MoveResult, Selection, resolve_move};
pub use classify::{Classification, classify};
pub use resolve::{ResolveError, ResolvedMeld, ResolvedTile};
pub use rules::{ConfigError, RuleSet};

/// Color letters by color index. The notation caps how many colors a rule set may use.
pub const COLOR_LETTERS: [char; 6] = ['r', 'b', 'y', 'k', 'o', 'g'];

/// Notation for the wildcard.
pub const WILD_NOTATION: &str = "w";

/// Errors from parsing tile notation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty tile string")]
    Empty,
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("number must be 1-{max}, got {number}")]
    NumberOutOfRange { number: u8, max: u8 },
    #[error("color '{letter}' is not used by a {colors}-color rule set")]
    ColorOutOfRange { letter: char, colors: u8 },
}

/// A concrete tile: a color index and a face number.
///
/// Range checks belong to the [`RuleSet`] the tile is used under, so construction is
/// unchecked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile {
    color: u8,
    number: u8,
}

impl Tile {
    /// Create a new tile from a color index and a number
    pub fn new(color: u8, number: u8) -> Self {
        Tile { color, number }
    }

    pub fn color(&self) -> u8 {
        self.color
    }

    pub fn number(&self) -> u8 {
        self.number
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match COLOR_LETTERS.get(self.color as usize) {
            Some(letter) => write!(f, "{}{}", letter, self.number),
            None => write!(f, "?{}", self.number),
        }
    }
}

impl Serialize for Tile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One position in a meld: either a concrete tile or an unassigned wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileSlot {
    Concrete(Tile),
    Wildcard,
}

impl TileSlot {
    pub fn concrete(color: u8, number: u8) -> Self {
        TileSlot::Concrete(Tile::new(color, number))
    }

    pub fn is_wild(&self) -> bool {
        matches!(self, TileSlot::Wildcard)
    }

    /// The concrete tile, or None for a wildcard
    pub fn tile(&self) -> Option<Tile> {
        match self {
            TileSlot::Concrete(tile) => Some(*tile),
            TileSlot::Wildcard => None,
        }
    }

    /// Parse a slot from notation, validated against the rule set.
    /// Format: "r13" (red 13), "b1" (blue 1), "y7", "k9", "o2", "g4", or "w" (wildcard)
    pub fn from_string(s: &str, rules: &RuleSet) -> Result<Self, ParseError> {
        if s == WILD_NOTATION {
            return Ok(TileSlot::Wildcard);
        }
        let mut chars = s.chars();
        let letter = chars.next().ok_or(ParseError::Empty)?;
        let color = COLOR_LETTERS
            .iter()
            .position(|&c| c == letter)
            .ok_or_else(|| ParseError::InvalidColor(letter.to_string()))? as u8;
        if color >= rules.colors() {
            return Err(ParseError::ColorOutOfRange {
                letter,
                colors: rules.colors(),
            });
        }

        let digits = chars.as_str();
        let number: u8 = digits
            .parse()
            .map_err(|_| ParseError::InvalidNumber(digits.to_string()))?;
        if !(1..=rules.numbers()).contains(&number) {
            return Err(ParseError::NumberOutOfRange {
                number,
                max: rules.numbers(),
            });
        }

        Ok(TileSlot::concrete(color, number))
    }
}

impl fmt::Display for TileSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileSlot::Concrete(tile) => fmt::Display::fmt(tile, f),
            TileSlot::Wildcard => f.write_str(WILD_NOTATION),
        }
    }
}

impl Serialize for TileSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A tile identity as the optimizer reports it.
///
/// Concrete tiles are numbered color-major (`color * numbers + number - 1`); the single
/// reserved identity after the last concrete tile is the wildcard. See
/// [`RuleSet::decode`] and [`RuleSet::encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u16);

/// Type of a resolved meld
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeldType {
    /// A group: same number, different colors
    Group,
    /// A run: consecutive numbers, same color
    Run,
}

/// An unresolved meld: an unordered bag of slots, wildcards still unassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meld {
    slots: Vec<TileSlot>,
}

impl Meld {
    pub fn new(slots: Vec<TileSlot>) -> Self {
        Meld { slots }
    }

    /// Expand a bag of optimizer identities into a meld
    pub fn from_ids(ids: &[TileId], rules: &RuleSet) -> Result<Self, ResolveError> {
        let slots = ids
            .iter()
            .map(|&id| rules.decode(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Meld::new(slots))
    }

    /// Parse a meld from whitespace-separated notation, e.g. "r5 w w" or "b7 y7 k7"
    pub fn from_string(input: &str, rules: &RuleSet) -> Result<Self, ParseError> {
        let slots = input
            .split_whitespace()
            .map(|token| TileSlot::from_string(token, rules))
            .collect::<Result<Vec<_>, _>>()?;
        if slots.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Meld::new(slots))
    }

    pub fn slots(&self) -> &[TileSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over the concrete tiles, skipping wildcards
    pub fn concrete(&self) -> impl Iterator<Item = Tile> + '_ {
        self.slots.iter().filter_map(TileSlot::tile)
    }

    pub fn concrete_count(&self) -> usize {
        self.concrete().count()
    }

    pub fn wildcard_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_wild()).count()
    }

    /// Number of distinct colors among concrete tiles
    pub fn distinct_colors(&self) -> usize {
        self.concrete().map(|t| t.color()).collect::<BTreeSet<_>>().len()
    }

    /// Number of distinct numbers among concrete tiles
    pub fn distinct_numbers(&self) -> usize {
        self.concrete().map(|t| t.number()).collect::<BTreeSet<_>>().len()
    }
}
