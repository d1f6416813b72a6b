use crate::resolve::ResolveError;
use crate::{COLOR_LETTERS, TileId, TileSlot};
use serde::{Deserialize, Serialize};

/// Largest number range the crate accepts
pub const MAX_NUMBERS: u8 = 63;

/// Errors from building a rule set. These are fatal: nothing is resolved under an
/// invalid rule set.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    ZeroBound(&'static str),
    #[error("minimum meld size must be at least 2, got {0}")]
    MinMeldTooSmall(u8),
    #[error("minimum meld size {min_meld_size} exceeds color count {colors}")]
    MinMeldExceedsColors { min_meld_size: u8, colors: u8 },
    #[error("at most {max} colors are supported, got {colors}")]
    TooManyColors { colors: u8, max: usize },
    #[error("number range may reach at most {max}, got {numbers}")]
    TooManyNumbers { numbers: u8, max: u8 },
}

/// Immutable game configuration.
///
/// Numbers run `1..=numbers`, colors are indexed `0..colors`, and a group holds at most
/// `colors` tiles. Build one with [`RuleSet::new`] or by deserializing; both validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RuleSetConfig")]
pub struct RuleSet {
    numbers: u8,
    colors: u8,
    wildcards: u8,
    min_meld_size: u8,
}

/// Unvalidated form of a rule set, as it arrives from JSON.
/// Accepts the field names of the HTTP service as aliases.
#[derive(Debug, Deserialize)]
struct RuleSetConfig {
    #[serde(default = "default_numbers")]
    numbers: u8,
    #[serde(default = "default_colors", alias = "colours")]
    colors: u8,
    #[serde(default = "default_wildcards", alias = "jokers")]
    wildcards: u8,
    #[serde(default = "default_min_meld_size", alias = "min_len")]
    min_meld_size: u8,
}

fn default_numbers() -> u8 {
    13
}

fn default_colors() -> u8 {
    4
}

fn default_wildcards() -> u8 {
    2
}

fn default_min_meld_size() -> u8 {
    3
}

impl TryFrom<RuleSetConfig> for RuleSet {
    type Error = ConfigError;

    fn try_from(config: RuleSetConfig) -> Result<Self, Self::Error> {
        RuleSet::new(
            config.numbers,
            config.colors,
            config.wildcards,
            config.min_meld_size,
        )
    }
}

impl RuleSet {
    /// Create a validated rule set.
    ///
    /// A wildcard supply of zero is allowed (a game played without jokers).
    pub fn new(numbers: u8, colors: u8, wildcards: u8, min_meld_size: u8) -> Result<Self, ConfigError> {
        if numbers == 0 {
            return Err(ConfigError::ZeroBound("number range"));
        }
        if colors == 0 {
            return Err(ConfigError::ZeroBound("color count"));
        }
        if min_meld_size == 0 {
            return Err(ConfigError::ZeroBound("minimum meld size"));
        }
        if numbers > MAX_NUMBERS {
            return Err(ConfigError::TooManyNumbers {
                numbers,
                max: MAX_NUMBERS,
            });
        }
        if colors as usize > COLOR_LETTERS.len() {
            return Err(ConfigError::TooManyColors {
                colors,
                max: COLOR_LETTERS.len(),
            });
        }
        if min_meld_size < 2 {
            return Err(ConfigError::MinMeldTooSmall(min_meld_size));
        }
        if min_meld_size > colors {
            return Err(ConfigError::MinMeldExceedsColors {
                min_meld_size,
                colors,
            });
        }

        Ok(RuleSet {
            numbers,
            colors,
            wildcards,
            min_meld_size,
        })
    }

    /// Upper bound of the number range (the lower bound is always 1)
    pub fn numbers(&self) -> u8 {
        self.numbers
    }

    pub fn colors(&self) -> u8 {
        self.colors
    }

    /// Total physical wildcards in the game
    pub fn wildcards(&self) -> u8 {
        self.wildcards
    }

    pub fn min_meld_size(&self) -> u8 {
        self.min_meld_size
    }

    /// A group can hold one tile per color
    pub fn max_group_size(&self) -> usize {
        self.colors as usize
    }

    /// The reserved identity that denotes a wildcard
    pub fn wildcard_id(&self) -> TileId {
        TileId(self.colors as u16 * self.numbers as u16)
    }

    /// Translate an optimizer identity into a slot
    pub fn decode(&self, id: TileId) -> Result<TileSlot, ResolveError> {
        let wild = self.wildcard_id();
        if id == wild {
            return Ok(TileSlot::Wildcard);
        }
        if id > wild {
            return Err(ResolveError::UnknownTile(id.0));
        }
        let numbers = self.numbers as u16;
        let color = (id.0 / numbers) as u8;
        let number = (id.0 % numbers) as u8 + 1;
        Ok(TileSlot::concrete(color, number))
    }

    /// Translate a slot into its optimizer identity. The slot is assumed to be in range.
    pub fn encode(&self, slot: TileSlot) -> TileId {
        match slot {
            TileSlot::Wildcard => self.wildcard_id(),
            TileSlot::Concrete(tile) => TileId(
                tile.color() as u16 * self.numbers as u16 + tile.number() as u16 - 1,
            ),
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            numbers: default_numbers(),
            colors: default_colors(),
            wildcards: default_wildcards(),
            min_meld_size: default_min_meld_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = RuleSet::default();
        assert_eq!(rules.numbers(), 13);
        assert_eq!(rules.colors(), 4);
        assert_eq!(rules.wildcards(), 2);
        assert_eq!(rules.min_meld_size(), 3);
        assert_eq!(RuleSet::new(13, 4, 2, 3), Ok(rules));
    }

    #[test]
    fn test_new_rejects_invalid_bounds() {
        assert_eq!(RuleSet::new(0, 4, 2, 3), Err(ConfigError::ZeroBound("number range")));
        assert_eq!(RuleSet::new(13, 0, 2, 3), Err(ConfigError::ZeroBound("color count")));
        assert_eq!(RuleSet::new(13, 4, 2, 0), Err(ConfigError::ZeroBound("minimum meld size")));
        assert_eq!(RuleSet::new(13, 4, 2, 1), Err(ConfigError::MinMeldTooSmall(1)));
        assert_eq!(
            RuleSet::new(13, 4, 2, 5),
            Err(ConfigError::MinMeldExceedsColors { min_meld_size: 5, colors: 4 })
        );
        assert_eq!(
            RuleSet::new(13, 7, 2, 3),
            Err(ConfigError::TooManyColors { colors: 7, max: 6 })
        );
        assert_eq!(
            RuleSet::new(64, 4, 2, 3),
            Err(ConfigError::TooManyNumbers { numbers: 64, max: 63 })
        );
    }

    #[test]
    fn test_new_allows_no_wildcards() {
        assert!(RuleSet::new(13, 4, 0, 3).is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults_and_aliases() {
        let rules: RuleSet = serde_json::from_str("{}").unwrap();
        assert_eq!(rules, RuleSet::default());

        let rules: RuleSet =
            serde_json::from_str(r#"{"numbers": 10, "colours": 5, "jokers": 1, "min_len": 4}"#)
                .unwrap();
        assert_eq!(rules, RuleSet::new(10, 5, 1, 4).unwrap());
    }

    #[test]
    fn test_deserialize_validates() {
        let err = serde_json::from_str::<RuleSet>(r#"{"colors": 2}"#).unwrap_err();
        assert!(err.to_string().contains("exceeds color count"));
    }

    #[test]
    fn test_serialize_rules() {
        let json = serde_json::to_value(RuleSet::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"numbers": 13, "colors": 4, "wildcards": 2, "min_meld_size": 3})
        );
    }

    #[test]
    fn test_decode_encode() {
        let rules = RuleSet::default();
        assert_eq!(rules.wildcard_id(), TileId(52));
        assert_eq!(rules.decode(TileId(0)), Ok(TileSlot::concrete(0, 1)));
        assert_eq!(rules.decode(TileId(12)), Ok(TileSlot::concrete(0, 13)));
        assert_eq!(rules.decode(TileId(13)), Ok(TileSlot::concrete(1, 1)));
        assert_eq!(rules.decode(TileId(51)), Ok(TileSlot::concrete(3, 13)));
        assert_eq!(rules.decode(TileId(52)), Ok(TileSlot::Wildcard));
        assert_eq!(rules.decode(TileId(53)), Err(ResolveError::UnknownTile(53)));

        for id in 0..=52 {
            let slot = rules.decode(TileId(id)).unwrap();
            assert_eq!(rules.encode(slot), TileId(id));
        }
    }
}
