use crate::{Meld, MeldType, RuleSet, Tile};
use serde::Serialize;
use std::collections::BTreeSet;

/// Why a single meld could not be resolved. These never abort a whole move.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown tile identity {0}")]
    UnknownTile(u16),
    #[error("meld has {count} wildcards but only {supply} exist")]
    TooManyWildcards { count: usize, supply: u8 },
    #[error("tiles do not form a run or a group")]
    Unclassifiable,
    #[error("group of {size} needs more than the {colors} available colors")]
    InsufficientColors { size: usize, colors: u8 },
    #[error("run has {missing} missing numbers inside it but only {wildcards} wildcards")]
    UnfillableGap { missing: usize, wildcards: usize },
    #[error("no room in the number range for {unplaced} more wildcards")]
    InsufficientRoom { unplaced: usize },
}

/// A tile in its final position. Wildcards carry the substitute they stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedTile {
    pub tile: Tile,
    pub wildcard: bool,
}

/// A meld whose wildcards all have a substitute, ready to display and score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMeld {
    #[serde(rename = "type")]
    pub meld_type: MeldType,
    pub tiles: Vec<ResolvedTile>,
    pub value: u32,
}

/// Resolve a meld that is known to be a run or a group
pub fn resolve(meld: &Meld, meld_type: MeldType, rules: &RuleSet) -> Result<ResolvedMeld, ResolveError> {
    match meld_type {
        MeldType::Group => resolve_group(meld, rules),
        MeldType::Run => resolve_run(meld, rules),
    }
}

/// Give every wildcard an unused color at the group's number, lowest color index first.
pub fn resolve_group(meld: &Meld, rules: &RuleSet) -> Result<ResolvedMeld, ResolveError> {
    let mut numbers = meld.concrete().map(|t| t.number());
    let number = numbers.next().ok_or(ResolveError::Unclassifiable)?;
    if numbers.any(|n| n != number) {
        return Err(ResolveError::Unclassifiable);
    }

    let colors: BTreeSet<u8> = meld.concrete().map(|t| t.color()).collect();
    if colors.len() != meld.concrete_count() {
        return Err(ResolveError::Unclassifiable);
    }

    finalize_group(number, &colors, meld.wildcard_count(), rules)
}

/// Lay out a group at `number` holding `colors`, topped up with `wildcards` substitutes
pub(crate) fn finalize_group(
    number: u8,
    colors: &BTreeSet<u8>,
    wildcards: usize,
    rules: &RuleSet,
) -> Result<ResolvedMeld, ResolveError> {
    let size = colors.len() + wildcards;
    if size > rules.max_group_size() {
        return Err(ResolveError::InsufficientColors {
            size,
            colors: rules.colors(),
        });
    }

    let substitutes: BTreeSet<u8> = (0..rules.colors())
        .filter(|c| !colors.contains(c))
        .take(wildcards)
        .collect();

    let tiles = (0..rules.colors())
        .filter(|c| colors.contains(c) || substitutes.contains(c))
        .map(|c| ResolvedTile {
            tile: Tile::new(c, number),
            wildcard: substitutes.contains(&c),
        })
        .collect();

    Ok(ResolvedMeld {
        meld_type: MeldType::Group,
        tiles,
        value: size as u32 * number as u32,
    })
}

/// Place wildcards in a run.
///
/// Internal gaps are filled first, lowest gap first; every gap must close or the run
/// fails. Leftover wildcards extend the run upward, then downward once the top of the
/// number range is reached.
pub fn resolve_run(meld: &Meld, rules: &RuleSet) -> Result<ResolvedMeld, ResolveError> {
    let mut colors = meld.concrete().map(|t| t.color());
    let color = colors.next().ok_or(ResolveError::Unclassifiable)?;
    if colors.any(|c| c != color) {
        return Err(ResolveError::Unclassifiable);
    }

    let numbers: BTreeSet<u8> = meld.concrete().map(|t| t.number()).collect();
    if numbers.len() != meld.concrete_count() {
        return Err(ResolveError::Unclassifiable);
    }

    // Non-empty: a color was found above
    let (mut low, mut high) = match (numbers.first(), numbers.last()) {
        (Some(&low), Some(&high)) => (low, high),
        _ => return Err(ResolveError::Unclassifiable),
    };

    let wildcards = meld.wildcard_count();
    let missing = (high - low + 1) as usize - numbers.len();
    if missing > wildcards {
        return Err(ResolveError::UnfillableGap { missing, wildcards });
    }

    let mut unplaced = wildcards - missing;
    while unplaced > 0 && high < rules.numbers() {
        high += 1;
        unplaced -= 1;
    }
    while unplaced > 0 && low > 1 {
        low -= 1;
        unplaced -= 1;
    }
    if unplaced > 0 {
        return Err(ResolveError::InsufficientRoom { unplaced });
    }

    Ok(finalize_run(color, low, high, &numbers))
}

/// Lay out the run `low..=high` in `color`; numbers not in `concrete` are wildcards
pub(crate) fn finalize_run(color: u8, low: u8, high: u8, concrete: &BTreeSet<u8>) -> ResolvedMeld {
    let tiles = (low..=high)
        .map(|n| ResolvedTile {
            tile: Tile::new(color, n),
            wildcard: !concrete.contains(&n),
        })
        .collect();

    ResolvedMeld {
        meld_type: MeldType::Run,
        tiles,
        value: (low as u32..=high as u32).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meld(input: &str) -> Meld {
        Meld::from_string(input, &RuleSet::default()).unwrap()
    }

    fn numbers(resolved: &ResolvedMeld) -> Vec<u8> {
        resolved.tiles.iter().map(|t| t.tile.number()).collect()
    }

    fn wild_flags(resolved: &ResolvedMeld) -> Vec<bool> {
        resolved.tiles.iter().map(|t| t.wildcard).collect()
    }

    // ========================================================================
    // Group Tests
    // ========================================================================

    #[test]
    fn test_group_without_wildcards() {
        let resolved = resolve_group(&meld("k7 r7 b7"), &RuleSet::default()).unwrap();
        assert_eq!(resolved.meld_type, MeldType::Group);
        assert_eq!(
            resolved.tiles.iter().map(|t| t.tile).collect::<Vec<_>>(),
            vec![Tile::new(0, 7), Tile::new(1, 7), Tile::new(3, 7)]
        );
        assert_eq!(resolved.value, 21);
    }

    #[test]
    fn test_group_wildcards_take_lowest_unused_colors() {
        // Red and yellow present: wildcards become blue and black
        let resolved = resolve_group(&meld("w y9 r9 w"), &RuleSet::default()).unwrap();
        assert_eq!(
            resolved.tiles,
            vec![
                ResolvedTile { tile: Tile::new(0, 9), wildcard: false },
                ResolvedTile { tile: Tile::new(1, 9), wildcard: true },
                ResolvedTile { tile: Tile::new(2, 9), wildcard: false },
                ResolvedTile { tile: Tile::new(3, 9), wildcard: true },
            ]
        );
        assert_eq!(resolved.value, 36);
    }

    #[test]
    fn test_group_value_is_size_times_number() {
        let resolved = resolve_group(&meld("b11 k11 w"), &RuleSet::default()).unwrap();
        assert_eq!(resolved.value, 33);
        assert!(resolved.tiles.iter().all(|t| t.tile.number() == 11));
    }

    #[test]
    fn test_group_too_large_for_colors() {
        assert_eq!(
            resolve_group(&meld("r5 b5 y5 k5 w"), &RuleSet::default()),
            Err(ResolveError::InsufficientColors { size: 5, colors: 4 })
        );
    }

    #[test]
    fn test_group_rejects_mixed_numbers() {
        assert_eq!(
            resolve_group(&meld("r5 b6 w"), &RuleSet::default()),
            Err(ResolveError::Unclassifiable)
        );
        assert_eq!(
            resolve_group(&meld("r5 r5 w"), &RuleSet::default()),
            Err(ResolveError::Unclassifiable)
        );
    }

    // ========================================================================
    // Run Tests
    // ========================================================================

    #[test]
    fn test_run_without_wildcards_is_unchanged() {
        let resolved = resolve_run(&meld("y4 y5 y6 y7"), &RuleSet::default()).unwrap();
        assert_eq!(resolved.meld_type, MeldType::Run);
        assert_eq!(numbers(&resolved), vec![4, 5, 6, 7]);
        assert_eq!(wild_flags(&resolved), vec![false; 4]);
        assert_eq!(resolved.value, 22);
    }

    #[test]
    fn test_run_fills_internal_gap() {
        let resolved = resolve_run(&meld("r1 w r3"), &RuleSet::default()).unwrap();
        assert_eq!(numbers(&resolved), vec![1, 2, 3]);
        assert_eq!(wild_flags(&resolved), vec![false, true, false]);
        assert_eq!(resolved.value, 6);
    }

    #[test]
    fn test_run_fills_gaps_then_extends_upward() {
        let resolved = resolve_run(&meld("b3 b5 w w"), &RuleSet::default()).unwrap();
        assert_eq!(numbers(&resolved), vec![3, 4, 5, 6]);
        assert_eq!(wild_flags(&resolved), vec![false, true, false, true]);
        assert_eq!(resolved.value, 18);
    }

    #[test]
    fn test_run_fills_multiple_gaps() {
        let resolved = resolve_run(&meld("k2 k4 k7 w w w"), &RuleSet::default()).unwrap();
        assert_eq!(numbers(&resolved), vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(wild_flags(&resolved), vec![false, true, false, true, true, false]);
    }

    #[test]
    fn test_run_unfillable_gap() {
        assert_eq!(
            resolve_run(&meld("r2 r3 r7 w"), &RuleSet::default()),
            Err(ResolveError::UnfillableGap { missing: 3, wildcards: 1 })
        );
    }

    #[test]
    fn test_run_extends_downward_at_top() {
        let resolved = resolve_run(&meld("y12 y13 w"), &RuleSet::default()).unwrap();
        assert_eq!(numbers(&resolved), vec![11, 12, 13]);
        assert_eq!(wild_flags(&resolved), vec![true, false, false]);
        assert_eq!(resolved.value, 36);
    }

    #[test]
    fn test_run_extends_both_ways() {
        let resolved = resolve_run(&meld("r12 w w w"), &RuleSet::default()).unwrap();
        assert_eq!(numbers(&resolved), vec![10, 11, 12, 13]);
        assert_eq!(resolved.value, 46);
    }

    #[test]
    fn test_run_out_of_room() {
        let rules = RuleSet::new(3, 4, 2, 3).unwrap();
        let meld = Meld::from_string("r2 r3 w w", &rules).unwrap();
        assert_eq!(
            resolve_run(&meld, &rules),
            Err(ResolveError::InsufficientRoom { unplaced: 1 })
        );
    }

    #[test]
    fn test_run_rejects_mixed_colors() {
        assert_eq!(
            resolve_run(&meld("r2 b3 w"), &RuleSet::default()),
            Err(ResolveError::Unclassifiable)
        );
        assert_eq!(
            resolve_run(&meld("w w w"), &RuleSet::default()),
            Err(ResolveError::Unclassifiable)
        );
    }

    #[test]
    fn test_resolve_dispatches_on_type() {
        let rules = RuleSet::default();
        assert_eq!(resolve(&meld("r5 w w"), MeldType::Group, &rules).unwrap().value, 15);
        assert_eq!(resolve(&meld("r5 w w"), MeldType::Run, &rules).unwrap().value, 18);
    }

    #[test]
    fn test_resolution_leaves_meld_untouched() {
        let original = meld("r1 w r3");
        let copy = original.clone();
        resolve_run(&original, &RuleSet::default()).unwrap();
        assert_eq!(original, copy);
        assert_eq!(original.wildcard_count(), 1);
    }
}
