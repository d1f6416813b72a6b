//! A single concrete tile plus `min_meld_size - 1` wildcards completes either as a group
//! at that tile's number or as a run through it. Both are built and one is picked by
//! [`pick_interpretation`], the only place the run-or-group policy lives.

use crate::resolve::{finalize_group, resolve_run};
use crate::{Meld, MeldType, ResolveError, ResolvedMeld, RuleSet, Tile, TileSlot};
use std::collections::BTreeSet;

/// Choose between the two interpretations given their values.
///
/// On the initial meld the strictly more valuable one wins and ties go to the group.
/// Otherwise the group is always chosen. A missing candidate leaves the other one.
pub fn pick_interpretation(
    group_value: Option<u32>,
    run_value: Option<u32>,
    is_initial_meld: bool,
) -> Option<MeldType> {
    match (group_value, run_value) {
        (Some(group), Some(run)) if is_initial_meld && run > group => Some(MeldType::Run),
        (Some(_), _) => Some(MeldType::Group),
        (None, Some(_)) => Some(MeldType::Run),
        (None, None) => None,
    }
}

/// The group interpretation: `min_meld_size` tiles at the tile's number
pub fn group_candidate(tile: Tile, rules: &RuleSet) -> Option<ResolvedMeld> {
    let colors = BTreeSet::from([tile.color()]);
    finalize_group(tile.number(), &colors, rules.min_meld_size() as usize - 1, rules).ok()
}

/// The run interpretation: the tile plus `min_meld_size - 1` wildcards placed like any
/// other run, upward from the tile first and downward once the range runs out.
pub fn run_candidate(tile: Tile, rules: &RuleSet) -> Option<ResolvedMeld> {
    let mut slots = vec![TileSlot::Concrete(tile)];
    slots.resize(rules.min_meld_size() as usize, TileSlot::Wildcard);
    resolve_run(&Meld::new(slots), rules).ok()
}

/// Resolve an ambiguous meld under the run-or-group policy
pub fn resolve_ambiguous(
    meld: &Meld,
    rules: &RuleSet,
    is_initial_meld: bool,
) -> Result<ResolvedMeld, ResolveError> {
    let mut concrete = meld.concrete();
    let tile = match (concrete.next(), concrete.next()) {
        (Some(tile), None) => tile,
        _ => return Err(ResolveError::Unclassifiable),
    };

    let group = group_candidate(tile, rules);
    let run = run_candidate(tile, rules);

    let choice = pick_interpretation(
        group.as_ref().map(|m| m.value),
        run.as_ref().map(|m| m.value),
        is_initial_meld,
    );
    tracing::debug!(
        %tile,
        group = ?group.as_ref().map(|m| m.value),
        run = ?run.as_ref().map(|m| m.value),
        is_initial_meld,
        ?choice,
        "resolved ambiguous meld"
    );

    match choice {
        Some(MeldType::Group) => group.ok_or(ResolveError::Unclassifiable),
        Some(MeldType::Run) => run.ok_or(ResolveError::Unclassifiable),
        None => Err(ResolveError::InsufficientRoom {
            unplaced: meld.wildcard_count(),
        }),
    }
}
