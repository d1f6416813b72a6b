use crate::ambiguity::resolve_ambiguous;
use crate::resolve::resolve;
use crate::{
    Classification, Meld, ParseError, ResolveError, ResolvedMeld, RuleSet, TileId, TileSlot,
    classify,
};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::Display;

/// Points the melds of a player's first move must reach together
pub const INITIAL_MELD_THRESHOLD: u32 = 30;

const EMPTY_SELECTION_MESSAGE: &str = "no valid move — must draw a tile.";

/// What the optimizer chose to play, in tile identities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Rack tiles moved onto the table
    #[serde(default)]
    pub tiles: Vec<TileId>,
    /// Melds to form, each a bag of identities with wildcards unresolved
    #[serde(default)]
    pub melds: Vec<Vec<TileId>>,
    /// The optimizer's own objective value, passed through untouched
    #[serde(default)]
    pub objective: f64,
}

impl Selection {
    /// Build a selection from notation: `tiles` like ["r5", "w"], `melds` like ["r5 w w"]
    pub fn from_notation(
        tiles: &[&str],
        melds: &[&str],
        objective: f64,
        rules: &RuleSet,
    ) -> Result<Self, ParseError> {
        let tiles = tiles
            .iter()
            .map(|s| TileSlot::from_string(s, rules).map(|slot| rules.encode(slot)))
            .collect::<Result<Vec<_>, _>>()?;
        let melds = melds
            .iter()
            .map(|s| {
                Meld::from_string(s, rules)
                    .map(|meld| {
                        meld.slots()
                            .iter()
                            .map(|&slot| rules.encode(slot))
                            .collect::<Vec<_>>()
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Selection {
            tiles,
            melds,
            objective,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.melds.is_empty()
    }
}

/// A note about part of the selection that was left out of the result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Index into the selection's melds, or None for a moved tile
    pub meld_index: Option<usize>,
    #[serde(serialize_with = "serialize_display")]
    pub reason: ResolveError,
}

fn serialize_display<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// The resolved, scored move
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveResult {
    accepted: bool,
    melds: Vec<ResolvedMeld>,
    total_value: u32,
    tiles_to_play: Vec<TileSlot>,
    objective: f64,
    message: String,
    diagnostics: Vec<Diagnostic>,
}

impl MoveResult {
    fn rejected(message: String, total_value: u32, objective: f64, diagnostics: Vec<Diagnostic>) -> Self {
        MoveResult {
            accepted: false,
            melds: Vec::new(),
            total_value,
            tiles_to_play: Vec::new(),
            objective,
            message,
            diagnostics,
        }
    }

    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn melds(&self) -> &[ResolvedMeld] {
        &self.melds
    }

    /// Sum of the resolved melds' values
    pub fn total_value(&self) -> u32 {
        self.total_value
    }

    pub fn tiles_to_play(&self) -> &[TileSlot] {
        &self.tiles_to_play
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Classify one meld and resolve it the way its classification calls for
pub fn resolve_meld(meld: &Meld, rules: &RuleSet, is_initial_meld: bool) -> Result<ResolvedMeld, ResolveError> {
    if meld.wildcard_count() > rules.wildcards() as usize {
        return Err(ResolveError::TooManyWildcards {
            count: meld.wildcard_count(),
            supply: rules.wildcards(),
        });
    }

    let classification = classify(meld, rules);
    tracing::debug!(?classification, size = meld.len(), "classified meld");

    match classification {
        Classification::Run | Classification::Group => {
            let meld_type = classification
                .meld_type()
                .ok_or(ResolveError::Unclassifiable)?;
            resolve(meld, meld_type, rules)
        }
        Classification::Ambiguous => resolve_ambiguous(meld, rules, is_initial_meld),
        Classification::Invalid => Err(ResolveError::Unclassifiable),
    }
}

/// Resolve every meld of the optimizer's selection into a scored move.
///
/// A meld that cannot be resolved is dropped and noted in the diagnostics; the rest of
/// the move still goes through. On the initial meld the total must reach
/// [`INITIAL_MELD_THRESHOLD`], counted over every resolved meld.
pub fn resolve_move(selection: &Selection, rules: &RuleSet, is_initial_meld: bool) -> MoveResult {
    if selection.is_empty() {
        tracing::info!("empty selection, nothing to play");
        return MoveResult::rejected(
            EMPTY_SELECTION_MESSAGE.to_string(),
            0,
            selection.objective,
            Vec::new(),
        );
    }

    let mut diagnostics = Vec::new();

    let mut tiles_to_play = Vec::with_capacity(selection.tiles.len());
    for &id in &selection.tiles {
        match rules.decode(id) {
            Ok(slot) => tiles_to_play.push(slot),
            Err(reason) => {
                tracing::warn!(id = id.0, %reason, "dropping moved tile");
                diagnostics.push(Diagnostic {
                    meld_index: None,
                    reason,
                });
            }
        }
    }

    let mut melds = Vec::with_capacity(selection.melds.len());
    for (index, ids) in selection.melds.iter().enumerate() {
        let resolved = Meld::from_ids(ids, rules)
            .and_then(|meld| resolve_meld(&meld, rules, is_initial_meld));
        match resolved {
            Ok(meld) => melds.push(meld),
            Err(reason) => {
                tracing::warn!(index, %reason, "dropping meld");
                diagnostics.push(Diagnostic {
                    meld_index: Some(index),
                    reason,
                });
            }
        }
    }

    let total_value: u32 = melds.iter().map(|m| m.value).sum();

    if is_initial_meld && total_value < INITIAL_MELD_THRESHOLD {
        tracing::info!(total_value, "initial meld below threshold");
        return MoveResult::rejected(
            format!(
                "initial meld requires {}+ points, current play: {} points.",
                INITIAL_MELD_THRESHOLD, total_value
            ),
            total_value,
            selection.objective,
            diagnostics,
        );
    }

    tracing::info!(total_value, melds = melds.len(), "move accepted");
    MoveResult {
        accepted: true,
        melds,
        total_value,
        tiles_to_play,
        objective: selection.objective,
        message: format!("valid move found, point value: {}", total_value),
        diagnostics,
    }
}
