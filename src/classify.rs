use crate::{Meld, MeldType, RuleSet};
use serde::Serialize;

/// How a meld's concrete tiles can be completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// One color, pairwise distinct numbers
    Run,
    /// One number, pairwise distinct colors
    Group,
    /// A single concrete tile plus `min_meld_size - 1` wildcards: completes either way
    Ambiguous,
    /// Cannot be completed into a run or a group
    Invalid,
}

impl Classification {
    /// The meld type this classification commits to, if it commits to one
    pub fn meld_type(&self) -> Option<MeldType> {
        match self {
            Classification::Run => Some(MeldType::Run),
            Classification::Group => Some(MeldType::Group),
            Classification::Ambiguous | Classification::Invalid => None,
        }
    }
}

/// Classify a meld by the shape of its concrete tiles.
///
/// Rules are checked in order:
/// 1. one color, distinct numbers, not the ambiguous shape -> Run
/// 2. one concrete tile and `min_meld_size - 1` wildcards -> Ambiguous
/// 3. one number, distinct colors -> Group
/// 4. anything else -> Invalid
///
/// A meld below the minimum size, or with no concrete tile at all, is Invalid.
pub fn classify(meld: &Meld, rules: &RuleSet) -> Classification {
    if meld.len() < rules.min_meld_size() as usize {
        return Classification::Invalid;
    }

    let concrete = meld.concrete_count();
    let colors = meld.distinct_colors();
    let numbers = meld.distinct_numbers();

    let ambiguous = concrete == 1 && meld.wildcard_count() == rules.min_meld_size() as usize - 1;

    if colors == 1 && numbers == concrete && !ambiguous {
        Classification::Run
    } else if ambiguous {
        Classification::Ambiguous
    } else if colors >= 1 && numbers == 1 && colors == concrete {
        Classification::Group
    } else {
        Classification::Invalid
    }
}
