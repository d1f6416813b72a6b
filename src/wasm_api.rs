use crate::{MoveResult, RuleSet, Selection, resolve_move};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Response envelope: the move result on success, an error string otherwise
#[derive(Serialize)]
pub struct ResolveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<MoveResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Main WASM API: resolve and score the optimizer's selection
///
/// # Arguments
/// * `selection_json` - JSON object: `{"tiles": [..ids], "melds": [[..ids], ..], "objective": 7}`
/// * `rules_json` - JSON rule set (e.g. `{"numbers": 13, "colours": 4}`), or "" for the defaults
/// * `initial_meld` - Whether this is the player's first move (30-point gate)
///
/// # Returns
/// JSON string with ResolveResponse. `success` is false only when the input could not be
/// used at all; a rejected move still has `success: true` and `result.accepted: false`.
#[wasm_bindgen]
pub fn resolve_move_json(selection_json: &str, rules_json: &str, initial_meld: bool) -> String {
    let response = match resolve_internal(selection_json, rules_json, initial_meld) {
        Ok(result) => ResolveResponse {
            success: true,
            result: Some(result),
            error: None,
        },
        Err(e) => ResolveResponse {
            success: false,
            result: None,
            error: Some(e),
        },
    };
    serde_json::to_string(&response)
        .unwrap_or_else(|e| format!(r#"{{"success":false,"error":"Serialization error: {}"}}"#, e))
}

fn resolve_internal(selection_json: &str, rules_json: &str, initial_meld: bool) -> Result<MoveResult, String> {
    let rules = parse_rules(rules_json)?;
    let selection: Selection = serde_json::from_str(selection_json)
        .map_err(|e| format!("Invalid selection JSON: {}", e))?;

    Ok(resolve_move(&selection, &rules, initial_meld))
}

fn parse_rules(rules_json: &str) -> Result<RuleSet, String> {
    if rules_json.trim().is_empty() {
        return Ok(RuleSet::default());
    }
    serde_json::from_str(rules_json).map_err(|e| format!("Invalid rules: {}", e))
}

/// The default rule set as JSON
#[wasm_bindgen]
pub fn default_rules() -> String {
    serde_json::to_string(&RuleSet::default())
        .unwrap_or_else(|e| format!(r#"{{"error":"Serialization error: {}"}}"#, e))
}
