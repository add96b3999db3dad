//! Canonical JSON form consumed by render surfaces.
//!
//! Field order follows declaration order and every map is ordered, so the
//! printed form is byte-stable for equal input.

use serde::{Deserialize, Serialize};

use crate::core::error::WireError;
use crate::models::card::Card;
use crate::models::response::ActionResponse;

pub const WIRE_VERSION: u32 = 1;

fn current_version() -> u32 {
    WIRE_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireDocument {
    #[serde(default = "current_version")]
    pub version: u32,
    pub cards: Vec<Card>,
}

impl WireDocument {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            version: WIRE_VERSION,
            cards,
        }
    }
}

#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default = "current_version")]
    version: u32,
}

/// Total on a built card: validation already happened.
pub fn serialize(card: &Card) -> WireDocument {
    WireDocument::new(vec![card.clone()])
}

pub fn deserialize(doc: WireDocument) -> Result<Card, WireError> {
    let count = doc.cards.len();
    let mut cards = doc.cards.into_iter();
    match (cards.next(), cards.next()) {
        (Some(card), None) => Ok(card),
        _ => Err(WireError::CardCount(count)),
    }
}

/// Pretty form for snapshots and debugging.
pub fn print_json(doc: &WireDocument) -> Result<String, WireError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

pub fn to_json(doc: &WireDocument) -> Result<String, WireError> {
    Ok(serde_json::to_string(doc)?)
}

/// Checks the version before decoding any card, so a document from a newer
/// protocol is rejected as such rather than as malformed.
pub fn parse_document(json: &str) -> Result<WireDocument, WireError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let probe = VersionProbe::deserialize(&value)?;
    if probe.version > WIRE_VERSION {
        return Err(WireError::UnsupportedVersion {
            found: probe.version,
            supported: WIRE_VERSION,
        });
    }
    Ok(WireDocument::deserialize(value)?)
}

pub fn parse_response(json: &str) -> Result<ActionResponse, WireError> {
    Ok(serde_json::from_str(json)?)
}

/// A JSON array of responses, as recorded for replay.
pub fn parse_responses(json: &str) -> Result<Vec<ActionResponse>, WireError> {
    Ok(serde_json::from_str(json)?)
}

pub fn print_response(response: &ActionResponse) -> Result<String, WireError> {
    Ok(serde_json::to_string_pretty(response)?)
}

#[cfg(test)]
#[path = "../../tests/unit/wire.rs"]
mod tests;
