//! Helpers for the provider's wire format.

use serde::Deserialize;

/// An identifier the provider sends either as a string or as a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(serde_json::Number),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(s) => s,
            WireId::Number(n) => n.to_string(),
        }
    }
}

/// Converts an optional wire id into a string, empty when absent.
#[must_use]
pub fn id_string(id: Option<WireId>) -> String {
    id.map(String::from).unwrap_or_default()
}
