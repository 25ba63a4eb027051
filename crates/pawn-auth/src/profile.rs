//! User profile returned by the backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The signed-in user's profile. Passed through without interpretation,
/// apart from a few read helpers for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Read a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Read a string field by name.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Best human-readable label: full name, then username, then email.
    pub fn display_name(&self) -> Option<String> {
        let first = self.get_str("first_name").filter(|s| !s.is_empty());
        let last = self.get_str("last_name").filter(|s| !s.is_empty());
        match (first, last) {
            (Some(first), Some(last)) => return Some(format!("{first} {last}")),
            (Some(first), None) => return Some(first.to_string()),
            _ => {}
        }

        ["name", "username", "email"]
            .iter()
            .find_map(|field| self.get_str(field).filter(|s| !s.is_empty()))
            .map(str::to_string)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}
