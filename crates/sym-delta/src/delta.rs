//! The delta wire type
//!
//! A delta is an atomic, agent-authored structured update targeting one
//! artifact section. `sequence` is assigned by arrival order within the
//! session thread and is the sole ordering key; deltas are immutable once
//! accepted.

use crate::section::Section;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique delta identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DeltaId(pub Ulid);

impl DeltaId {
    /// Generate a fresh id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for DeltaId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DeltaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Merge operation carried by a delta
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeltaOp {
    /// Insert a keyed entry; duplicate keys are a hard error
    Add,
    /// Replace the keyed entry; a missing key is a hard error, never a
    /// silent Add
    Update,
    /// Delete the keyed entry; a missing key is an idempotent no-op
    Remove,
}

impl std::fmt::Display for DeltaOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeltaOp::Add => "ADD",
            DeltaOp::Update => "UPDATE",
            DeltaOp::Remove => "REMOVE",
        };
        f.write_str(s)
    }
}

/// One structured update to one artifact section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    /// Delta identifier
    pub id: DeltaId,
    /// Role string of the authoring agent
    pub role: String,
    /// Target artifact section
    pub section: Section,
    /// Merge operation
    pub operation: DeltaOp,
    /// Section-schema payload
    pub payload: serde_json::Value,
    /// Arrival position within the thread, strictly increasing
    pub sequence: u64,
}

impl Delta {
    /// Create a delta with a fresh id
    #[inline]
    #[must_use]
    pub fn new(
        role: impl Into<String>,
        section: Section,
        operation: DeltaOp,
        payload: serde_json::Value,
        sequence: u64,
    ) -> Self {
        Self {
            id: DeltaId::new(),
            role: role.into(),
            section,
            operation,
            payload,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operation_wire_form() {
        assert_eq!(serde_json::to_string(&DeltaOp::Add).unwrap(), "\"ADD\"");
        assert_eq!(
            serde_json::from_str::<DeltaOp>("\"REMOVE\"").unwrap(),
            DeltaOp::Remove
        );
    }

    #[test]
    fn delta_round_trips() {
        let delta = Delta::new(
            "test_designer",
            Section::DiscriminativeTests,
            DeltaOp::Add,
            json!({ "id": "T1" }),
            7,
        );
        let wire = serde_json::to_string(&delta).unwrap();
        let back: Delta = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, delta);
    }
}
