//! Artifact sections and their payload schemas
//!
//! Sections are a closed set; each carries its own keyed payload schema.
//! Validation is deserialization: a payload is accepted iff it parses into
//! the section's schema struct, and its `id` field is the merge key.

use serde::{Deserialize, Serialize};
use sym_confidence::{Confidence, DiscriminativePower};
use sym_hypothesis::TestKind;

/// The closed set of artifact sections
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// The slate of hypotheses under consideration
    HypothesisSlate,
    /// Catalog of tests that can distinguish them
    DiscriminativeTests,
    /// Assumptions the session is leaning on
    AssumptionLedger,
    /// Observations that fit no current hypothesis
    AnomalyRegister,
    /// The critic's structured objections
    AdversarialCritique,
}

impl Section {
    /// All sections, in canonical order
    pub const ALL: [Section; 5] = [
        Section::HypothesisSlate,
        Section::DiscriminativeTests,
        Section::AssumptionLedger,
        Section::AnomalyRegister,
        Section::AdversarialCritique,
    ];

    /// Stable wire name
    #[inline]
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Section::HypothesisSlate => "hypothesis_slate",
            Section::DiscriminativeTests => "discriminative_tests",
            Section::AssumptionLedger => "assumption_ledger",
            Section::AnomalyRegister => "anomaly_register",
            Section::AdversarialCritique => "adversarial_critique",
        }
    }

    /// Validate a payload against this section's schema
    ///
    /// Returns the payload's merge key.
    ///
    /// # Errors
    /// [`PayloadError`] naming the section if the payload does not parse
    /// into the schema or its key is empty.
    pub fn validate_payload(self, payload: &serde_json::Value) -> Result<String, PayloadError> {
        let key = match self {
            Section::HypothesisSlate => {
                parse::<SlateEntry>(self, payload)?.id
            }
            Section::DiscriminativeTests => parse::<TestCatalogEntry>(self, payload)?.id,
            Section::AssumptionLedger => parse::<AssumptionEntry>(self, payload)?.id,
            Section::AnomalyRegister => parse::<AnomalyEntry>(self, payload)?.id,
            Section::AdversarialCritique => parse::<CritiqueEntry>(self, payload)?.id,
        };
        if key.is_empty() {
            return Err(PayloadError {
                section: self,
                message: "payload key `id` must be non-empty".to_string(),
            });
        }
        Ok(key)
    }

    /// Extract only the merge key, without full schema validation
    ///
    /// Used for `Remove`, whose payload only needs to name its target.
    ///
    /// # Errors
    /// [`PayloadError`] if the payload has no string `id` field.
    pub fn extract_key(self, payload: &serde_json::Value) -> Result<String, PayloadError> {
        let key = parse::<KeyOnly>(self, payload)?.id;
        if key.is_empty() {
            return Err(PayloadError {
                section: self,
                message: "payload key `id` must be non-empty".to_string(),
            });
        }
        Ok(key)
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

fn parse<T: serde::de::DeserializeOwned>(
    section: Section,
    payload: &serde_json::Value,
) -> Result<T, PayloadError> {
    serde_json::from_value(payload.clone()).map_err(|e| PayloadError {
        section,
        message: e.to_string(),
    })
}

/// A payload that failed its section's schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed payload for section {section}: {message}")]
pub struct PayloadError {
    /// Section whose schema was violated
    pub section: Section,
    /// What went wrong
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct KeyOnly {
    id: String,
}

/// Shared severity scale for anomalies and critiques
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Worth noting
    Low,
    /// Should be addressed this round
    Medium,
    /// Blocks confidence in the slate
    High,
}

/// One hypothesis on the slate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlateEntry {
    /// Merge key
    pub id: String,
    /// The claim
    pub statement: String,
    /// Mechanism sketch
    #[serde(default)]
    pub mechanism: String,
    /// Predictions if the claim holds
    #[serde(default)]
    pub predictions_if_true: Vec<String>,
    /// Predictions if the claim fails
    #[serde(default)]
    pub predictions_if_false: Vec<String>,
    /// Optional seed belief for promotion into the card store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_confidence: Option<Confidence>,
}

/// One proposed discriminative test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestCatalogEntry {
    /// Merge key
    pub id: String,
    /// What the test does
    pub description: String,
    /// Kind of test
    pub kind: TestKind,
    /// 1–5 discriminative power
    pub power: DiscriminativePower,
    /// Slate ids this test can separate
    #[serde(default)]
    pub targets: Vec<String>,
}

/// One assumption the session is leaning on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssumptionEntry {
    /// Merge key
    pub id: String,
    /// The assumption
    pub assumption: String,
    /// Whether conclusions fall if it fails
    #[serde(default)]
    pub load_bearing: bool,
    /// Who vouches for it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// One observation that fits no current hypothesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnomalyEntry {
    /// Merge key
    pub id: String,
    /// What was observed
    pub observation: String,
    /// How badly it strains the slate
    pub severity: Severity,
    /// Slate id it most nearly contradicts, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_hypothesis: Option<String>,
}

/// One structured objection from the adversarial critic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CritiqueEntry {
    /// Merge key
    pub id: String,
    /// Slate or catalog id under attack
    pub target: String,
    /// The objection
    pub critique: String,
    /// How damaging it is if it sticks
    pub severity: Severity,
}
