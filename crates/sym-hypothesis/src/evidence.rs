//! Evidence entries: one recorded observation and its belief transition

use crate::card::VersionKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sym_confidence::{Confidence, DiscriminativePower, Observation};
use ulid::Ulid;

/// Unique evidence entry identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EvidenceId(pub Ulid);

impl EvidenceId {
    /// Generate a fresh id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for EvidenceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session a piece of evidence was recorded in
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SessionId(pub Ulid);

impl SessionId {
    /// Generate a fresh id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of discriminative test, a closed set
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Naturally occurring contrast the researcher did not arrange
    NaturalExperiment,
    /// Same mechanism probed in a different context
    CrossContext,
    /// Intervention that blocks the proposed mechanism
    MechanismBlock,
    /// Graded exposure, graded response
    DoseResponse,
    /// Ordering of cause and effect over time
    TemporalAnalysis,
    /// Direct observation without intervention
    Observation,
    /// Published prior work
    Literature,
}

impl std::fmt::Display for TestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TestKind::NaturalExperiment => "natural-experiment",
            TestKind::CrossContext => "cross-context",
            TestKind::MechanismBlock => "mechanism-block",
            TestKind::DoseResponse => "dose-response",
            TestKind::TemporalAnalysis => "temporal-analysis",
            TestKind::Observation => "observation",
            TestKind::Literature => "literature",
        };
        f.write_str(s)
    }
}

/// Unique test identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TestId(pub Ulid);

impl TestId {
    /// Generate a fresh id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for TestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A test that can distinguish hypotheses
///
/// Immutable once attached to an evidence entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDescription {
    /// Test identifier
    pub id: TestId,
    /// What the test does, in plain language
    pub description: String,
    /// Kind of test
    pub kind: TestKind,
    /// How strongly it can distinguish hypotheses
    pub power: DiscriminativePower,
}

impl TestDescription {
    /// Create a test description
    #[inline]
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        kind: TestKind,
        power: DiscriminativePower,
    ) -> Self {
        Self {
            id: TestId::new(),
            description: description.into(),
            kind,
            power,
        }
    }
}

/// Source citation attached to an evidence entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Where the observation came from
    pub source: String,
    /// Optional transcript section anchor (the `§n` form)
    pub section: Option<u32>,
}

impl Citation {
    /// Cite a source without a section anchor
    #[inline]
    #[must_use]
    pub fn source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            section: None,
        }
    }

    /// Cite a source at a specific transcript section
    #[inline]
    #[must_use]
    pub fn at_section(source: impl Into<String>, section: u32) -> Self {
        Self {
            source: source.into(),
            section: Some(section),
        }
    }
}

/// One recorded observation and its frozen confidence transition
///
/// Entries are created exactly once by the store's `record_evidence` and
/// never edited; corrections are new entries.
/// `confidence_after` is always the engine's output for
/// (`confidence_before`, test power, `result`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    /// Entry identifier
    pub id: EvidenceId,
    /// Session the entry was recorded in
    pub session: SessionId,
    /// Hypothesis revision the entry targets
    pub hypothesis: VersionKey,
    /// The test that produced the observation
    pub test: TestDescription,
    /// Stated prediction if the hypothesis holds
    pub prediction_if_true: String,
    /// Stated prediction if the hypothesis fails
    pub prediction_if_false: String,
    /// The observed result
    pub result: Observation,
    /// Raw observation text
    pub observation: String,
    /// Optional source citation
    pub citation: Option<Citation>,
    /// Belief before the update, frozen at creation
    pub confidence_before: Confidence,
    /// Belief after the update, frozen at creation
    pub confidence_after: Confidence,
    /// Recorder's interpretation of the result
    pub interpretation: String,
    /// Creation timestamp
    pub recorded_at: DateTime<Utc>,
    /// Who recorded the entry
    pub recorded_by: String,
}
