//! Versioned hypothesis cards with append-only belief history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sym_confidence::Confidence;
use ulid::Ulid;

/// Stable identifier shared by all versions of one hypothesis
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct HypothesisId(pub Ulid);

impl HypothesisId {
    /// Generate a fresh id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for HypothesisId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HypothesisId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address of one immutable hypothesis revision
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VersionKey {
    /// Stable hypothesis identity
    pub id: HypothesisId,
    /// Monotonically increasing revision number, starting at 1
    pub version: u32,
}

impl VersionKey {
    /// Create a version key
    #[inline]
    #[must_use]
    pub fn new(id: HypothesisId, version: u32) -> Self {
        Self { id, version }
    }
}

impl std::fmt::Display for VersionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-v{}", self.id, self.version)
    }
}

/// One frozen point in a card's belief history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceRecord {
    /// Belief at this point
    pub confidence: Confidence,
    /// When the transition was recorded
    pub timestamp: DateTime<Utc>,
    /// Why belief moved (or how it was seeded)
    pub reason: String,
}

/// A versioned record of a claim, its predictions, and its belief history
///
/// # Invariants
/// - `confidence_history` is seeded at construction, append-only, never
///   reordered or truncated
/// - [`Self::current_confidence`] is always the last history entry
/// - a change to statement or predictions produces a *new version* with a
///   fresh seeded history, never an in-place edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypothesisCard {
    key: VersionKey,
    statement: String,
    mechanism: String,
    predictions_if_true: Vec<String>,
    predictions_if_false: Vec<String>,
    confidence_history: Vec<ConfidenceRecord>,
}

impl HypothesisCard {
    /// Create version 1 of a new hypothesis, seeded at the default belief
    #[must_use]
    pub fn propose(
        statement: impl Into<String>,
        mechanism: impl Into<String>,
        predictions_if_true: Vec<String>,
        predictions_if_false: Vec<String>,
    ) -> Self {
        Self::propose_with_seed(
            statement,
            mechanism,
            predictions_if_true,
            predictions_if_false,
            Confidence::SEED,
        )
    }

    /// Create version 1 with an explicit seed belief
    #[must_use]
    pub fn propose_with_seed(
        statement: impl Into<String>,
        mechanism: impl Into<String>,
        predictions_if_true: Vec<String>,
        predictions_if_false: Vec<String>,
        seed: Confidence,
    ) -> Self {
        Self {
            key: VersionKey::new(HypothesisId::new(), 1),
            statement: statement.into(),
            mechanism: mechanism.into(),
            predictions_if_true,
            predictions_if_false,
            confidence_history: vec![ConfidenceRecord {
                confidence: seed,
                timestamp: Utc::now(),
                reason: "initial proposal".to_string(),
            }],
        }
    }

    /// Derive the next version after a statement or prediction change
    ///
    /// Carries the stable id forward, bumps the version, and starts a
    /// fresh history seeded at `seed` with the given reason.
    #[must_use]
    pub fn revise(
        &self,
        statement: impl Into<String>,
        predictions_if_true: Vec<String>,
        predictions_if_false: Vec<String>,
        seed: Confidence,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            key: VersionKey::new(self.key.id, self.key.version + 1),
            statement: statement.into(),
            mechanism: self.mechanism.clone(),
            predictions_if_true,
            predictions_if_false,
            confidence_history: vec![ConfidenceRecord {
                confidence: seed,
                timestamp: Utc::now(),
                reason: reason.into(),
            }],
        }
    }

    /// Version key addressing this revision
    #[inline]
    #[must_use]
    pub fn key(&self) -> VersionKey {
        self.key
    }

    /// The claim under test
    #[inline]
    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Sketch of the proposed mechanism
    #[inline]
    #[must_use]
    pub fn mechanism(&self) -> &str {
        &self.mechanism
    }

    /// What should be observed if the hypothesis holds
    #[inline]
    #[must_use]
    pub fn predictions_if_true(&self) -> &[String] {
        &self.predictions_if_true
    }

    /// What should be observed if the hypothesis fails
    #[inline]
    #[must_use]
    pub fn predictions_if_false(&self) -> &[String] {
        &self.predictions_if_false
    }

    /// Full belief history, oldest first
    #[inline]
    #[must_use]
    pub fn confidence_history(&self) -> &[ConfidenceRecord] {
        &self.confidence_history
    }

    /// Current belief: the last history entry
    #[inline]
    #[must_use]
    pub fn current_confidence(&self) -> Confidence {
        // History is seeded at construction and append-only.
        self.confidence_history
            .last()
            .map_or(Confidence::SEED, |record| record.confidence)
    }

    /// Append a belief transition
    ///
    /// Crate-private: the evidence ledger is the sole writer of
    /// confidence transitions.
    pub(crate) fn push_record(&mut self, record: ConfidenceRecord) {
        self.confidence_history.push(record);
    }
}
