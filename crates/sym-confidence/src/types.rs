//! Validated domain types for the confidence engine
//!
//! Confidence and discriminative power are constructed through fallible
//! constructors so the update function itself never sees out-of-range
//! values.

use serde::{Deserialize, Serialize};

/// Errors raised when constructing confidence-domain values
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfidenceError {
    /// Confidence outside the open belief range
    #[error("confidence {0} outside [1, 99]")]
    ConfidenceOutOfRange(u8),

    /// Discriminative power outside the star scale
    #[error("discriminative power {0} outside [1, 5]")]
    PowerOutOfRange(u8),
}

/// Belief in a hypothesis, as a percentage in `[1, 99]`
///
/// The range is deliberately open at both ends: belief never collapses to
/// certainty in either direction, preserving residual epistemic doubt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    /// Lowest representable belief
    pub const MIN: Confidence = Confidence(1);

    /// Highest representable belief
    pub const MAX: Confidence = Confidence(99);

    /// Seed belief for a freshly proposed hypothesis
    pub const SEED: Confidence = Confidence(50);

    /// Create a validated confidence value
    ///
    /// # Errors
    /// Returns [`ConfidenceError::ConfidenceOutOfRange`] outside `[1, 99]`.
    pub fn new(value: u8) -> Result<Self, ConfidenceError> {
        if (1..=99).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfidenceError::ConfidenceOutOfRange(value))
        }
    }

    /// Create a confidence value, clamping into `[1, 99]`
    ///
    /// Used by the update engine after back-converting from log-odds.
    #[inline]
    #[must_use]
    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(1, 99))
    }

    /// Raw percentage value
    #[inline]
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Confidence {
    type Error = ConfidenceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for u8 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// How strongly a test can distinguish competing hypotheses, on a 1–5 scale
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct DiscriminativePower(u8);

impl DiscriminativePower {
    /// Weakest test
    pub const MIN: DiscriminativePower = DiscriminativePower(1);

    /// Strongest test
    pub const MAX: DiscriminativePower = DiscriminativePower(5);

    /// Create a validated power rating
    ///
    /// # Errors
    /// Returns [`ConfidenceError::PowerOutOfRange`] outside `[1, 5]`.
    pub fn new(value: u8) -> Result<Self, ConfidenceError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfidenceError::PowerOutOfRange(value))
        }
    }

    /// Raw star rating
    #[inline]
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DiscriminativePower {
    type Error = ConfidenceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiscriminativePower> for u8 {
    fn from(power: DiscriminativePower) -> Self {
        power.0
    }
}

impl std::fmt::Display for DiscriminativePower {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-star", self.0)
    }
}

/// Outcome of one recorded test against a hypothesis
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Observation {
    /// The observation matched the hypothesis's prediction
    Supports,
    /// The observation contradicted the hypothesis's prediction
    Challenges,
    /// The observation could not distinguish the predictions
    ///
    /// Policy: an inconclusive result moves belief by exactly zero. Weak
    /// tests are not penalized; they simply carry no information.
    Inconclusive,
}

impl Observation {
    /// Adjective form used in deterministic explanations
    #[inline]
    #[must_use]
    pub fn adjective(self) -> &'static str {
        match self {
            Observation::Supports => "supporting",
            Observation::Challenges => "challenging",
            Observation::Inconclusive => "inconclusive",
        }
    }
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Observation::Supports => "supports",
            Observation::Challenges => "challenges",
            Observation::Inconclusive => "inconclusive",
        };
        f.write_str(s)
    }
}

/// Size class of a confidence movement
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    /// `|delta| < 5`
    Marginal,
    /// `5 <= |delta| < 10`
    Notable,
    /// `|delta| >= 10`
    Major,
}

impl Significance {
    /// Classify a signed confidence delta
    #[inline]
    #[must_use]
    pub fn from_delta(delta: i16) -> Self {
        match delta.unsigned_abs() {
            0..=4 => Significance::Marginal,
            5..=9 => Significance::Notable,
            _ => Significance::Major,
        }
    }

    /// Whether the movement clears the reporting threshold
    #[inline]
    #[must_use]
    pub fn is_significant(self) -> bool {
        matches!(self, Significance::Notable | Significance::Major)
    }

    /// Noun phrase used in deterministic explanations
    #[inline]
    #[must_use]
    pub fn phrase(self) -> &'static str {
        match self {
            Significance::Marginal => "a marginal shift",
            Significance::Notable => "a notable shift",
            Significance::Major => "a major shift",
        }
    }
}
