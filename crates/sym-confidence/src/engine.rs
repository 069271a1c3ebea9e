//! The asymmetric log-odds update rule
//!
//! Belief is moved in log-odds space so that repeated updates compose
//! multiplicatively and never reach 0 or 100. A challenging result of equal
//! discriminative power moves belief further down than a supporting result
//! moves it up: exclusion outweighs confirmation.

use crate::types::{Confidence, DiscriminativePower, Observation, Significance};
use serde::{Deserialize, Serialize};

/// Likelihood-ratio base: `LR(power) = LIKELIHOOD_BASE ^ power`
///
/// A 3-star test carries a likelihood ratio of 8; a 5-star test, 32.
pub const LIKELIHOOD_BASE: f64 = 2.0;

/// Extra weight applied to challenging results in log-odds space
///
/// Must stay above 1 so that falsification always dominates confirmation
/// at equal power.
pub const CHALLENGE_ASYMMETRY: f64 = 1.5;

/// Result of one confidence update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceUpdate {
    /// Revised belief, clamped to `[1, 99]`
    pub new_confidence: Confidence,
    /// Signed movement, `new - current`, measured after rounding
    pub delta: i16,
    /// Size class of the movement
    pub significance: Significance,
    /// Deterministic sentence describing the movement
    pub explanation: String,
}

/// Revise belief in a hypothesis given one observed test result
///
/// Pure and total over its validated domain: identical inputs always
/// produce identical output, including the explanation text.
///
/// ```
/// use sym_confidence::{update, Confidence, DiscriminativePower, Observation, Significance};
///
/// let current = Confidence::new(50).unwrap();
/// let power = DiscriminativePower::new(3).unwrap();
/// let result = update(current, power, Observation::Challenges);
///
/// assert_eq!(result.new_confidence.value(), 4);
/// assert_eq!(result.delta, -46);
/// assert_eq!(result.significance, Significance::Major);
/// ```
#[must_use]
pub fn update(
    current: Confidence,
    power: DiscriminativePower,
    result: Observation,
) -> ConfidenceUpdate {
    let p = f64::from(current.value());
    let log_odds = (p / (100.0 - p)).ln();

    // ln(2^power), applied asymmetrically by result kind
    let swing = f64::from(power.value()) * LIKELIHOOD_BASE.ln();
    let revised = match result {
        Observation::Supports => log_odds + swing,
        Observation::Challenges => log_odds - swing * CHALLENGE_ASYMMETRY,
        Observation::Inconclusive => log_odds,
    };

    let p_revised = 100.0 / (1.0 + (-revised).exp());
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let new_confidence = Confidence::clamped(p_revised.round().clamp(1.0, 99.0) as u8);

    let delta = i16::from(new_confidence.value()) - i16::from(current.value());
    let significance = Significance::from_delta(delta);
    let explanation = explain(current, power, result, new_confidence, delta, significance);

    ConfidenceUpdate {
        new_confidence,
        delta,
        significance,
        explanation,
    }
}

/// Render the fixed explanation template
fn explain(
    current: Confidence,
    power: DiscriminativePower,
    result: Observation,
    new_confidence: Confidence,
    delta: i16,
    significance: Significance,
) -> String {
    if delta == 0 {
        return format!(
            "A {power} {} observation left confidence unchanged at {current}.",
            result.adjective(),
        );
    }
    let direction = if delta > 0 { "up" } else { "down" };
    format!(
        "A {power} {} observation moved confidence {direction} {} points, from {current} to {new_confidence} ({}).",
        result.adjective(),
        delta.unsigned_abs(),
        significance.phrase(),
    )
}
