//! Confidence update engine
//!
//! Converts one recorded observation into a revised belief about a
//! hypothesis under an asymmetric, falsification-weighted log-odds rule:
//!
//! - belief lives in `[1, 99]` and never collapses to certainty;
//! - a test's 1–5 discriminative power maps to a likelihood ratio of
//!   `2^power`;
//! - a challenging result moves belief down 1.5x as far (in log-odds) as a
//!   supporting result of the same power moves it up;
//! - an inconclusive result moves nothing.
//!
//! The engine is a pure function: no I/O, no randomness, and identical
//! inputs produce byte-identical output including the explanation text.

pub mod engine;
pub mod types;

pub use engine::{update, ConfidenceUpdate, CHALLENGE_ASYMMETRY, LIKELIHOOD_BASE};
pub use types::{Confidence, ConfidenceError, DiscriminativePower, Observation, Significance};
