//! Versioned hypothesis cards and the append-only evidence ledger
//!
//! A hypothesis card holds a claim, its two prediction sets, and an
//! append-only belief history. Revisions create new versions rather than
//! editing in place. The evidence ledger is the sole writer of confidence
//! transitions: recording an observation reads the prior, runs the
//! confidence update engine once, and appends both the evidence entry and
//! the matching history record under one per-hypothesis lock.

pub mod card;
pub mod evidence;
pub mod markers;
pub mod store;

pub use card::{ConfidenceRecord, HypothesisCard, HypothesisId, VersionKey};
pub use evidence::{
    Citation, EvidenceEntry, EvidenceId, SessionId, TestDescription, TestId, TestKind,
};
pub use markers::{verify_markers, MarkerWarning};
pub use store::{EvidenceRequest, HypothesisStore, LedgerError};
