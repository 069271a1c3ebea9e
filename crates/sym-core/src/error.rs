//! Top-level session errors

use sym_delta::{CompileError, DeltaId, PayloadError};
use sym_hypothesis::LedgerError;
use sym_protocol::RosterError;

/// Everything a session operation can fail with
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Role resolution failed
    #[error("roster error: {0}")]
    Roster(#[from] RosterError),

    /// Artifact compilation failed
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// Evidence recording failed
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// An inbound delta failed its section schema and was not accepted
    #[error("delta {delta} rejected: {source}")]
    InvalidPayload {
        /// The rejected delta
        delta: DeltaId,
        /// Schema violation detail
        source: PayloadError,
    },

    /// An inbound delta's sequence did not strictly increase
    #[error("delta {delta}: sequence {sequence} not after {last}")]
    NonMonotonicSequence {
        /// The rejected delta
        delta: DeltaId,
        /// Its sequence number
        sequence: u64,
        /// Highest sequence already accepted
        last: u64,
    },

    /// Kickoff may run at most once per session
    #[error("kickoff already ran for this session")]
    AlreadyKickedOff,

    /// Promotion targeted a key absent from the compiled slate
    #[error("no slate entry `{key}` in the compiled hypothesis slate")]
    UnknownSlateEntry {
        /// The missing slate key
        key: String,
    },
}
