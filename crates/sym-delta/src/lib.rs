//! Delta compiler and canonical artifacts
//!
//! Independent agents author structured updates ("deltas"), each tagged
//! with a target artifact section, a merge operation, and a thread
//! sequence position. This crate folds an ordered delta list into one
//! canonical, versioned, content-hashed artifact per section.
//!
//! The fold is deterministic (same ordered list, bit-identical artifact),
//! monotonic (a prefix yields a strict sub-state), and total-order based:
//! conflict handling is domain-specific, not a general CRDT.

pub mod artifact;
pub mod compiler;
pub mod delta;
pub mod section;

pub use artifact::{Artifact, ContentHash};
pub use compiler::{CompileError, DeltaCompiler};
pub use delta::{Delta, DeltaId, DeltaOp};
pub use section::{
    AnomalyEntry, AssumptionEntry, CritiqueEntry, PayloadError, Section, Severity, SlateEntry,
    TestCatalogEntry,
};
