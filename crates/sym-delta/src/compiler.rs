//! The delta compiler: an ordered, deterministic fold
//!
//! Merge order is strictly the delta sequence position; the compiler never
//! reorders based on content. Compiling the same ordered list twice yields
//! a bit-identical artifact, and compiling a prefix then applying the rest
//! equals compiling the whole list.

use crate::artifact::Artifact;
use crate::delta::{Delta, DeltaId, DeltaOp};
use crate::section::{PayloadError, Section};
use tracing::trace;

/// Errors from delta compilation
///
/// All variants carry enough context (section, key, delta id) to fix the
/// offending input. A failed delta is never partially applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Delta targets a different section than the artifact being built
    #[error("delta {delta} targets section {delta_section}, artifact is {artifact_section}")]
    SectionMismatch {
        /// Section of the artifact under construction
        artifact_section: Section,
        /// Section the delta named
        delta_section: Section,
        /// Offending delta
        delta: DeltaId,
    },

    /// ADD of a key that already exists
    #[error("delta {delta}: duplicate key `{key}` in section {section}")]
    DuplicateKey {
        /// Section being merged
        section: Section,
        /// The colliding key
        key: String,
        /// Offending delta
        delta: DeltaId,
    },

    /// UPDATE or typed lookup of a key that does not exist
    ///
    /// Never silently converted to an ADD.
    #[error("delta {delta}: unknown target key `{key}` in section {section}")]
    UnknownTarget {
        /// Section being merged
        section: Section,
        /// The missing key
        key: String,
        /// Offending delta
        delta: DeltaId,
    },

    /// Payload failed its section schema
    #[error("delta {delta}: {source}")]
    MalformedPayload {
        /// Offending delta
        delta: DeltaId,
        /// Schema violation detail
        source: PayloadError,
    },

    /// Deltas were not in strictly increasing sequence order
    #[error("delta {delta}: sequence {sequence} not after {previous}")]
    OutOfOrder {
        /// Offending delta
        delta: DeltaId,
        /// Its sequence number
        sequence: u64,
        /// The highest sequence already folded
        previous: u64,
    },
}

/// Stateless fold of ordered deltas into canonical artifacts
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaCompiler;

impl DeltaCompiler {
    /// Create a compiler
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compile an ordered delta list into a section artifact
    ///
    /// Deltas whose section differs from `section` are rejected, not
    /// skipped; filter the thread by section first (the session layer
    /// does). Input must already be in strictly increasing sequence
    /// order.
    ///
    /// # Errors
    /// The first [`CompileError`] encountered; the partial state is
    /// dropped.
    pub fn compile(&self, section: Section, deltas: &[Delta]) -> Result<Artifact, CompileError> {
        let mut artifact = Artifact::empty(section);
        let mut last_sequence: Option<u64> = None;
        for delta in deltas {
            if let Some(previous) = last_sequence {
                if delta.sequence <= previous {
                    return Err(CompileError::OutOfOrder {
                        delta: delta.id,
                        sequence: delta.sequence,
                        previous,
                    });
                }
            }
            last_sequence = Some(delta.sequence);
            self.apply(&mut artifact, delta)?;
        }
        Ok(artifact)
    }

    /// Apply one delta to an artifact in place
    ///
    /// Validation happens before any mutation, so on error the artifact
    /// is exactly as it was.
    ///
    /// # Errors
    /// See [`CompileError`].
    pub fn apply(&self, artifact: &mut Artifact, delta: &Delta) -> Result<(), CompileError> {
        let section = artifact.section();
        if delta.section != section {
            return Err(CompileError::SectionMismatch {
                artifact_section: section,
                delta_section: delta.section,
                delta: delta.id,
            });
        }

        match delta.operation {
            DeltaOp::Add => {
                let key = self.validate(section, delta)?;
                if artifact.contains(&key) {
                    return Err(CompileError::DuplicateKey {
                        section,
                        key,
                        delta: delta.id,
                    });
                }
                trace!(%section, %key, op = "ADD", "delta applied");
                artifact.insert(key, delta.payload.clone());
            }
            DeltaOp::Update => {
                let key = self.validate(section, delta)?;
                if !artifact.contains(&key) {
                    return Err(CompileError::UnknownTarget {
                        section,
                        key,
                        delta: delta.id,
                    });
                }
                trace!(%section, %key, op = "UPDATE", "delta applied");
                artifact.insert(key, delta.payload.clone());
            }
            DeltaOp::Remove => {
                let key = section
                    .extract_key(&delta.payload)
                    .map_err(|source| CompileError::MalformedPayload {
                        delta: delta.id,
                        source,
                    })?;
                if artifact.contains(&key) {
                    trace!(%section, %key, op = "REMOVE", "delta applied");
                    artifact.remove(&key);
                } else {
                    // Removing an absent key is idempotent by contract.
                    trace!(%section, %key, op = "REMOVE", "no-op remove");
                    artifact.bump_noop();
                }
            }
        }
        Ok(())
    }

    fn validate(&self, section: Section, delta: &Delta) -> Result<String, CompileError> {
        section
            .validate_payload(&delta.payload)
            .map_err(|source| CompileError::MalformedPayload {
                delta: delta.id,
                source,
            })
    }
}
