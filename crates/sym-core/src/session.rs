//! The session orchestrator
//!
//! One `Session` owns one logical thread: the kickoff round, the accepted
//! delta stream (totally ordered by sequence), the canonical artifacts
//! recompiled from it, and the hypothesis store the evidence ledger writes
//! into. Sessions share nothing; each is an independent unit of
//! serialization.

use crate::error::SessionError;
use indexmap::IndexMap;
use sym_confidence::Confidence;
use sym_delta::{Artifact, Delta, DeltaCompiler, DeltaOp, Section, SlateEntry};
use sym_hypothesis::{
    EvidenceEntry, EvidenceRequest, HypothesisCard, HypothesisStore, SessionId, VersionKey,
};
use sym_protocol::{ComposedPrompt, PromptLibrary, Role, RoleRoster, SessionConfig, Unassigned};
use tracing::info;

/// One multi-party research session
pub struct Session {
    id: SessionId,
    config: SessionConfig,
    recipients: Vec<String>,
    roster: RoleRoster,
    library: PromptLibrary,
    assignments: Option<IndexMap<String, Role>>,
    thread: Vec<Delta>,
    compiler: DeltaCompiler,
    store: HypothesisStore,
}

impl Session {
    /// Create a session around a configuration and shared resources
    #[must_use]
    pub fn new(
        config: SessionConfig,
        recipients: Vec<String>,
        roster: RoleRoster,
        library: PromptLibrary,
    ) -> Self {
        Self {
            id: SessionId::new(),
            config,
            recipients,
            roster,
            library,
            assignments: None,
            thread: Vec::new(),
            compiler: DeltaCompiler::new(),
            store: HypothesisStore::new(),
        }
    }

    /// Session identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Roles resolved at kickoff, if kickoff has run
    #[inline]
    #[must_use]
    pub fn assignments(&self) -> Option<&IndexMap<String, Role>> {
        self.assignments.as_ref()
    }

    /// The accepted delta thread, in sequence order
    #[inline]
    #[must_use]
    pub fn thread(&self) -> &[Delta] {
        &self.thread
    }

    /// The hypothesis store backing this session
    #[inline]
    #[must_use]
    pub fn store(&self) -> &HypothesisStore {
        &self.store
    }

    /// Run the role protocol to completion and return the kickoff
    /// messages, one per recipient
    ///
    /// Role assignment is fixed for the session's lifetime, so kickoff
    /// runs at most once.
    ///
    /// # Errors
    /// - [`SessionError::AlreadyKickedOff`] on a second call
    /// - [`SessionError::Roster`] if the explicit roster misses a
    ///   recipient
    pub fn kickoff(&mut self) -> Result<Vec<ComposedPrompt>, SessionError> {
        if self.assignments.is_some() {
            return Err(SessionError::AlreadyKickedOff);
        }
        let resolved = Unassigned::new(
            self.config.clone(),
            self.recipients.clone(),
            self.roster.clone(),
        )
        .resolve_roles()?;
        self.assignments = Some(resolved.assignments().clone());
        let dispatched = resolved.compose_prompts(&self.library).dispatch();
        info!(session = %self.id, messages = dispatched.prompts.len(), "session kicked off");
        Ok(dispatched.prompts)
    }

    /// Accept one inbound delta into the thread
    ///
    /// The payload is validated against its section schema and the
    /// sequence number against the thread before anything is stored; a
    /// rejected delta leaves the thread untouched.
    ///
    /// # Errors
    /// - [`SessionError::NonMonotonicSequence`] if the sequence does not
    ///   strictly increase
    /// - [`SessionError::InvalidPayload`] if the payload fails its
    ///   section schema
    pub fn ingest_delta(&mut self, delta: Delta) -> Result<(), SessionError> {
        if let Some(last) = self.thread.last() {
            if delta.sequence <= last.sequence {
                return Err(SessionError::NonMonotonicSequence {
                    delta: delta.id,
                    sequence: delta.sequence,
                    last: last.sequence,
                });
            }
        }
        let validation = match delta.operation {
            DeltaOp::Add | DeltaOp::Update => delta.section.validate_payload(&delta.payload),
            DeltaOp::Remove => delta.section.extract_key(&delta.payload),
        };
        validation.map_err(|source| SessionError::InvalidPayload {
            delta: delta.id,
            source,
        })?;
        self.thread.push(delta);
        Ok(())
    }

    /// Recompile one section's canonical artifact from the full thread
    ///
    /// A pure fold over the accepted deltas: recompiling on any thread,
    /// at any time, yields the identical artifact.
    ///
    /// # Errors
    /// [`SessionError::Compile`] if the accepted stream cannot merge
    /// (duplicate ADD key, UPDATE of a missing key).
    pub fn artifact(&self, section: Section) -> Result<Artifact, SessionError> {
        let deltas: Vec<Delta> = self
            .thread
            .iter()
            .filter(|d| d.section == section)
            .cloned()
            .collect();
        Ok(self.compiler.compile(section, &deltas)?)
    }

    /// Register a new hypothesis directly, returning its version key
    pub fn propose_hypothesis(&self, card: HypothesisCard) -> VersionKey {
        self.store.insert(card)
    }

    /// Promote a compiled slate entry into the hypothesis store
    ///
    /// Seeds the card from the entry's payload; the slate's optional
    /// `initial_confidence` wins over the default seed.
    ///
    /// # Errors
    /// - [`SessionError::Compile`] if the slate cannot be compiled
    /// - [`SessionError::UnknownSlateEntry`] if `key` is absent from it
    pub fn promote_slate_entry(&self, key: &str) -> Result<VersionKey, SessionError> {
        let slate = self.artifact(Section::HypothesisSlate)?;
        let payload = slate
            .entry(key)
            .ok_or_else(|| SessionError::UnknownSlateEntry {
                key: key.to_string(),
            })?;
        // Accepted deltas already passed the slate schema.
        let entry: SlateEntry =
            serde_json::from_value(payload.clone()).map_err(|_| SessionError::UnknownSlateEntry {
                key: key.to_string(),
            })?;
        let card = HypothesisCard::propose_with_seed(
            entry.statement,
            entry.mechanism,
            entry.predictions_if_true,
            entry.predictions_if_false,
            entry.initial_confidence.unwrap_or(Confidence::SEED),
        );
        Ok(self.store.insert(card))
    }

    /// Record one observation against a hypothesis in this session
    ///
    /// The request's session field is stamped with this session's id;
    /// recording is serialized per hypothesis by the store.
    ///
    /// # Errors
    /// [`SessionError::Ledger`] on unknown hypotheses or prior
    /// mismatches.
    pub fn record_evidence(
        &self,
        mut request: EvidenceRequest,
    ) -> Result<EvidenceEntry, SessionError> {
        request.session = self.id;
        Ok(self.store.record_evidence(request)?)
    }
}
