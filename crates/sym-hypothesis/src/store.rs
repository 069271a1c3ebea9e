//! Hypothesis store and the append-only evidence ledger
//!
//! Each hypothesis revision lives behind its own lock so evidence
//! recording is serialized per hypothesis (the read-update-append step is
//! atomic) while distinct hypotheses proceed in parallel.

use crate::card::{ConfidenceRecord, HypothesisCard, VersionKey};
use crate::evidence::{Citation, EvidenceEntry, EvidenceId, SessionId, TestDescription};
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use sym_confidence::{update, Confidence, Observation};
use tracing::debug;

/// Errors from ledger operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// No card registered under the version key
    #[error("unknown hypothesis version: {0}")]
    UnknownHypothesis(VersionKey),

    /// The caller's expected prior does not match the card's actual prior
    ///
    /// A hard failure: silently re-basing the entry would corrupt the
    /// audit trail the ledger exists to provide.
    #[error("prior mismatch for {hypothesis}: expected {expected}, actual {actual}")]
    PriorMismatch {
        /// The targeted revision
        hypothesis: VersionKey,
        /// Prior the caller read
        expected: Confidence,
        /// Prior the card actually holds
        actual: Confidence,
    },
}

/// Everything needed to record one piece of evidence
#[derive(Debug, Clone)]
pub struct EvidenceRequest {
    /// Session the recording belongs to
    pub session: SessionId,
    /// Target hypothesis revision
    pub hypothesis: VersionKey,
    /// Test that produced the observation
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
    /// Recorder's interpretation
    pub interpretation: String,
    /// Recorder identity
    pub recorded_by: String,
    /// Prior the caller read, if it wants the write fenced against races
    pub expected_prior: Option<Confidence>,
}

struct CardSlot {
    card: HypothesisCard,
    ledger: Vec<EvidenceEntry>,
}

/// Store of versioned hypothesis cards and their evidence ledgers
///
/// The store's `record_evidence` is the *only* writer of confidence
/// transitions; no other path mutates a card's history.
#[derive(Default)]
pub struct HypothesisStore {
    slots: DashMap<VersionKey, Mutex<CardSlot>>,
}

impl HypothesisStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card, returning its version key
    ///
    /// The card is stored as-is; propose it via
    /// [`HypothesisCard::propose`] first.
    pub fn insert(&self, card: HypothesisCard) -> VersionKey {
        let key = card.key();
        self.slots.insert(
            key,
            Mutex::new(CardSlot {
                card,
                ledger: Vec::new(),
            }),
        );
        key
    }

    /// Derive and register the next version of an existing hypothesis
    ///
    /// The prior version stays in the store, immutable, with its ledger.
    ///
    /// # Errors
    /// [`LedgerError::UnknownHypothesis`] if `key` is not registered.
    pub fn revise(
        &self,
        key: VersionKey,
        statement: impl Into<String>,
        predictions_if_true: Vec<String>,
        predictions_if_false: Vec<String>,
        seed: Confidence,
        reason: impl Into<String>,
    ) -> Result<VersionKey, LedgerError> {
        let next = {
            let slot = self
                .slots
                .get(&key)
                .ok_or(LedgerError::UnknownHypothesis(key))?;
            let guard = slot.lock();
            guard.card.revise(
                statement,
                predictions_if_true,
                predictions_if_false,
                seed,
                reason,
            )
        };
        Ok(self.insert(next))
    }

    /// Snapshot of a card
    #[must_use]
    pub fn card(&self, key: VersionKey) -> Option<HypothesisCard> {
        self.slots.get(&key).map(|slot| slot.lock().card.clone())
    }

    /// Snapshot of a revision's evidence ledger, oldest first
    #[must_use]
    pub fn ledger(&self, key: VersionKey) -> Option<Vec<EvidenceEntry>> {
        self.slots.get(&key).map(|slot| slot.lock().ledger.clone())
    }

    /// Record one observation against a hypothesis revision
    ///
    /// Atomically, under the revision's lock: reads the current belief,
    /// runs the confidence update engine exactly once, appends the
    /// evidence entry and the matching history record. This guarantees
    /// the causality invariant: entry *n*'s `confidence_before` equals
    /// entry *n−1*'s `confidence_after` (the seed for *n = 1*).
    ///
    /// # Errors
    /// - [`LedgerError::UnknownHypothesis`] if the revision is not
    ///   registered
    /// - [`LedgerError::PriorMismatch`] if `expected_prior` was supplied
    ///   and differs from the card's actual prior; nothing is written
    pub fn record_evidence(&self, request: EvidenceRequest) -> Result<EvidenceEntry, LedgerError> {
        let slot = self
            .slots
            .get(&request.hypothesis)
            .ok_or(LedgerError::UnknownHypothesis(request.hypothesis))?;
        let mut guard = slot.lock();

        let before = guard.card.current_confidence();
        if let Some(expected) = request.expected_prior {
            if expected != before {
                return Err(LedgerError::PriorMismatch {
                    hypothesis: request.hypothesis,
                    expected,
                    actual: before,
                });
            }
        }

        let outcome = update(before, request.test.power, request.result);
        debug!(
            hypothesis = %request.hypothesis,
            result = %request.result,
            delta = outcome.delta,
            "evidence recorded"
        );

        let now = Utc::now();
        let entry = EvidenceEntry {
            id: EvidenceId::new(),
            session: request.session,
            hypothesis: request.hypothesis,
            test: request.test,
            prediction_if_true: request.prediction_if_true,
            prediction_if_false: request.prediction_if_false,
            result: request.result,
            observation: request.observation,
            citation: request.citation,
            confidence_before: before,
            confidence_after: outcome.new_confidence,
            interpretation: request.interpretation,
            recorded_at: now,
            recorded_by: request.recorded_by,
        };

        guard.card.push_record(ConfidenceRecord {
            confidence: outcome.new_confidence,
            timestamp: now,
            reason: outcome.explanation,
        });
        guard.ledger.push(entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::TestKind;
    use pretty_assertions::assert_eq;
    use sym_confidence::DiscriminativePower;

    fn store_with_card() -> (HypothesisStore, VersionKey) {
        let store = HypothesisStore::new();
        let key = store.insert(HypothesisCard::propose(
            "context switches drive the latency tail",
            "scheduler preemption under load",
            vec!["tail shrinks with pinned cores".into()],
            vec!["tail unchanged with pinned cores".into()],
        ));
        (store, key)
    }

    fn request(key: VersionKey, power: u8, result: Observation) -> EvidenceRequest {
        EvidenceRequest {
            session: SessionId::new(),
            hypothesis: key,
            test: TestDescription::new(
                "pin worker threads, re-measure p99",
                TestKind::MechanismBlock,
                DiscriminativePower::new(power).unwrap(),
            ),
            prediction_if_true: "tail shrinks".into(),
            prediction_if_false: "tail unchanged".into(),
            result,
            observation: "p99 fell from 80ms to 12ms".into(),
            citation: Some(Citation::at_section("bench run 14", 3)),
            interpretation: "consistent with preemption".into(),
            recorded_by: "aria".into(),
            expected_prior: None,
        }
    }

    #[test]
    fn record_freezes_before_and_after() {
        let (store, key) = store_with_card();
        let entry = store
            .record_evidence(request(key, 3, Observation::Supports))
            .unwrap();

        assert_eq!(entry.confidence_before.value(), 50);
        assert_eq!(entry.confidence_after.value(), 89);

        let card = store.card(key).unwrap();
        assert_eq!(card.current_confidence().value(), 89);
        assert_eq!(card.confidence_history().len(), 2);
    }

    #[test]
    fn ledger_is_causally_chained() {
        let (store, key) = store_with_card();
        for result in [
            Observation::Supports,
            Observation::Challenges,
            Observation::Supports,
        ] {
            store.record_evidence(request(key, 2, result)).unwrap();
        }

        let ledger = store.ledger(key).unwrap();
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger[0].confidence_before.value(), 50);
        for pair in ledger.windows(2) {
            assert_eq!(pair[1].confidence_before, pair[0].confidence_after);
        }

        let card = store.card(key).unwrap();
        assert_eq!(card.confidence_history().len(), 4);
        assert_eq!(
            card.current_confidence(),
            ledger.last().unwrap().confidence_after
        );
    }

    #[test]
    fn prior_mismatch_is_a_hard_failure() {
        let (store, key) = store_with_card();
        store
            .record_evidence(request(key, 3, Observation::Supports))
            .unwrap();

        let mut stale = request(key, 2, Observation::Challenges);
        stale.expected_prior = Some(Confidence::SEED);
        let err = store.record_evidence(stale).unwrap_err();
        assert_eq!(
            err,
            LedgerError::PriorMismatch {
                hypothesis: key,
                expected: Confidence::SEED,
                actual: Confidence::new(89).unwrap(),
            }
        );

        // Nothing was written.
        assert_eq!(store.ledger(key).unwrap().len(), 1);
        assert_eq!(store.card(key).unwrap().confidence_history().len(), 2);
    }

    #[test]
    fn matching_expected_prior_passes() {
        let (store, key) = store_with_card();
        let mut fenced = request(key, 1, Observation::Challenges);
        fenced.expected_prior = Some(Confidence::SEED);
        assert!(store.record_evidence(fenced).is_ok());
    }

    #[test]
    fn unknown_hypothesis_rejected() {
        let (store, _) = store_with_card();
        let ghost = VersionKey::new(crate::card::HypothesisId::new(), 1);
        let err = store
            .record_evidence(request(ghost, 1, Observation::Supports))
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownHypothesis(ghost));
    }

    #[test]
    fn revise_keeps_old_version_and_ledger() {
        let (store, key) = store_with_card();
        store
            .record_evidence(request(key, 3, Observation::Supports))
            .unwrap();

        let next = store
            .revise(
                key,
                "only cross-socket switches drive the tail",
                vec!["tail tied to NUMA distance".into()],
                vec!["no NUMA correlation".into()],
                Confidence::new(60).unwrap(),
                "narrowed after pinning result",
            )
            .unwrap();

        assert_eq!(next.id, key.id);
        assert_eq!(next.version, 2);
        assert_eq!(store.card(next).unwrap().confidence_history().len(), 1);
        // v1 untouched.
        assert_eq!(store.ledger(key).unwrap().len(), 1);
        assert_eq!(store.card(key).unwrap().current_confidence().value(), 89);
    }
}
