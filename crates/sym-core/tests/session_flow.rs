//! End-to-end session flow: kickoff, delta ingestion, artifact
//! compilation, slate promotion, and causally chained evidence recording

use pretty_assertions::assert_eq;
use serde_json::json;
use sym_confidence::Observation;
use sym_core::{Session, SessionError};
use sym_delta::{Delta, DeltaOp, Section};
use sym_protocol::Role;
use sym_test_utils::{
    critique_delta, evidence_request, explicit_roster, rich_library, slate_delta,
    test_catalog_delta, test_recipients, test_session_config,
};

fn kicked_off_session() -> Session {
    let mut session = Session::new(
        test_session_config(),
        test_recipients(),
        explicit_roster(),
        rich_library(),
    );
    session.kickoff().unwrap();
    session
}

#[test]
fn kickoff_totality_under_explicit_roster() {
    let mut session = Session::new(
        test_session_config(),
        test_recipients(),
        explicit_roster(),
        rich_library(),
    );
    let prompts = session.kickoff().unwrap();

    assert_eq!(prompts.len(), test_recipients().len());
    let roles: Vec<Role> = prompts.iter().map(|p| p.message.role).collect();
    assert_eq!(roles, Role::ALL.to_vec());
    for prompt in &prompts {
        assert!(prompt.is_rich());
        assert!(prompt.message.ack_required);
        assert!(prompt.message.subject.starts_with("[T-TEST] "));
    }
}

#[test]
fn deltas_from_all_roles_merge_into_artifacts() {
    let mut session = kicked_off_session();
    session.ingest_delta(slate_delta(1, "H1", "table growth")).unwrap();
    session.ingest_delta(slate_delta(2, "H2", "lock contention")).unwrap();
    session
        .ingest_delta(test_catalog_delta(3, "T1", 4, &["H1", "H2"]))
        .unwrap();
    session.ingest_delta(critique_delta(4, "C1", "H2")).unwrap();

    let slate = session.artifact(Section::HypothesisSlate).unwrap();
    assert_eq!(slate.entries().len(), 2);
    let tests = session.artifact(Section::DiscriminativeTests).unwrap();
    assert_eq!(tests.entries().len(), 1);
    let critiques = session.artifact(Section::AdversarialCritique).unwrap();
    assert_eq!(critiques.entries().len(), 1);

    // Recompilation is deterministic.
    let again = session.artifact(Section::HypothesisSlate).unwrap();
    assert_eq!(slate.hash(), again.hash());
    assert_eq!(slate, again);
}

#[test]
fn update_of_unknown_slate_key_fails_and_changes_nothing() {
    let mut session = kicked_off_session();
    session.ingest_delta(slate_delta(1, "H1", "table growth")).unwrap();

    // Schema-valid, so ingestion accepts it; compilation rejects it.
    let orphan_update = Delta::new(
        "hypothesis_generator",
        Section::HypothesisSlate,
        DeltaOp::Update,
        json!({ "id": "H9", "statement": "never added" }),
        2,
    );
    session.ingest_delta(orphan_update).unwrap();

    let err = session.artifact(Section::HypothesisSlate).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Compile(sym_delta::CompileError::UnknownTarget { ref key, .. })
        if key == "H9"
    ));
}

#[test]
fn evidence_chain_is_causal_and_history_grows_by_seed_plus_entries() {
    let session = kicked_off_session();
    let key = session.propose_hypothesis(sym_test_utils::test_hypothesis_card());

    let runs = [
        (3, Observation::Supports),
        (1, Observation::Challenges),
        (2, Observation::Supports),
    ];
    for (power, result) in runs {
        session
            .record_evidence(evidence_request(key, power, result))
            .unwrap();
    }

    let card = session.store().card(key).unwrap();
    let history: Vec<u8> = card
        .confidence_history()
        .iter()
        .map(|r| r.confidence.value())
        .collect();
    // Seed + 3 entries, in order, under the locked constants.
    assert_eq!(history, vec![50, 89, 74, 92]);

    let ledger = session.store().ledger(key).unwrap();
    assert_eq!(ledger.len(), 3);
    assert_eq!(ledger[0].confidence_before.value(), 50);
    for pair in ledger.windows(2) {
        assert_eq!(pair[1].confidence_before, pair[0].confidence_after);
    }
    for entry in &ledger {
        assert_eq!(entry.session, session.id());
    }
}

#[test]
fn promoted_slate_entry_feeds_the_next_round() {
    let mut session = kicked_off_session();
    session
        .ingest_delta(Delta::new(
            "hypothesis_generator",
            Section::HypothesisSlate,
            DeltaOp::Add,
            json!({
                "id": "H1",
                "statement": "index bloat drives the slowdown",
                "mechanism": "page splits",
                "predictions_if_true": ["reindex restores runtime"],
                "predictions_if_false": ["reindex changes nothing"],
            }),
            1,
        ))
        .unwrap();

    let key = session.promote_slate_entry("H1").unwrap();
    let entry = session
        .record_evidence(evidence_request(key, 5, Observation::Challenges))
        .unwrap();

    assert_eq!(entry.confidence_before.value(), 50);
    assert_eq!(entry.confidence_after.value(), 1);
    let card = session.store().card(key).unwrap();
    assert_eq!(card.current_confidence().value(), 1);
}

#[test]
fn two_sessions_compiling_the_same_thread_agree() {
    let deltas = vec![
        slate_delta(1, "H1", "a"),
        slate_delta(2, "H2", "b"),
        test_catalog_delta(3, "T1", 3, &["H1"]),
    ];

    let compile = || {
        let mut session = kicked_off_session();
        for delta in &deltas {
            session.ingest_delta(delta.clone()).unwrap();
        }
        (
            session.artifact(Section::HypothesisSlate).unwrap(),
            session.artifact(Section::DiscriminativeTests).unwrap(),
        )
    };

    let (slate_a, tests_a) = compile();
    let (slate_b, tests_b) = compile();
    assert_eq!(slate_a.hash(), slate_b.hash());
    assert_eq!(tests_a.hash(), tests_b.hash());
}
