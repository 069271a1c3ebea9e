//! Testing utilities for the Symposium workspace
//!
//! Shared fixtures: session configurations, rosters, prompt libraries,
//! and valid delta builders.

#![allow(missing_docs)]

use indexmap::IndexMap;
use serde_json::json;
use sym_confidence::{DiscriminativePower, Observation};
use sym_delta::{Delta, DeltaOp, Section};
use sym_hypothesis::{
    Citation, EvidenceRequest, HypothesisCard, SessionId, TestDescription, TestKind, VersionKey,
};
use sym_protocol::{OperatorCatalog, PromptLibrary, Role, RoleRoster, SessionConfig};

pub fn test_session_config() -> SessionConfig {
    let mut config = SessionConfig::new(
        "T-TEST",
        "Why does the nightly batch slow down at month end?",
    );
    config.context = "The batch reads the ledger table, which grows all month.".into();
    config.excerpt = "Runtime grows from 40 to 220 minutes across the month.".into();
    config
}

pub fn test_recipients() -> Vec<String> {
    vec![
        "hypothesis-bot".to_string(),
        "test-bot".to_string(),
        "critic-bot".to_string(),
    ]
}

pub fn explicit_roster() -> RoleRoster {
    let mut map = IndexMap::new();
    map.insert("hypothesis-bot".to_string(), Role::HypothesisGenerator);
    map.insert("test-bot".to_string(), Role::TestDesigner);
    map.insert("critic-bot".to_string(), Role::AdversarialCritic);
    RoleRoster::Explicit(map)
}

pub fn rich_library() -> PromptLibrary {
    PromptLibrary::new(OperatorCatalog::builtin())
        .with_kernel("Shared kernel: work only from the material below.")
}

pub fn bare_library() -> PromptLibrary {
    PromptLibrary::new(OperatorCatalog::new())
}

pub fn slate_delta(sequence: u64, id: &str, statement: &str) -> Delta {
    Delta::new(
        "hypothesis_generator",
        Section::HypothesisSlate,
        DeltaOp::Add,
        json!({
            "id": id,
            "statement": statement,
            "predictions_if_true": [format!("{id} prediction if true")],
            "predictions_if_false": [format!("{id} prediction if false")],
        }),
        sequence,
    )
}

pub fn test_catalog_delta(sequence: u64, id: &str, power: u8, targets: &[&str]) -> Delta {
    Delta::new(
        "test_designer",
        Section::DiscriminativeTests,
        DeltaOp::Add,
        json!({
            "id": id,
            "description": format!("discriminative test {id}"),
            "kind": "mechanism_block",
            "power": power,
            "targets": targets,
        }),
        sequence,
    )
}

pub fn critique_delta(sequence: u64, id: &str, target: &str) -> Delta {
    Delta::new(
        "adversarial_critic",
        Section::AdversarialCritique,
        DeltaOp::Add,
        json!({
            "id": id,
            "target": target,
            "critique": format!("{target} does not exclude a shared cause"),
            "severity": "medium",
        }),
        sequence,
    )
}

pub fn test_hypothesis_card() -> HypothesisCard {
    HypothesisCard::propose(
        "table growth drives the slowdown",
        "full scans over an unpruned ledger",
        vec!["runtime tracks row count".into()],
        vec!["runtime flat against row count".into()],
    )
}

pub fn evidence_request(
    hypothesis: VersionKey,
    power: u8,
    result: Observation,
) -> EvidenceRequest {
    EvidenceRequest {
        session: SessionId::new(),
        hypothesis,
        test: TestDescription::new(
            "prune the ledger and re-run",
            TestKind::MechanismBlock,
            DiscriminativePower::new(power).unwrap(),
        ),
        prediction_if_true: "runtime drops to baseline".into(),
        prediction_if_false: "runtime unchanged".into(),
        result,
        observation: "runtime fell to 45 minutes".into(),
        citation: Some(Citation::at_section("run log", 2)),
        interpretation: "consistent with scan cost".into(),
        recorded_by: "facilitator".into(),
        expected_prior: None,
    }
}
