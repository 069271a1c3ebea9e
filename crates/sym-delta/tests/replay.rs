//! Replay properties: determinism, idempotent recompilation, and the
//! monotonic prefix law

use proptest::prelude::*;
use serde_json::json;
use sym_delta::{Artifact, Delta, DeltaCompiler, DeltaOp, Section};

/// Build a valid assumption-ledger delta stream from an op script.
///
/// Keys are drawn from a small pool so Add/Update/Remove interact; the
/// script is repaired so every operation is legal at its position (Add
/// only when absent, Update only when present).
fn legal_stream(script: Vec<(u8, u8)>) -> Vec<Delta> {
    let mut live: Vec<String> = Vec::new();
    let mut deltas = Vec::new();
    let mut sequence = 0_u64;

    for (which, key_idx) in script {
        let key = format!("A{}", key_idx % 6);
        let present = live.contains(&key);
        let op = match which % 3 {
            0 if !present => DeltaOp::Add,
            0 => DeltaOp::Update,
            1 if present => DeltaOp::Update,
            1 => DeltaOp::Add,
            _ => DeltaOp::Remove,
        };
        match op {
            DeltaOp::Add => live.push(key.clone()),
            DeltaOp::Remove => live.retain(|k| k != &key),
            DeltaOp::Update => {}
        }
        sequence += 1;
        deltas.push(Delta::new(
            "adversarial_critic",
            Section::AssumptionLedger,
            op,
            json!({
                "id": key,
                "assumption": format!("assumption {} at step {}", key, sequence),
                "load_bearing": which % 2 == 0,
            }),
            sequence,
        ));
    }
    deltas
}

proptest! {
    /// Compiling the same ordered list twice yields identical artifacts.
    #[test]
    fn compilation_is_deterministic(script in proptest::collection::vec((0u8..6, 0u8..12), 0..40)) {
        let deltas = legal_stream(script);
        let compiler = DeltaCompiler::new();
        let first = compiler.compile(Section::AssumptionLedger, &deltas).unwrap();
        let second = compiler.compile(Section::AssumptionLedger, &deltas).unwrap();
        prop_assert_eq!(first.hash(), second.hash());
        prop_assert_eq!(first, second);
    }

    /// A saved-and-replayed copy of the thread compiles to the same
    /// artifact as the original.
    #[test]
    fn replay_from_wire_matches(script in proptest::collection::vec((0u8..6, 0u8..12), 0..40)) {
        let deltas = legal_stream(script);
        let compiler = DeltaCompiler::new();
        let direct = compiler.compile(Section::AssumptionLedger, &deltas).unwrap();

        let wire = serde_json::to_string(&deltas).unwrap();
        let replayed: Vec<Delta> = serde_json::from_str(&wire).unwrap();
        let from_replay = compiler.compile(Section::AssumptionLedger, &replayed).unwrap();

        prop_assert_eq!(direct.hash(), from_replay.hash());
        prop_assert!(from_replay.verify());
    }

    /// Compiling a prefix then applying the suffix equals compiling the
    /// whole list.
    #[test]
    fn prefix_then_suffix_equals_whole(
        script in proptest::collection::vec((0u8..6, 0u8..12), 1..40),
        split in 0usize..40,
    ) {
        let deltas = legal_stream(script);
        let split = split.min(deltas.len());
        let compiler = DeltaCompiler::new();

        let whole = compiler.compile(Section::AssumptionLedger, &deltas).unwrap();

        let mut incremental = compiler
            .compile(Section::AssumptionLedger, &deltas[..split])
            .unwrap();
        for delta in &deltas[split..] {
            compiler.apply(&mut incremental, delta).unwrap();
        }

        prop_assert_eq!(whole.hash(), incremental.hash());
        prop_assert_eq!(whole, incremental);
    }

    /// A failed delta leaves the artifact exactly as it was.
    #[test]
    fn failure_leaves_state_untouched(script in proptest::collection::vec((0u8..6, 0u8..12), 0..20)) {
        let deltas = legal_stream(script);
        let compiler = DeltaCompiler::new();
        let mut artifact = compiler.compile(Section::AssumptionLedger, &deltas).unwrap();
        let snapshot = artifact.clone();

        let bogus = Delta::new(
            "adversarial_critic",
            Section::AssumptionLedger,
            DeltaOp::Update,
            json!({ "id": "never-added", "assumption": "ghost" }),
            9_999,
        );
        prop_assert!(compiler.apply(&mut artifact, &bogus).is_err());
        prop_assert_eq!(artifact, snapshot);
    }
}

#[test]
fn empty_thread_compiles_to_empty_artifact() {
    let compiler = DeltaCompiler::new();
    let artifact = compiler.compile(Section::HypothesisSlate, &[]).unwrap();
    assert_eq!(artifact.version(), 0);
    assert!(artifact.entries().is_empty());
    assert_eq!(artifact, Artifact::empty(Section::HypothesisSlate));
}
