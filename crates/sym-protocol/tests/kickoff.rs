//! Protocol behavior as seen by an external caller: heuristic naming in
//! the wild, per-role message content, and the serialized wire shape

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use sym_protocol::{
    ComposedPrompt, OperatorCatalog, PromptLibrary, Role, RoleRoster, SessionConfig, Unassigned,
};

fn config() -> SessionConfig {
    let mut config = SessionConfig::new(
        "T-READ-1",
        "Why do checkpoint writes stall the read path?",
    );
    config.context = "Checkpoints run every five minutes.".into();
    config.excerpt = "Read p99 spikes for ~8s at each checkpoint boundary.".into();
    config
}

fn library() -> PromptLibrary {
    PromptLibrary::new(OperatorCatalog::builtin()).with_kernel("Kernel: argue from the excerpt.")
}

#[test]
fn realistic_agent_names_resolve_to_distinct_roles() {
    let recipients = vec![
        "theory-crafter-02".to_string(),
        "ExperimentRunner".to_string(),
        "Red.Team.Adversary".to_string(),
    ];
    let dispatched = Unassigned::new(config(), recipients, RoleRoster::Heuristic)
        .resolve_roles()
        .unwrap()
        .compose_prompts(&library())
        .dispatch();

    let roles: Vec<Role> = dispatched.prompts.iter().map(|p| p.message.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::HypothesisGenerator,
            Role::TestDesigner,
            Role::AdversarialCritic,
        ]
    );
}

#[test]
fn each_role_gets_its_own_instructions_and_footer_tag() {
    let mut map = IndexMap::new();
    map.insert("a".to_string(), Role::HypothesisGenerator);
    map.insert("b".to_string(), Role::TestDesigner);
    map.insert("c".to_string(), Role::AdversarialCritic);
    let dispatched = Unassigned::new(config(), vec!["a".into(), "b".into(), "c".into()],
        RoleRoster::Explicit(map))
        .resolve_roles()
        .unwrap()
        .compose_prompts(&library())
        .dispatch();

    let catalog = OperatorCatalog::builtin();
    for prompt in &dispatched.prompts {
        let body = &prompt.message.body;
        let role = prompt.message.role;
        assert!(body.contains(&format!("## Your role: {}", role.display_name())));
        assert!(body.contains(&format!("`[{}]`", role.reply_tag())));
        for key in role.default_operators() {
            let card = catalog.get(key).unwrap();
            assert!(body.contains(&card.render()));
        }
    }

    // Bodies differ across roles even for one shared configuration.
    let bodies: Vec<&str> = dispatched
        .prompts
        .iter()
        .map(|p| p.message.body.as_str())
        .collect();
    assert_ne!(bodies[0], bodies[1]);
    assert_ne!(bodies[1], bodies[2]);
}

#[test]
fn composed_prompt_round_trips_through_json() {
    let dispatched = Unassigned::new(config(), vec!["critic-bot".into()], RoleRoster::Heuristic)
        .resolve_roles()
        .unwrap()
        .compose_prompts(&library())
        .dispatch();
    let prompt = &dispatched.prompts[0];

    let wire = serde_json::to_string(prompt).unwrap();
    assert!(wire.contains("\"adversarial_critic\""));
    let back: ComposedPrompt = serde_json::from_str(&wire).unwrap();
    assert_eq!(&back, prompt);
}

#[test]
fn reruns_over_a_cloned_library_are_byte_identical() {
    let run = || {
        Unassigned::new(
            config(),
            vec!["gen".into(), "tester".into()],
            RoleRoster::Heuristic,
        )
        .resolve_roles()
        .unwrap()
        .compose_prompts(&library())
        .dispatch()
    };
    let a = run();
    let b = run();
    for (x, y) in a.prompts.iter().zip(&b.prompts) {
        assert_eq!(x.message.subject, y.message.subject);
        assert_eq!(x.message.body.as_bytes(), y.message.body.as_bytes());
    }
}
