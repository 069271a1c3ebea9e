//! Roles and roster resolution
//!
//! Each participant is assigned exactly one role from a closed three-role
//! set, resolved once per session and immutable thereafter. An explicit
//! roster is authoritative; otherwise deterministic name heuristics apply,
//! falling back to the default role.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The closed set of session roles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Proposes and refines hypotheses
    #[default]
    HypothesisGenerator,
    /// Designs tests that can tell the hypotheses apart
    TestDesigner,
    /// Attacks the slate: confounds, alternatives, weak predictions
    AdversarialCritic,
}

impl Role {
    /// All roles, in canonical order
    pub const ALL: [Role; 3] = [
        Role::HypothesisGenerator,
        Role::TestDesigner,
        Role::AdversarialCritic,
    ];

    /// Stable wire name
    #[inline]
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Role::HypothesisGenerator => "hypothesis_generator",
            Role::TestDesigner => "test_designer",
            Role::AdversarialCritic => "adversarial_critic",
        }
    }

    /// Human display name
    #[inline]
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Role::HypothesisGenerator => "Hypothesis Generator",
            Role::TestDesigner => "Test Designer",
            Role::AdversarialCritic => "Adversarial Critic",
        }
    }

    /// Short code expected in reply subjects, for downstream routing
    #[inline]
    #[must_use]
    pub fn reply_tag(self) -> &'static str {
        match self {
            Role::HypothesisGenerator => "HYP",
            Role::TestDesigner => "TEST",
            Role::AdversarialCritic => "CRIT",
        }
    }

    /// Built-in role instructions
    #[must_use]
    pub fn default_instructions(self) -> &'static str {
        match self {
            Role::HypothesisGenerator => {
                "Propose candidate hypotheses as slate entries. Every entry \
                 must state a mechanism and predictions both ways: what we \
                 should see if it is true, and what we should see if it is \
                 false. Prefer fewer, sharper hypotheses over many vague ones."
            }
            Role::TestDesigner => {
                "Design discriminative tests as catalog entries. Rate each \
                 test's discriminative power honestly on the 1-5 scale and \
                 name the slate entries it can tell apart. A test that every \
                 hypothesis survives is not worth running."
            }
            Role::AdversarialCritic => {
                "Attack the slate. File critique entries against the weakest \
                 link of each hypothesis, register assumptions the others are \
                 treating as free, and log anomalies that fit nothing. Your \
                 job is exclusion, not consensus."
            }
        }
    }

    /// Operator keys selected for this role by default
    #[must_use]
    pub fn default_operators(self) -> &'static [&'static str] {
        match self {
            Role::HypothesisGenerator => &["crux", "mechanism_trace", "steelman"],
            Role::TestDesigner => &["severance_test", "crux", "base_rate_check"],
            Role::AdversarialCritic => &["confound_sweep", "steelman", "base_rate_check"],
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Errors from roster resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// An explicit roster was supplied but does not cover a recipient
    #[error("recipient `{recipient}` missing from explicit roster")]
    MissingRecipient {
        /// The uncovered recipient
        recipient: String,
    },
}

/// How the session maps participants to roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleRoster {
    /// Authoritative map; every recipient must appear in it
    Explicit(IndexMap<String, Role>),
    /// Deterministic name-matching heuristics with a default fallback
    Heuristic,
}

impl RoleRoster {
    /// Resolve every recipient to exactly one role
    ///
    /// Resolution happens once per session; the returned map preserves
    /// recipient order and is immutable for the session's lifetime.
    ///
    /// # Errors
    /// [`RosterError::MissingRecipient`] if an explicit roster omits a
    /// recipient.
    pub fn resolve(&self, recipients: &[String]) -> Result<IndexMap<String, Role>, RosterError> {
        let mut assignments = IndexMap::with_capacity(recipients.len());
        for recipient in recipients {
            let role = match self {
                RoleRoster::Explicit(map) => {
                    *map.get(recipient)
                        .ok_or_else(|| RosterError::MissingRecipient {
                            recipient: recipient.clone(),
                        })?
                }
                RoleRoster::Heuristic => {
                    let role = heuristic_role(recipient);
                    debug!(recipient, role = %role, "role resolved heuristically");
                    role
                }
            };
            assignments.insert(recipient.clone(), role);
        }
        Ok(assignments)
    }
}

/// Case-insensitive exact match, then substring match, then default
fn heuristic_role(recipient: &str) -> Role {
    let lowered = recipient.to_lowercase();
    for role in Role::ALL {
        if lowered == role.wire_name() || lowered == role.display_name().to_lowercase() {
            return role;
        }
    }
    const SUBSTRINGS: [(&str, Role); 8] = [
        ("hypoth", Role::HypothesisGenerator),
        ("generat", Role::HypothesisGenerator),
        ("theor", Role::HypothesisGenerator),
        ("test", Role::TestDesigner),
        ("design", Role::TestDesigner),
        ("experiment", Role::TestDesigner),
        ("crit", Role::AdversarialCritic),
        ("adversar", Role::AdversarialCritic),
    ];
    for (needle, role) in SUBSTRINGS {
        if lowered.contains(needle) {
            return role;
        }
    }
    Role::default()
}
