//! Operator catalog: named reasoning moves
//!
//! Static reference data consumed, never mutated, by the protocol layer.
//! The built-in catalog is constructed once and passed around as an
//! explicit handle rather than living in a module-level singleton.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One named reasoning move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorCard {
    /// Stable lookup key
    pub key: String,
    /// Display name
    pub name: String,
    /// When to reach for this move
    pub trigger: String,
    /// How the move typically goes wrong
    pub failure_mode: String,
}

impl OperatorCard {
    /// Create a card
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        trigger: impl Into<String>,
        failure_mode: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            trigger: trigger.into(),
            failure_mode: failure_mode.into(),
        }
    }

    /// Fixed block form used in prompt bodies
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "### Operator: {}\nWhen: {}\nWatch for: {}",
            self.name, self.trigger, self.failure_mode
        )
    }
}

/// Lookup table of operator cards, keyed by their stable key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorCatalog {
    cards: IndexMap<String, OperatorCard>,
}

impl OperatorCatalog {
    /// Empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalog of reasoning moves
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for card in [
            OperatorCard::new(
                "crux",
                "Find the Crux",
                "two hypotheses explain the data equally well",
                "picking a crux neither side actually disputes",
            ),
            OperatorCard::new(
                "steelman",
                "Steelman",
                "a hypothesis is about to be dismissed cheaply",
                "restating the weak form with more words",
            ),
            OperatorCard::new(
                "mechanism_trace",
                "Mechanism Trace",
                "a correlation is offered without a causal path",
                "inventing plausible-sounding steps nobody can test",
            ),
            OperatorCard::new(
                "confound_sweep",
                "Confound Sweep",
                "an observed effect could have a common cause",
                "listing confounds without ranking their likelihood",
            ),
            OperatorCard::new(
                "severance_test",
                "Severance Test",
                "a mechanism can be interrupted and re-measured",
                "blocking more than the one proposed pathway",
            ),
            OperatorCard::new(
                "base_rate_check",
                "Base Rate Check",
                "a striking observation anchors the discussion",
                "comparing against an irrelevant reference class",
            ),
        ] {
            catalog.cards.insert(card.key.clone(), card);
        }
        catalog
    }

    /// Add or replace a card
    pub fn insert(&mut self, card: OperatorCard) {
        self.cards.insert(card.key.clone(), card);
    }

    /// Look up a card by key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OperatorCard> {
        self.cards.get(key)
    }

    /// Number of cards
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the catalog holds no cards
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
