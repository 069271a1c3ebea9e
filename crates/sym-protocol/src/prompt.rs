//! Deterministic prompt assembly
//!
//! Composition is a pure function of the session configuration: identical
//! configuration yields byte-identical messages. Missing shared resources
//! (kernel text, operator cards) degrade to role-default text; every
//! fallback taken is recorded on the composed prompt and logged.

use crate::operators::OperatorCatalog;
use crate::role::Role;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Subject lines carry at most this many characters of the question
pub const SUBJECT_QUESTION_LIMIT: usize = 48;

/// Shared prompt resources, loaded once and passed by handle
///
/// Replaces sentinel-delimited text scraping with a structured lookup:
/// the kernel and per-role instruction overrides are explicit fields with
/// explicit "missing" states.
#[derive(Debug, Clone, Default)]
pub struct PromptLibrary {
    kernel: Option<String>,
    instructions: HashMap<Role, String>,
    catalog: OperatorCatalog,
}

impl PromptLibrary {
    /// Library with no kernel and no overrides; composition will take the
    /// role-default path for everything
    #[inline]
    #[must_use]
    pub fn new(catalog: OperatorCatalog) -> Self {
        Self {
            kernel: None,
            instructions: HashMap::new(),
            catalog,
        }
    }

    /// Set the shared kernel text
    #[inline]
    #[must_use]
    pub fn with_kernel(mut self, kernel: impl Into<String>) -> Self {
        self.kernel = Some(kernel.into());
        self
    }

    /// Override the instruction block for one role
    #[inline]
    #[must_use]
    pub fn with_instructions(mut self, role: Role, text: impl Into<String>) -> Self {
        self.instructions.insert(role, text.into());
        self
    }

    /// The shared kernel, if loaded
    #[inline]
    #[must_use]
    pub fn kernel(&self) -> Option<&str> {
        self.kernel.as_deref()
    }

    /// Instruction text for a role: the override if present, else the
    /// role's built-in block
    #[inline]
    #[must_use]
    pub fn instructions(&self, role: Role) -> &str {
        self.instructions
            .get(&role)
            .map_or_else(|| role.default_instructions(), String::as_str)
    }

    /// The operator catalog
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &OperatorCatalog {
        &self.catalog
    }
}

/// Immutable description of one session round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Thread identifier encoded into every subject line
    pub thread_id: String,
    /// The question under investigation
    pub research_question: String,
    /// Background the agents need
    pub context: String,
    /// Source excerpt under discussion
    pub excerpt: String,
    /// Optional carried-over memory block
    pub memory: Option<String>,
    /// Optional constraints block
    pub constraints: Option<String>,
    /// Optional seed hypotheses block
    pub seed_hypotheses: Option<String>,
    /// Per-role operator key selection; roles absent here use their
    /// built-in defaults
    pub operator_selection: IndexMap<Role, Vec<String>>,
}

impl SessionConfig {
    /// Minimal config for a thread and question
    #[must_use]
    pub fn new(thread_id: impl Into<String>, research_question: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            research_question: research_question.into(),
            context: String::new(),
            excerpt: String::new(),
            memory: None,
            constraints: None,
            seed_hypotheses: None,
            operator_selection: IndexMap::new(),
        }
    }

    /// Operator keys selected for a role
    #[must_use]
    pub fn operators_for(&self, role: Role) -> Vec<String> {
        self.operator_selection.get(&role).map_or_else(
            || {
                role.default_operators()
                    .iter()
                    .map(|s| (*s).to_string())
                    .collect()
            },
            Clone::clone,
        )
    }
}

/// A resource that was missing at composition time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fallback {
    /// No kernel text loaded; the built-in framing was used
    MissingKernel,
    /// A selected operator card was absent from the catalog
    MissingOperator {
        /// The key that failed to resolve
        key: String,
    },
}

/// One outbound kickoff message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickoffMessage {
    /// Recipient identity
    pub to: String,
    /// Deterministic subject: thread id plus truncated question
    pub subject: String,
    /// Assembled body
    pub body: String,
    /// Always true; the protocol expects an acknowledgement
    pub ack_required: bool,
    /// Role assigned to the recipient
    pub role: Role,
}

/// A kickoff message plus the fallbacks taken while composing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedPrompt {
    /// The message to deliver
    pub message: KickoffMessage,
    /// Which degraded-resource paths were taken, in body order
    pub fallbacks: Vec<Fallback>,
}

impl ComposedPrompt {
    /// Whether the rich path was taken throughout
    #[inline]
    #[must_use]
    pub fn is_rich(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// Kernel framing used when no kernel text is loaded
const DEFAULT_KERNEL: &str = "You are one of several independent reasoning agents refining a \
     hypothesis under test. Work only from the material below, cite the \
     excerpt when you rely on it, and send structured updates rather than \
     prose conclusions.";

/// Deterministic subject line for a thread and question
#[must_use]
pub fn subject_line(thread_id: &str, research_question: &str) -> String {
    let mut question: String = research_question
        .chars()
        .take(SUBJECT_QUESTION_LIMIT)
        .collect();
    if research_question.chars().count() > SUBJECT_QUESTION_LIMIT {
        question.push('…');
    }
    format!("[{thread_id}] {question}")
}

/// Compose the kickoff message for one recipient
///
/// Body blocks are concatenated in fixed order: kernel, role
/// instructions, operator cards, research question, context, excerpt,
/// optional memory/constraints/seed blocks, response-format footer.
#[must_use]
pub fn compose(
    config: &SessionConfig,
    library: &PromptLibrary,
    recipient: &str,
    role: Role,
) -> ComposedPrompt {
    let mut fallbacks = Vec::new();
    let mut blocks: Vec<String> = Vec::new();

    match library.kernel() {
        Some(kernel) => blocks.push(kernel.to_string()),
        None => {
            warn!(recipient, "kernel text missing, using built-in framing");
            fallbacks.push(Fallback::MissingKernel);
            blocks.push(DEFAULT_KERNEL.to_string());
        }
    }

    blocks.push(format!(
        "## Your role: {}\n{}",
        role.display_name(),
        library.instructions(role)
    ));

    for key in config.operators_for(role) {
        match library.catalog().get(&key) {
            Some(card) => blocks.push(card.render()),
            None => {
                warn!(recipient, key, "operator card missing, skipped");
                fallbacks.push(Fallback::MissingOperator { key });
            }
        }
    }

    blocks.push(format!(
        "## Research question\n{}",
        config.research_question
    ));
    blocks.push(format!("## Context\n{}", config.context));
    blocks.push(format!("## Excerpt\n{}", config.excerpt));

    if let Some(memory) = &config.memory {
        blocks.push(format!("## Memory\n{memory}"));
    }
    if let Some(constraints) = &config.constraints {
        blocks.push(format!("## Constraints\n{constraints}"));
    }
    if let Some(seeds) = &config.seed_hypotheses {
        blocks.push(format!("## Seed hypotheses\n{seeds}"));
    }

    blocks.push(format!(
        "## Response format\nReply in this thread with `[{}]` in your \
         subject line, carrying your updates as structured deltas.",
        role.reply_tag()
    ));

    ComposedPrompt {
        message: KickoffMessage {
            to: recipient.to_string(),
            subject: subject_line(&config.thread_id, &config.research_question),
            body: blocks.join("\n\n"),
            ack_required: true,
            role,
        },
        fallbacks,
    }
}
