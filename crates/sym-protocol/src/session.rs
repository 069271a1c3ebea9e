//! Session phase machine: `Unassigned → RolesResolved → PromptsComposed →
//! Dispatched`
//!
//! Phases advance by consuming the previous state, so a phase cannot be
//! skipped or repeated. Delivery of the dispatched messages belongs to an
//! external collaborator.

use crate::prompt::{compose, ComposedPrompt, PromptLibrary, SessionConfig};
use crate::role::{Role, RoleRoster, RosterError};
use indexmap::IndexMap;
use tracing::info;

/// A configured session before roles are resolved
#[derive(Debug, Clone)]
pub struct Unassigned {
    config: SessionConfig,
    recipients: Vec<String>,
    roster: RoleRoster,
}

impl Unassigned {
    /// Begin the protocol for a set of recipients
    #[must_use]
    pub fn new(config: SessionConfig, recipients: Vec<String>, roster: RoleRoster) -> Self {
        Self {
            config,
            recipients,
            roster,
        }
    }

    /// Resolve every recipient to exactly one role
    ///
    /// # Errors
    /// [`RosterError`] if an explicit roster omits a recipient.
    pub fn resolve_roles(self) -> Result<RolesResolved, RosterError> {
        let assignments = self.roster.resolve(&self.recipients)?;
        info!(
            thread = %self.config.thread_id,
            recipients = assignments.len(),
            "roles resolved"
        );
        Ok(RolesResolved {
            config: self.config,
            assignments,
        })
    }
}

/// Roles fixed for the session's lifetime
#[derive(Debug, Clone)]
pub struct RolesResolved {
    config: SessionConfig,
    assignments: IndexMap<String, Role>,
}

impl RolesResolved {
    /// The immutable assignment map, in recipient order
    #[inline]
    #[must_use]
    pub fn assignments(&self) -> &IndexMap<String, Role> {
        &self.assignments
    }

    /// Compose one deterministic prompt per recipient
    #[must_use]
    pub fn compose_prompts(self, library: &PromptLibrary) -> PromptsComposed {
        let prompts: Vec<ComposedPrompt> = self
            .assignments
            .iter()
            .map(|(recipient, role)| compose(&self.config, library, recipient, *role))
            .collect();
        let degraded = prompts.iter().filter(|p| !p.is_rich()).count();
        info!(
            thread = %self.config.thread_id,
            prompts = prompts.len(),
            degraded,
            "prompts composed"
        );
        PromptsComposed { prompts }
    }
}

/// Messages assembled, awaiting dispatch
#[derive(Debug, Clone)]
pub struct PromptsComposed {
    prompts: Vec<ComposedPrompt>,
}

impl PromptsComposed {
    /// The composed prompts, in recipient order
    #[inline]
    #[must_use]
    pub fn prompts(&self) -> &[ComposedPrompt] {
        &self.prompts
    }

    /// Hand the messages to the caller for delivery
    #[must_use]
    pub fn dispatch(self) -> Dispatched {
        Dispatched {
            prompts: self.prompts,
        }
    }
}

/// Terminal phase: one message per recipient, returned to the caller
#[derive(Debug, Clone)]
pub struct Dispatched {
    /// The messages and their fallback records
    pub prompts: Vec<ComposedPrompt>,
}
