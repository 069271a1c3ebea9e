//! Session role protocol
//!
//! The deterministic external contract of a session round: assign each
//! participant a fixed role from a closed three-role set, resolve a shared
//! prompt kernel plus role-specific instructions and selected operator
//! cards, and emit one byte-deterministic kickoff message per participant.
//!
//! The protocol never delivers messages; delivery is an external
//! collaborator. Missing shared resources degrade to role-default text and
//! every fallback taken is observable on the composed prompt.

pub mod operators;
pub mod prompt;
pub mod role;
pub mod session;

pub use operators::{OperatorCard, OperatorCatalog};
pub use prompt::{
    compose, subject_line, ComposedPrompt, Fallback, KickoffMessage, PromptLibrary, SessionConfig,
    SUBJECT_QUESTION_LIMIT,
};
pub use role::{Role, RoleRoster, RosterError};
pub use session::{Dispatched, PromptsComposed, RolesResolved, Unassigned};
