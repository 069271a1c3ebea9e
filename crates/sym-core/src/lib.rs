//! Symposium session core
//!
//! Ties the three subsystems into one loop: the role protocol kicks off a
//! round with one deterministic message per agent; agents reply with
//! structured deltas that merge into canonical artifacts; a recorded
//! observation against a promoted hypothesis runs the confidence update
//! engine and extends the evidence ledger, closing the loop for the next
//! round.
//!
//! # Example
//!
//! ```
//! use sym_core::Session;
//! use sym_protocol::{OperatorCatalog, PromptLibrary, RoleRoster, SessionConfig};
//!
//! let config = SessionConfig::new("T-1", "Does caching explain the tail?");
//! let library = PromptLibrary::new(OperatorCatalog::builtin());
//! let mut session = Session::new(
//!     config,
//!     vec!["hypothesis-bot".into(), "test-bot".into(), "critic-bot".into()],
//!     RoleRoster::Heuristic,
//!     library,
//! );
//! let prompts = session.kickoff()?;
//! assert_eq!(prompts.len(), 3);
//! # Ok::<(), sym_core::SessionError>(())
//! ```

pub mod error;
pub mod session;

pub use error::SessionError;
pub use session::Session;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
