//! Services - session lifecycle and state management
//!
//! This module contains the core business logic services:
//! - `countdown` - selecting → cleaning → complete lifecycle
//! - `outcome` - "found items" report generated on completion
//! - `session` - single-writer container applying commands
//! - `runner` - async loop owning the session and its countdown timer

pub mod countdown;
pub mod outcome;
pub mod runner;
pub mod session;

// Re-export commonly used types
pub use countdown::{CountdownController, Phase, TickOutcome};
pub use outcome::OutcomeGenerator;
pub use runner::{create_session_runner, SessionRunner};
pub use session::{CleaningSession, SessionSnapshot};
