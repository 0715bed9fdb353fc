//! Domain models - areas, cleaning methods and the selection registry
//!
//! This module contains the canonical data types used throughout the system:
//! - `AreaId` / `Focus` - cleanable zones of the bus and the whole-bus pseudo-area
//! - `CleaningMethod` / `MethodSet` - techniques and their fixed durations
//! - `SelectionRegistry` - which methods are chosen for which area
//! - `Command` - user actions accepted by a cleaning session

pub mod command;
pub mod registry;
pub mod types;

// Re-export commonly used types at module level
pub use command::Command;
pub use registry::{Selection, SelectionRegistry};
pub use types::{AreaId, CleaningMethod, Focus, MethodSet};
