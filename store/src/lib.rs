//! # Program store
//!
//! Document model and store adapters for Wayfare's program collection.
//!
//! The collection itself is an external collaborator: everything above this
//! crate sees only the [`ProgramStore`] trait. Two adapters are provided:
//! [`JsonProgramStore`] persists the collection as a single JSON document on
//! disk, and [`MemoryProgramStore`] keeps it in memory for tests and
//! composition.
//!
//! Records are validated at this boundary so malformed documents never reach
//! the similarity math.

pub mod error;
pub mod memory;
pub mod program;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryProgramStore;
pub use program::{NewProgram, Program};
pub use store::{JsonProgramStore, ProgramStore};
