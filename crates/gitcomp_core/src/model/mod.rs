//! Domain model for collaborators recorded in the configuration.
//!
//! # Responsibility
//! - Define the `Author` record and the uniqueness-constrained registry.
//!
//! # Invariants
//! - Authors are immutable once added; there is no update or remove path.
//! - `AuthorRegistry::add` is the only way to grow a registry in memory.

pub mod author;
