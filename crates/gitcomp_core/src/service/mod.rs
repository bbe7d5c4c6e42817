//! Use-case services behind each CLI verb.
//!
//! # Responsibility
//! - Run load → mutate → persist for each command against one config path.
//! - Own the compensating rollback of `init`.
//!
//! # Invariants
//! - The configuration path is fixed at construction; nothing re-resolves it.
//! - Every mutation is persisted explicitly before the call returns `Ok`.

pub mod comp_service;

pub use comp_service::{CompService, InitReport, RenderRequest, ServiceError, ServiceResult};
