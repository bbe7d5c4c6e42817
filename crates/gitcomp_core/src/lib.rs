//! Core logic for git-comp, a git plugin that composes commit messages.
//! This crate is the single source of truth for configuration invariants.

pub mod config;
pub mod hook;
pub mod identity;
pub mod logging;
pub mod model;
pub mod render;
pub mod service;

#[cfg(all(test, unix))]
mod test_support;

pub use config::{
    load_or_initialize, read_config, resolve_config_path, ConfigError, ConfigKey, ConfigResult,
    Configuration, LoadOutcome, UnknownKeyError, CONFIG_FILE_NAME, DEFAULT_TEMPLATE,
};
pub use hook::{HookError, HookGuard, HOOK_FILE_NAME};
pub use identity::{
    GitIdentityProvider, Identity, IdentityError, IdentityProvider, StaticIdentityProvider,
};
pub use logging::{default_log_level, init_logging, logging_status, LogDestination};
pub use model::author::{Author, AuthorRegistry, DuplicateError, DuplicateField, SELF_AUTHOR_ID};
pub use render::{render, RenderContext, Strictness, TemplateError, TEMPLATE_FIELDS};
pub use service::{CompService, InitReport, RenderRequest, ServiceError, ServiceResult};

/// Returns the core crate version, recorded in newly created configurations.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
