//! Command use-case service.
//!
//! # Responsibility
//! - Provide one entry point per verb: init, author add/list, config
//!   display/set, render.
//! - Keep argument parsing and output sinks out of core.
//!
//! # Invariants
//! - `init` removes the configuration file on hook failure only when this
//!   same call created it.
//! - Rejected mutations are never written.

use crate::config::store::remove_config_file;
use crate::config::{load_or_initialize, ConfigError, ConfigKey, LoadOutcome, UnknownKeyError};
use crate::hook::{HookError, HookGuard};
use crate::identity::IdentityProvider;
use crate::model::author::{Author, AuthorRegistry, DuplicateError};
use crate::render::{render, RenderContext, Strictness, TemplateError};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Duplicate(#[from] DuplicateError),
    #[error(transparent)]
    UnknownKey(#[from] UnknownKeyError),
    #[error(transparent)]
    Hook(#[from] HookError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("unknown author `{0}`; register it with `author add` first")]
    UnknownAuthor(String),
}

/// Outcome of a successful `init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub config_path: PathBuf,
    pub hook_path: PathBuf,
    /// `true` when `init` created the configuration file.
    pub config_created: bool,
}

/// Input for [`CompService::render`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderRequest {
    /// Field values; `co_authors` is replaced by the resolved selectors.
    pub context: RenderContext,
    /// Author ids or emails, resolved against the registry in order.
    pub co_authors: Vec<String>,
    pub strictness: Strictness,
}

/// Use-case service bound to one configuration path.
pub struct CompService<I: IdentityProvider> {
    config_path: PathBuf,
    identity: I,
}

impl<I: IdentityProvider> CompService<I> {
    pub fn new(config_path: impl Into<PathBuf>, identity: I) -> Self {
        Self {
            config_path: config_path.into(),
            identity,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads or creates the configuration, then installs the commit hook.
    ///
    /// # Side effects
    /// - May create the configuration file and the hook script.
    /// - On hook failure, deletes the configuration file if it was created here.
    pub fn init(&self, repo_root: impl AsRef<Path>) -> ServiceResult<InitReport> {
        self.init_with_guard(HookGuard::for_repository(repo_root))
    }

    /// [`CompService::init`] against an already located hooks directory.
    pub fn init_with_guard(&self, guard: HookGuard) -> ServiceResult<InitReport> {
        let outcome = self.load()?;

        if let Err(err) = guard.install(&outcome.config) {
            if outcome.freshly_created {
                self.roll_back_fresh_config();
            }
            return Err(err.into());
        }

        info!(
            "event=init module=service status=ok config_created={} hook={}",
            outcome.freshly_created,
            guard.hook_path().display()
        );
        Ok(InitReport {
            config_path: self.config_path.clone(),
            hook_path: guard.hook_path().to_path_buf(),
            config_created: outcome.freshly_created,
        })
    }

    /// Registers a new author and persists the configuration.
    pub fn add_author(&self, id: &str, name: &str, email: &str) -> ServiceResult<Author> {
        let mut config = self.load()?.config;
        config.authors.add(id, name, email)?;
        config.write()?;
        Ok(Author::new(id, name, email))
    }

    /// Authors in registry order.
    pub fn list_authors(&self) -> ServiceResult<Vec<Author>> {
        let config = self.load()?.config;
        Ok(config.authors.iter().cloned().collect())
    }

    /// Configuration as the YAML document stored on disk.
    pub fn display_config(&self) -> ServiceResult<String> {
        let config = self.load()?.config;
        Ok(config.to_yaml()?)
    }

    /// Sets `issue_tracker` or `template` and persists the configuration.
    pub fn set_config(&self, key: &str, value: &str) -> ServiceResult<ConfigKey> {
        let mut config = self.load()?.config;
        let key = config.set(key, value)?;
        config.write()?;
        Ok(key)
    }

    /// Renders the commit template with the requested fields and co-authors.
    pub fn render(&self, request: &RenderRequest) -> ServiceResult<String> {
        let config = self.load()?.config;
        let co_authors = resolve_co_authors(&config.authors, &request.co_authors)?;
        let context = RenderContext {
            co_authors: Some(co_authors),
            ..request.context.clone()
        };
        Ok(render(&config, &context, request.strictness)?)
    }

    fn load(&self) -> ServiceResult<LoadOutcome> {
        Ok(load_or_initialize(&self.config_path, &self.identity)?)
    }

    fn roll_back_fresh_config(&self) {
        match remove_config_file(&self.config_path) {
            Ok(()) => warn!(
                "event=init_rollback module=service status=ok path={}",
                self.config_path.display()
            ),
            Err(err) => error!(
                "event=init_rollback module=service status=error path={} error={err}",
                self.config_path.display()
            ),
        }
    }
}

/// Resolves each selector by id, falling back to email.
fn resolve_co_authors(
    registry: &AuthorRegistry,
    selectors: &[String],
) -> ServiceResult<Vec<Author>> {
    selectors
        .iter()
        .map(|selector| {
            registry
                .find(selector)
                .or_else(|| registry.find_by_email(selector))
                .cloned()
                .ok_or_else(|| ServiceError::UnknownAuthor(selector.clone()))
        })
        .collect()
}
