//! Ambient user identity lookup.
//!
//! # Responsibility
//! - Provide the `{name, email}` pair recorded as the `self` author on first run.
//! - Keep the git process boundary behind a trait so callers can substitute it.
//!
//! # Invariants
//! - A missing or empty identity value is an error, never a silent default.

use log::{debug, error};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Display name and email of the invoking user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("git executable not found on PATH: {0}")]
    GitNotFound(#[from] which::Error),
    #[error("git executable does not exist: {}", .0.display())]
    InvalidGitPath(PathBuf),
    #[error("failed to run git: {0}")]
    Command(#[source] std::io::Error),
    #[error("git identity is not configured: `{key}` is unset")]
    Unset { key: String },
}

/// Source of the ambient user's identity.
pub trait IdentityProvider {
    fn identity(&self) -> Result<Identity, IdentityError>;
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for &T {
    fn identity(&self) -> Result<Identity, IdentityError> {
        (**self).identity()
    }
}

/// Identity read from `git config user.name` / `user.email`.
#[derive(Debug, Clone)]
pub struct GitIdentityProvider {
    git: PathBuf,
}

impl GitIdentityProvider {
    /// Uses the first `git` executable found on `PATH`.
    pub fn new() -> Result<Self, IdentityError> {
        let git = which::which("git")?;
        Self::from_path(git)
    }

    /// Uses an explicit git executable.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IdentityError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IdentityError::InvalidGitPath(path.to_path_buf()));
        }
        Ok(Self {
            git: path.to_path_buf(),
        })
    }

    pub fn git_path(&self) -> &Path {
        &self.git
    }

    fn config_value(&self, key: &str) -> Result<String, IdentityError> {
        let output = Command::new(&self.git)
            .args(["config", "--get", key])
            .output()
            .map_err(|err| {
                error!("event=identity_lookup module=identity status=error key={key} error={err}");
                IdentityError::Command(err)
            })?;

        // `git config --get` exits 1 when the key is missing.
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() || value.is_empty() {
            return Err(IdentityError::Unset {
                key: key.to_string(),
            });
        }
        Ok(value)
    }
}

impl IdentityProvider for GitIdentityProvider {
    fn identity(&self) -> Result<Identity, IdentityError> {
        let name = self.config_value("user.name")?;
        let email = self.config_value("user.email")?;
        debug!("event=identity_lookup module=identity status=ok source=git");
        Ok(Identity { name, email })
    }
}

/// Fixed identity, for callers that already know who is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIdentityProvider {
    identity: Identity,
}

impl StaticIdentityProvider {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            identity: Identity::new(name, email),
        }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn identity(&self) -> Result<Identity, IdentityError> {
        Ok(self.identity.clone())
    }
}
