//! Configuration file read, write and first-run initialization.
//!
//! # Responsibility
//! - Load an existing document as-is, or create and persist defaults once.
//! - Write the full document back with a truncate-and-overwrite.
//!
//! # Invariants
//! - The identity provider is consulted only when no file exists.
//! - A fresh configuration is on disk before `load_or_initialize` returns.
//! - No locking: concurrent invocations on one file are not serialized.

use super::{ConfigError, ConfigResult, Configuration};
use crate::identity::IdentityProvider;
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of [`load_or_initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub config: Configuration,
    /// `true` when this call created the file.
    pub freshly_created: bool,
}

/// Loads the configuration at `path`, creating it with defaults when absent.
pub fn load_or_initialize(
    path: impl AsRef<Path>,
    identity: &dyn IdentityProvider,
) -> ConfigResult<LoadOutcome> {
    let path = path.as_ref();
    if path.exists() {
        let config = read_config(path)?;
        info!(
            "event=config_load module=config status=ok mode=existing path={}",
            path.display()
        );
        return Ok(LoadOutcome {
            config,
            freshly_created: false,
        });
    }

    let identity = identity.identity().map_err(|err| {
        error!(
            "event=config_load module=config status=error mode=fresh error_code=identity_unavailable error={err}"
        );
        ConfigError::from(err)
    })?;
    let config = Configuration::with_defaults(path, identity);
    config.write()?;
    info!(
        "event=config_load module=config status=ok mode=fresh path={}",
        path.display()
    );
    Ok(LoadOutcome {
        config,
        freshly_created: true,
    })
}

/// Deserializes the document at `path` without further validation.
pub fn read_config(path: impl AsRef<Path>) -> ConfigResult<Configuration> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: Configuration =
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.set_path(path);
    Ok(config)
}

impl Configuration {
    /// Serializes the full document and overwrites `self.path()`.
    ///
    /// On error the in-memory value is unchanged but nothing durable happened.
    pub fn write(&self) -> ConfigResult<()> {
        let yaml = self.to_yaml()?;
        info!(
            "event=config_write module=config status=start path={}",
            self.path().display()
        );
        fs::write(self.path(), yaml).map_err(|source| {
            error!(
                "event=config_write module=config status=error path={} error={source}",
                self.path().display()
            );
            ConfigError::Write {
                path: self.path().to_path_buf(),
                source,
            }
        })
    }
}

pub(crate) fn remove_config_file(path: &Path) -> Result<(), ConfigError> {
    fs::remove_file(path).map_err(|source| ConfigError::Remove {
        path: PathBuf::from(path),
        source,
    })
}
