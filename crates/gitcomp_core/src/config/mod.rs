//! Persisted configuration: author registry, issue tracker, commit template.
//!
//! # Responsibility
//! - Define the on-disk document and its in-memory form.
//! - Restrict runtime edits to the recognized keys.
//!
//! # Invariants
//! - `path` is a runtime attribute and is never serialized.
//! - Missing document fields load as empty values.
//! - Mutations stay in memory until `Configuration::write` is called.

use crate::identity::{Identity, IdentityError};
use crate::model::author::{Author, AuthorRegistry, SELF_AUTHOR_ID};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub mod path;
pub mod store;

pub use path::{resolve_config_path, resolve_config_path_with_home};
pub use store::{load_or_initialize, read_config, LoadOutcome};

/// File name used under the home directory when no override is given.
pub const CONFIG_FILE_NAME: &str = ".git-comp.yaml";

/// Built-in commit message template.
pub const DEFAULT_TEMPLATE: &str = "{{Type}}({{Scope}}): {{Subject}}

{{Body}}

{{IssueTracker}}: {{Issue}}
{{CoAuthors}}
{{Footer}}";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("home directory is unavailable; pass an explicit configuration path")]
    HomeDirectoryUnavailable,
    #[error("failed to read configuration `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write configuration `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to remove configuration `{}`: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration document `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[source] serde_yaml::Error),
    #[error("failed to determine the current user: {0}")]
    Identity(#[from] IdentityError),
}

/// Keys accepted by `config set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    IssueTracker,
    Template,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 2] = [ConfigKey::IssueTracker, ConfigKey::Template];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::IssueTracker => "issue_tracker",
            Self::Template => "template",
        }
    }
}

impl FromStr for ConfigKey {
    type Err = UnknownKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "issue_tracker" => Ok(Self::IssueTracker),
            "template" => Ok(Self::Template),
            other => Err(UnknownKeyError {
                key: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown configuration key `{key}`; expected issue_tracker|template")]
pub struct UnknownKeyError {
    pub key: String,
}

/// Full tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default)]
    pub authors: AuthorRegistry,
    /// Issue tracker label, e.g. `Jira`.
    #[serde(default)]
    pub issue_tracker: String,
    #[serde(default)]
    pub template: String,
    /// Tool version that first wrote the file.
    #[serde(default)]
    pub version: String,
}

impl Configuration {
    /// Fresh configuration whose only author is `self`, bound to `identity`.
    pub fn with_defaults(path: impl Into<PathBuf>, identity: Identity) -> Self {
        Self {
            path: path.into(),
            authors: AuthorRegistry::single(Author::new(
                SELF_AUTHOR_ID,
                identity.name,
                identity.email,
            )),
            issue_tracker: String::new(),
            template: DEFAULT_TEMPLATE.to_string(),
            version: crate::core_version().to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
    }

    /// Updates one recognized key. Unknown keys leave `self` untouched.
    pub fn set(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<ConfigKey, UnknownKeyError> {
        let key = key.parse::<ConfigKey>()?;
        match key {
            ConfigKey::IssueTracker => self.issue_tracker = value.into(),
            ConfigKey::Template => self.template = value.into(),
        }
        Ok(key)
    }

    /// YAML document as written to disk.
    pub fn to_yaml(&self) -> ConfigResult<String> {
        serde_yaml::to_string(self).map_err(ConfigError::Serialize)
    }
}
