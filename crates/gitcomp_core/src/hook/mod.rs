//! Commit-message-preparation hook installation.
//!
//! # Responsibility
//! - Locate the repository's hooks directory, directly or through git.
//! - Report whether `prepare-commit-msg` already exists.
//! - Write the hook script that renders the commit template on every commit.
//!
//! # Invariants
//! - An existing hook file is never truncated or replaced.
//! - A failed existence check performs no filesystem mutation.
//! - The script names the configuration by absolute path.

use crate::config::Configuration;
use log::{debug, error, info};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Hook file name inside `.git/hooks`.
pub const HOOK_FILE_NAME: &str = "prepare-commit-msg";

/// Executable name the hook invokes.
pub const TOOL_BINARY_NAME: &str = "git-comp";

#[derive(Debug, Error)]
pub enum HookError {
    #[error("hook already exists: {}", path.display())]
    AlreadyInstalled { path: PathBuf },
    #[error("not a git repository: {}", path.display())]
    NotARepository { path: PathBuf },
    #[error("failed to run git in `{}`: {source}", path.display())]
    Git {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to install hook `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Existence check and installer for one repository's hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookGuard {
    /// Must already be a directory before anything is written.
    git_dir: PathBuf,
    hook_path: PathBuf,
}

impl HookGuard {
    /// Guard for `<repo_root>/.git/hooks`.
    pub fn for_repository(repo_root: impl AsRef<Path>) -> Self {
        let git_dir = repo_root.as_ref().join(".git");
        let hook_path = git_dir.join("hooks").join(HOOK_FILE_NAME);
        Self { git_dir, hook_path }
    }

    /// Asks `git` for the hooks directory of the repository containing `start_dir`.
    ///
    /// Works from subdirectories, linked worktrees and with `core.hooksPath`.
    pub fn discover(git: &Path, start_dir: &Path) -> Result<Self, HookError> {
        let output = Command::new(git)
            .args(["rev-parse", "--git-path", "hooks"])
            .current_dir(start_dir)
            .output()
            .map_err(|source| HookError::Git {
                path: start_dir.to_path_buf(),
                source,
            })?;

        let reported = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() || reported.is_empty() {
            return Err(HookError::NotARepository {
                path: start_dir.to_path_buf(),
            });
        }

        // `--git-path` answers relative to the working directory it ran in.
        let hooks_dir = start_dir.join(reported);
        let git_dir = hooks_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| hooks_dir.clone());
        debug!(
            "event=hook_discover module=hook status=ok hooks_dir={}",
            hooks_dir.display()
        );
        Ok(Self {
            git_dir,
            hook_path: hooks_dir.join(HOOK_FILE_NAME),
        })
    }

    pub fn hook_path(&self) -> &Path {
        &self.hook_path
    }

    pub fn is_installed(&self) -> bool {
        self.hook_path.exists()
    }

    /// Fails with [`HookError::AlreadyInstalled`] when the hook file exists.
    pub fn check_absent(&self) -> Result<(), HookError> {
        if self.is_installed() {
            return Err(HookError::AlreadyInstalled {
                path: self.hook_path.clone(),
            });
        }
        Ok(())
    }

    /// Writes the hook script bound to `config`'s path.
    ///
    /// A relative configuration path is made absolute against the current
    /// directory, since git runs hooks from the repository root.
    pub fn install(&self, config: &Configuration) -> Result<(), HookError> {
        self.check_absent()?;
        if !self.git_dir.is_dir() {
            return Err(HookError::NotARepository {
                path: self.git_dir.clone(),
            });
        }

        let result = std::path::absolute(config.path())
            .map_err(|source| self.write_error(source))
            .and_then(|config_path| self.write_script(&hook_script(&config_path)));
        match &result {
            Ok(()) => info!(
                "event=hook_install module=hook status=ok path={}",
                self.hook_path.display()
            ),
            Err(err) => error!(
                "event=hook_install module=hook status=error path={} error={err}",
                self.hook_path.display()
            ),
        }
        result
    }

    fn write_error(&self, source: std::io::Error) -> HookError {
        HookError::Write {
            path: self.hook_path.clone(),
            source,
        }
    }

    fn write_script(&self, script: &str) -> Result<(), HookError> {
        if let Some(hooks_dir) = self.hook_path.parent() {
            fs::create_dir_all(hooks_dir).map_err(|err| self.write_error(err))?;
        }

        // create_new keeps a hook that appeared after the check intact.
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.hook_path)
            .map_err(|err| {
                if err.kind() == ErrorKind::AlreadyExists {
                    HookError::AlreadyInstalled {
                        path: self.hook_path.clone(),
                    }
                } else {
                    self.write_error(err)
                }
            })?;
        file.write_all(script.as_bytes())
            .map_err(|err| self.write_error(err))?;
        set_executable(&self.hook_path).map_err(|err| self.write_error(err))
    }
}

/// Shell script invoking `git-comp render` for the given configuration file.
pub fn hook_script(config_path: &Path) -> String {
    format!(
        "#!/bin/sh\n\
         # {HOOK_FILE_NAME} hook installed by {TOOL_BINARY_NAME}.\n\
         # Skipped when git already supplies a message (-m, merge, squash, amend).\n\
         if [ -z \"$2\" ]; then\n    \
         exec {TOOL_BINARY_NAME} --config {} render --lenient --output \"$1\"\n\
         fi\n",
        shell_quote(&config_path.to_string_lossy())
    )
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}


#[cfg(all(test, unix))]
mod discover_tests {
    use super::{HookError, HookGuard};
    use crate::test_support::fake_git;
    use std::path::Path;

    #[test]
    fn relative_answer_is_resolved_against_start_dir() {
        let bin = tempfile::tempdir().expect("tempdir");
        let git = fake_git(bin.path(), "echo ../.git/hooks\n");
        let repo = tempfile::tempdir().expect("tempdir");
        let subdir = repo.path().join("src");
        std::fs::create_dir_all(&subdir).expect("subdir");

        let guard = HookGuard::discover(&git, &subdir).expect("discover");

        assert_eq!(
            guard.hook_path(),
            subdir.join("../.git/hooks").join("prepare-commit-msg")
        );
    }

    #[test]
    fn absolute_answer_is_used_as_is() {
        let bin = tempfile::tempdir().expect("tempdir");
        let git = fake_git(bin.path(), "echo /srv/main/.git/hooks\n");
        let worktree = tempfile::tempdir().expect("tempdir");

        let guard = HookGuard::discover(&git, worktree.path()).expect("discover");

        assert_eq!(
            guard.hook_path(),
            Path::new("/srv/main/.git/hooks/prepare-commit-msg")
        );
    }

    #[test]
    fn git_failure_means_not_a_repository() {
        let bin = tempfile::tempdir().expect("tempdir");
        let git = fake_git(bin.path(), "echo 'fatal: not a git repository' >&2\nexit 128\n");
        let dir = tempfile::tempdir().expect("tempdir");

        let err = HookGuard::discover(&git, dir.path()).expect_err("must fail");

        assert!(matches!(err, HookError::NotARepository { path } if path == dir.path()));
    }
}
