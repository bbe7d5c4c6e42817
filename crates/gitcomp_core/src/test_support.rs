//! Shared fixtures for unit tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Writes an executable `git` stand-in into `dir` whose body is `script`.
pub(crate) fn fake_git(dir: &Path, script: &str) -> PathBuf {
    let path = dir.join("git");
    fs::write(&path, format!("#!/bin/sh\n{script}")).expect("write fake git");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake git");
    path
}
