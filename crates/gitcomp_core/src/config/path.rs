//! Configuration path resolution.
//!
//! Resolution happens once per process; the result is passed explicitly to
//! every operation that touches the file.

use super::{ConfigError, ConfigResult, CONFIG_FILE_NAME};
use std::path::PathBuf;

/// Returns `override_path` verbatim when non-empty, else `~/.git-comp.yaml`.
pub fn resolve_config_path(override_path: Option<&str>) -> ConfigResult<PathBuf> {
    resolve_config_path_with_home(override_path, dirs::home_dir())
}

/// Same as [`resolve_config_path`] with the home directory supplied by the caller.
pub fn resolve_config_path_with_home(
    override_path: Option<&str>,
    home: Option<PathBuf>,
) -> ConfigResult<PathBuf> {
    match override_path {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => home
            .map(|home| home.join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::HomeDirectoryUnavailable),
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_config_path_with_home;
    use crate::config::ConfigError;
    use std::path::PathBuf;

    #[test]
    fn override_wins_verbatim() {
        let path = resolve_config_path_with_home(
            Some("relative/comp.yaml"),
            Some(PathBuf::from("/home/ada")),
        )
        .expect("override path");
        assert_eq!(path, PathBuf::from("relative/comp.yaml"));
    }

    #[test]
    fn empty_override_falls_back_to_home() {
        let path = resolve_config_path_with_home(Some(""), Some(PathBuf::from("/home/ada")))
            .expect("home path");
        assert_eq!(path, PathBuf::from("/home/ada/.git-comp.yaml"));

        let path =
            resolve_config_path_with_home(None, Some(PathBuf::from("/home/ada"))).expect("home");
        assert_eq!(path, PathBuf::from("/home/ada/.git-comp.yaml"));
    }

    #[test]
    fn missing_home_without_override_fails() {
        let err = resolve_config_path_with_home(None, None).expect_err("no home must fail");
        assert!(matches!(err, ConfigError::HomeDirectoryUnavailable));
    }

    #[test]
    fn override_does_not_need_home() {
        let path = resolve_config_path_with_home(Some("/etc/comp.yaml"), None).expect("override");
        assert_eq!(path, PathBuf::from("/etc/comp.yaml"));
    }
}
