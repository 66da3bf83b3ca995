use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

/// Directory name used under the platform configuration directory.
pub const APP_DIR_NAME: &str = "selftape";

pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// `~/.config/selftape` on most platforms, `./selftape` when no config
/// directory can be determined.
pub fn config_root() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}

/// Resolves a path from an environment override, falling back to a file in
/// [`config_root`].
pub fn env_or_config_path(env_var: &str, file_name: &str) -> PathBuf {
    if let Ok(path) = std::env::var(env_var)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }
    config_root().join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_home_prefix() {
        let expanded = expand_tilde("~/selftape/store.json");
        assert!(expanded.ends_with("selftape/store.json"));
        assert!(!expanded.starts_with("~") || home_dir().is_none());
    }

    #[test]
    fn leaves_plain_paths_untouched() {
        assert_eq!(expand_tilde(" /tmp/store.json "), PathBuf::from("/tmp/store.json"));
    }

    #[test]
    fn env_override_wins_over_config_root() {
        temp_env::with_var("SELFTAPE_TEST_PATH", Some("/tmp/custom.json"), || {
            assert_eq!(env_or_config_path("SELFTAPE_TEST_PATH", "x.json"), PathBuf::from("/tmp/custom.json"));
        });
        temp_env::with_var("SELFTAPE_TEST_PATH", Some("   "), || {
            assert_eq!(env_or_config_path("SELFTAPE_TEST_PATH", "x.json"), config_root().join("x.json"));
        });
    }
}
