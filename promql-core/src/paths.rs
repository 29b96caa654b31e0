//! Default path resolution for the CLI configuration file

use std::path::PathBuf;

/// Returns the default path for the CLI configuration file.
///
/// - Linux: `~/.config/promql/config.toml`
/// - macOS: `~/Library/Application Support/promql/config.toml`
///
/// When no config directory can be determined (no home directory), the
/// path is relative to the working directory: `promql/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_default()
        .join("promql")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_is_toml() {
        let path = default_config_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
        assert!(path.ends_with("promql/config.toml"));
    }

    #[test]
    fn test_default_config_path_under_config_dir() {
        if let Some(dir) = dirs::config_dir() {
            assert!(default_config_path().starts_with(dir));
        }
    }
}
