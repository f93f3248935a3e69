use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

const ENV_PREFIX: &str = "GAMEFINDER_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Like [`load_config`], but a missing file falls back to defaults plus
/// environment overrides.
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "No config file, using defaults");
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[service]
base_url = "http://recs.local:9000"

[limits]
page_size = 50
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.service.base_url, "http://recs.local:9000");
        assert_eq!(config.limits.page_size, 50);
        assert_eq!(config.limits.recommendation_limit, 10);
        assert_eq!(config.storage.liked_key, "likedGames");
    }

    #[test]
    fn test_load_config_from_str_empty() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.limits.page_size, 20);
    }

    #[test]
    fn test_load_config_from_str_bad_type() {
        let toml = r#"
[limits]
page_size = "twenty"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/gamefinder.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_or_default_missing_file() {
        let config = load_config_or_default(Path::new("/nonexistent/gamefinder.toml")).unwrap();
        assert_eq!(config.storage.path, Path::new("gamefinder.db"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[service]
base_url = "http://127.0.0.1:8000"
timeout_secs = 5

[storage]
path = "/tmp/likes.db"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.service.timeout_secs, 5);
        assert_eq!(config.storage.path, Path::new("/tmp/likes.db"));
        assert_eq!(config.storage.liked_key, "likedGames");
    }
}
