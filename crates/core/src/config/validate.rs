use super::{types::Config, ConfigError};
use crate::controller::{MAX_PAGE_SIZE, MAX_RECOMMENDATION_LIMIT, MAX_SEARCH_LIMIT};

/// Validate configuration
/// Currently validates:
/// - Service URL is not blank and timeout is not 0
/// - Storage key is not blank
/// - Limits are within the service's accepted ranges
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.service.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "service.base_url cannot be empty".to_string(),
        ));
    }
    if config.service.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "service.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.storage.liked_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.liked_key cannot be empty".to_string(),
        ));
    }

    check_limit("limits.page_size", config.limits.page_size, MAX_PAGE_SIZE)?;
    check_limit("limits.search_limit", config.limits.search_limit, MAX_SEARCH_LIMIT)?;
    check_limit(
        "limits.recommendation_limit",
        config.limits.recommendation_limit,
        MAX_RECOMMENDATION_LIMIT,
    )?;

    Ok(())
}

fn check_limit(name: &str, value: u32, max: u32) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::ValidationError(format!(
            "{} must be between 1 and {}, got {}",
            name, max, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_blank_url_fails() {
        let mut config = Config::default();
        config.service.base_url = "  ".to_string();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_limits() {
        let mut config = Config::default();
        config.limits.page_size = 101;
        assert!(validate_config(&config).is_err());

        config.limits.page_size = 100;
        config.limits.recommendation_limit = 0;
        assert!(validate_config(&config).is_err());

        config.limits.recommendation_limit = 50;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_blank_liked_key_fails() {
        let mut config = Config::default();
        config.storage.liked_key = String::new();
        assert!(validate_config(&config).is_err());
    }
}
