//! Controller limits.

use serde::{Deserialize, Serialize};

/// Largest page size the listing endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Largest result count the search endpoint accepts.
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// Largest result cap the recommendation endpoints accept.
pub const MAX_RECOMMENDATION_LIMIT: u32 = 50;

/// Page sizes and result caps per mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Items per browse page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Result cap for free-text search.
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Result cap sent with content, constraint and hybrid requests.
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: u32,
}

fn default_page_size() -> u32 {
    20
}

fn default_search_limit() -> u32 {
    20
}

fn default_recommendation_limit() -> u32 {
    10
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            search_limit: default_search_limit(),
            recommendation_limit: default_recommendation_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.search_limit, 20);
        assert_eq!(config.recommendation_limit, 10);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ControllerConfig = toml::from_str("page_size = 40").unwrap();
        assert_eq!(config.page_size, 40);
        assert_eq!(config.recommendation_limit, 10);
    }
}
