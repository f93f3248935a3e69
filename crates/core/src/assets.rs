//! External identifier extraction and visual asset URLs.
//!
//! Store links carry the numeric app id the CDN keys images by. When no id
//! can be derived, callers fall back to [`AssetResolver::placeholder`].

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::item::CanonicalItem;

/// Background colors for placeholder visuals.
pub const PLACEHOLDER_PALETTE: &[&str] = &[
    "1b2838", "2a475e", "66c0f4", "4c6b22", "8f4426", "5c3d7a", "a34c50", "316282",
];

/// Placeholder labels longer than this are truncated.
pub const PLACEHOLDER_LABEL_MAX: usize = 32;

/// Link patterns tried in order; the first capture wins.
static ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"store\.steampowered\.com/app/(\d+)",
        r"steamcommunity\.com/app/(\d+)",
        r"steam://(?:run|store|rungameid)/(\d+)",
        r"/apps?/(\d+)",
        r"[?&]appid=(\d+)",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Asset URL templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Base for `{id}/header.jpg` style image URLs.
    #[serde(default = "default_cdn_base_url")]
    pub cdn_base_url: String,
    /// Base for store pages, `{base}/{id}`.
    #[serde(default = "default_store_base_url")]
    pub store_base_url: String,
    /// Base for placeholder images, `{base}/{color}/ffffff?text={label}`.
    #[serde(default = "default_placeholder_base_url")]
    pub placeholder_base_url: String,
}

fn default_cdn_base_url() -> String {
    "https://cdn.cloudflare.steamstatic.com/steam/apps".to_string()
}

fn default_store_base_url() -> String {
    "https://store.steampowered.com/app".to_string()
}

fn default_placeholder_base_url() -> String {
    "https://placehold.co/460x215".to_string()
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            cdn_base_url: default_cdn_base_url(),
            store_base_url: default_store_base_url(),
            placeholder_base_url: default_placeholder_base_url(),
        }
    }
}

/// Image and page URLs for one external id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetUrls {
    pub header: String,
    pub capsule: String,
    pub hero: String,
    pub store_page: String,
}

/// Deterministic fallback visual for items without an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderVisual {
    /// Hex color without `#`.
    pub color: String,
    /// URL-encoded, trimmed title.
    pub label: String,
    pub url: String,
}

/// Extract the external app id from a store link.
pub fn extract_external_id(link: Option<&str>) -> Option<String> {
    let link = link.map(str::trim).filter(|l| !l.is_empty())?;
    ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(link))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Polynomial rolling hash (base 31) over the title's chars.
pub fn title_hash(title: &str) -> u32 {
    title
        .chars()
        .fold(0u32, |hash, c| hash.wrapping_mul(31).wrapping_add(c as u32))
}

/// Builds asset URLs from configured templates.
#[derive(Debug, Clone, Default)]
pub struct AssetResolver {
    config: AssetConfig,
}

impl AssetResolver {
    pub fn new(config: AssetConfig) -> Self {
        Self { config }
    }

    /// URL set for an id; `None` when there is no id.
    pub fn resolve_asset_urls(&self, id: Option<&str>) -> Option<AssetUrls> {
        let id = id.map(str::trim).filter(|id| !id.is_empty())?;
        let cdn = self.config.cdn_base_url.trim_end_matches('/');
        let store = self.config.store_base_url.trim_end_matches('/');
        Some(AssetUrls {
            header: format!("{}/{}/header.jpg", cdn, id),
            capsule: format!("{}/{}/capsule_616x353.jpg", cdn, id),
            hero: format!("{}/{}/library_hero.jpg", cdn, id),
            store_page: format!("{}/{}", store, id),
        })
    }

    /// Placeholder visual keyed by the title hash.
    pub fn placeholder(&self, title: &str) -> PlaceholderVisual {
        let color = PLACEHOLDER_PALETTE[title_hash(title) as usize % PLACEHOLDER_PALETTE.len()];

        let trimmed = title.trim();
        let text: String = if trimmed.is_empty() {
            "Game".to_string()
        } else if trimmed.chars().count() > PLACEHOLDER_LABEL_MAX {
            let cut: String = trimmed.chars().take(PLACEHOLDER_LABEL_MAX - 3).collect();
            format!("{}...", cut.trim_end())
        } else {
            trimmed.to_string()
        };
        let label = urlencoding::encode(&text).into_owned();

        let url = format!(
            "{}/{}/ffffff?text={}",
            self.config.placeholder_base_url.trim_end_matches('/'),
            color,
            label
        );

        PlaceholderVisual {
            color: color.to_string(),
            label,
            url,
        }
    }

    /// Asset URLs for an item, derived from its external link.
    pub fn resolve_item(&self, item: &CanonicalItem) -> Option<AssetUrls> {
        let id = extract_external_id(item.external_link.as_deref());
        self.resolve_asset_urls(id.as_deref())
    }
}
