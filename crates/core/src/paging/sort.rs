//! Sort criteria and type filters for browse mode.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::item::{CanonicalItem, ItemType};

/// Field the service sorts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    Price,
    Sentiment,
    Popularity,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Price => "price",
            SortField::Sentiment => "sentiment",
            SortField::Popularity => "popularity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// User-facing sort choice in browse mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortCriterion {
    Alphabetical,
    PriceLow,
    PriceHigh,
    Rating,
    #[default]
    Popularity,
}

impl SortCriterion {
    /// The `(field, order)` pair sent to the service.
    pub fn server_order(&self) -> (SortField, SortOrder) {
        match self {
            SortCriterion::Alphabetical => (SortField::Title, SortOrder::Ascending),
            SortCriterion::PriceLow => (SortField::Price, SortOrder::Ascending),
            SortCriterion::PriceHigh => (SortField::Price, SortOrder::Descending),
            SortCriterion::Rating => (SortField::Sentiment, SortOrder::Descending),
            SortCriterion::Popularity => (SortField::Popularity, SortOrder::Descending),
        }
    }

    /// Compare two items the way the service orders them for this criterion.
    pub fn compare(&self, a: &CanonicalItem, b: &CanonicalItem) -> Ordering {
        let (field, order) = self.server_order();
        let ord = match field {
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Price => a.current_price.total_cmp(&b.current_price),
            SortField::Sentiment => a.sentiment_score.total_cmp(&b.sentiment_score),
            SortField::Popularity => a.popularity.total_cmp(&b.popularity),
        };
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }

    /// Stable client-side sort, used for immediate feedback before the
    /// server round-trip resolves.
    pub fn sorted(&self, items: &[CanonicalItem]) -> Vec<CanonicalItem> {
        let mut out = items.to_vec();
        out.sort_by(|a, b| self.compare(a, b));
        out
    }
}

/// Price-type filter accepted by the listing and search endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFilter {
    #[default]
    All,
    Free,
    Discount,
    Paid,
}

impl TypeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Free => "free",
            TypeFilter::Discount => "discount",
            TypeFilter::Paid => "paid",
        }
    }

    pub fn matches(&self, item_type: ItemType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Free => item_type == ItemType::Free,
            TypeFilter::Discount => item_type == ItemType::Discounted,
            TypeFilter::Paid => item_type == ItemType::Paid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, price: f64, sentiment: f64, popularity: f64) -> CanonicalItem {
        CanonicalItem {
            current_price: price,
            original_price: price,
            sentiment_score: sentiment,
            popularity,
            ..CanonicalItem::with_title(title)
        }
    }

    fn titles(items: &[CanonicalItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_server_order_mapping() {
        assert_eq!(
            SortCriterion::Alphabetical.server_order(),
            (SortField::Title, SortOrder::Ascending)
        );
        assert_eq!(
            SortCriterion::PriceLow.server_order(),
            (SortField::Price, SortOrder::Ascending)
        );
        assert_eq!(
            SortCriterion::PriceHigh.server_order(),
            (SortField::Price, SortOrder::Descending)
        );
        assert_eq!(
            SortCriterion::Rating.server_order(),
            (SortField::Sentiment, SortOrder::Descending)
        );
        assert_eq!(
            SortCriterion::default().server_order(),
            (SortField::Popularity, SortOrder::Descending)
        );
    }

    #[test]
    fn test_client_side_sort() {
        let items = vec![
            item("beta", 20.0, 0.9, 0.1),
            item("Alpha", 5.0, 0.4, 0.8),
            item("gamma", 10.0, 0.7, 0.5),
        ];
        assert_eq!(
            titles(&SortCriterion::Alphabetical.sorted(&items)),
            vec!["Alpha", "beta", "gamma"]
        );
        assert_eq!(
            titles(&SortCriterion::PriceHigh.sorted(&items)),
            vec!["beta", "gamma", "Alpha"]
        );
        assert_eq!(
            titles(&SortCriterion::Rating.sorted(&items)),
            vec!["beta", "gamma", "Alpha"]
        );
        assert_eq!(
            titles(&SortCriterion::Popularity.sorted(&items)),
            vec!["Alpha", "gamma", "beta"]
        );
    }

    #[test]
    fn test_type_filter_matches() {
        assert!(TypeFilter::All.matches(ItemType::Paid));
        assert!(TypeFilter::Discount.matches(ItemType::Discounted));
        assert!(!TypeFilter::Free.matches(ItemType::Paid));
    }
}
