//! The user's liked items.

use tracing::warn;

use crate::item::CanonicalItem;

/// Liked item snapshots keyed by title.
///
/// Two distinct catalog entries sharing a title are the same like; the
/// service exposes no stable id across endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LikedSet {
    items: Vec<CanonicalItem>,
}

impl LikedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a snapshot. Returns false for a blank title or an existing title.
    pub fn insert(&mut self, item: CanonicalItem) -> bool {
        if item.title.trim().is_empty() || self.contains(&item.title) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove by title. Returns false when the title was not liked.
    pub fn remove(&mut self, title: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.title != title);
        self.items.len() != before
    }

    pub fn contains(&self, title: &str) -> bool {
        self.items.iter().any(|i| i.title == title)
    }

    pub fn items(&self) -> &[CanonicalItem] {
        &self.items
    }

    pub fn titles(&self) -> Vec<String> {
        self.items.iter().map(|i| i.title.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// JSON array of item snapshots.
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Parse a stored JSON array. Unparseable data yields an empty set;
    /// duplicate and blank titles are dropped.
    pub fn deserialize(data: &str) -> Self {
        match serde_json::from_str::<Vec<CanonicalItem>>(data) {
            Ok(items) => {
                let mut set = LikedSet::new();
                for item in items {
                    set.insert(item);
                }
                set
            }
            Err(e) => {
                warn!(error = %e, "Stored liked items are corrupt, starting with an empty set");
                LikedSet::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_insert_keyed_by_title() {
        let mut liked = LikedSet::new();
        assert!(liked.insert(CanonicalItem::with_title("Portal 2")));
        assert!(!liked.insert(CanonicalItem::with_title("Portal 2")));
        assert!(!liked.insert(CanonicalItem::with_title("  ")));
        assert_eq!(liked.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut liked = LikedSet::new();
        liked.insert(CanonicalItem::with_title("Terraria"));
        assert!(!liked.remove("Minecraft"));
        assert!(liked.remove("Terraria"));
        assert!(liked.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let mut liked = LikedSet::new();
        for title in ["Hollow Knight", "Celeste", "Hades"] {
            liked.insert(CanonicalItem {
                current_price: 14.99,
                tags: vec!["Indie".into()],
                ..CanonicalItem::with_title(title)
            });
        }
        let data = liked.serialize().unwrap();
        let restored = LikedSet::deserialize(&data);

        let a: HashSet<String> = liked.titles().into_iter().collect();
        let b: HashSet<String> = restored.titles().into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(restored.items()[0].current_price, 14.99);
    }

    #[test]
    fn test_corrupt_data_yields_empty_set() {
        for data in ["", "not json", "{\"title\": 1}", "[1, 2", "null"] {
            assert!(LikedSet::deserialize(data).is_empty(), "input: {:?}", data);
        }
    }

    #[test]
    fn test_deserialize_drops_duplicates() {
        let restored = LikedSet::deserialize(r#"[{"title": "Doom"}, {"title": "Doom"}, {}]"#);
        assert_eq!(restored.titles(), vec!["Doom".to_string()]);
    }
}
