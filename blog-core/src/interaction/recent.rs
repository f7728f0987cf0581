use std::sync::Arc;

use crate::storage::{read_json, write_json, KeyValueStorage, StorageError};

pub const RECENT_SEARCHES_KEY: &str = "blog-recent-searches";
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Most-recent-first list of search queries.
#[derive(Clone)]
pub struct RecentSearches {
    storage: Arc<dyn KeyValueStorage>,
}

impl RecentSearches {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> Vec<String> {
        let mut searches: Vec<String> =
            read_json(self.storage.as_ref(), RECENT_SEARCHES_KEY).unwrap_or_default();
        searches.truncate(MAX_RECENT_SEARCHES);
        searches
    }

    /// Moves `query` to the front. Blank queries are ignored.
    pub fn record(&self, query: &str) -> Result<Vec<String>, StorageError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(self.list());
        }

        let mut searches: Vec<String> = self.list().into_iter().filter(|q| q != query).collect();
        searches.insert(0, query.to_string());
        searches.truncate(MAX_RECENT_SEARCHES);

        self.save(&searches)?;
        Ok(searches)
    }

    pub fn remove(&self, query: &str) -> Result<Vec<String>, StorageError> {
        let searches: Vec<String> = self.list().into_iter().filter(|q| q != query).collect();
        self.save(&searches)?;
        Ok(searches)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(RECENT_SEARCHES_KEY)
    }

    fn save(&self, searches: &[String]) -> Result<(), StorageError> {
        write_json(self.storage.as_ref(), RECENT_SEARCHES_KEY, &searches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn recent() -> RecentSearches {
        RecentSearches::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn most_recent_first_without_duplicates() {
        let recent = recent();

        recent.record("react").unwrap();
        recent.record("rust").unwrap();
        recent.record("  react ").unwrap();

        assert_eq!(recent.list(), vec!["react", "rust"]);
    }

    #[test]
    fn keeps_at_most_five() {
        let recent = recent();
        for q in ["a", "b", "c", "d", "e", "f"] {
            recent.record(q).unwrap();
        }

        assert_eq!(recent.list(), vec!["f", "e", "d", "c", "b"]);
    }

    #[test]
    fn blank_queries_are_not_recorded() {
        let recent = recent();
        recent.record("   ").unwrap();

        assert!(recent.list().is_empty());
    }

    #[test]
    fn remove_and_clear() {
        let recent = recent();
        recent.record("one").unwrap();
        recent.record("two").unwrap();

        assert_eq!(recent.remove("one").unwrap(), vec!["two"]);
        recent.clear().unwrap();
        assert!(recent.list().is_empty());
    }
}
