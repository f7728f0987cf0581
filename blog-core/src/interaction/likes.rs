use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::storage::{read_json, write_json, KeyValueStorage, StorageError};

pub const LIKES_KEY_PREFIX: &str = "blog-likes-";
pub const LIKE_COUNTS_KEY_PREFIX: &str = "blog-like-counts-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub liked: bool,
    pub total_count: u64,
}

#[derive(Debug, Error)]
pub enum LikeError {
    #[error("A like toggle for post {post_id} is already in progress")]
    InProgress { post_id: String, user_id: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

type FlightKey = (String, String);

/// Per-post like membership (`blog-likes-<postId>`) and aggregate count
/// (`blog-like-counts-<postId>`).
///
/// The two keys only ever change together: a toggle that cannot write the count
/// restores the membership entry it already wrote.
pub struct LikeStore {
    storage: Arc<dyn KeyValueStorage>,
    in_flight: Mutex<HashSet<FlightKey>>,
    commit: Mutex<()>,
}

struct InFlight<'a> {
    set: &'a Mutex<HashSet<FlightKey>>,
    key: FlightKey,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Ok(mut set) = self.set.lock() {
            set.remove(&self.key);
        }
    }
}

impl LikeStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            in_flight: Mutex::new(HashSet::new()),
            commit: Mutex::new(()),
        }
    }

    fn likes_key(post_id: &str) -> String {
        format!("{}{}", LIKES_KEY_PREFIX, post_id)
    }

    fn count_key(post_id: &str) -> String {
        format!("{}{}", LIKE_COUNTS_KEY_PREFIX, post_id)
    }

    fn begin(&self, post_id: &str, user_id: &str) -> Result<InFlight<'_>, LikeError> {
        let key = (post_id.to_string(), user_id.to_string());
        let mut set = self
            .in_flight
            .lock()
            .map_err(|_| StorageError::Unavailable("like store lock poisoned".to_string()))?;

        if !set.insert(key.clone()) {
            return Err(LikeError::InProgress {
                post_id: post_id.to_string(),
                user_id: user_id.to_string(),
            });
        }

        Ok(InFlight {
            set: &self.in_flight,
            key,
        })
    }

    fn members(&self, post_id: &str) -> BTreeMap<String, bool> {
        read_json(self.storage.as_ref(), &Self::likes_key(post_id)).unwrap_or_default()
    }

    pub fn is_liked(&self, post_id: &str, user_id: &str) -> bool {
        self.members(post_id).get(user_id).copied().unwrap_or(false)
    }

    /// Stored aggregate, or `initial` (the post's seeded count) when nothing is stored yet.
    pub fn total_likes(&self, post_id: &str, initial: u64) -> u64 {
        let key = Self::count_key(post_id);
        match self.storage.get(&key) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable like count under {}: {}", key, e);
                initial
            }),
            Ok(None) => initial,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", key, e);
                initial
            }
        }
    }

    pub fn state(&self, post_id: &str, user_id: &str, initial: u64) -> LikeState {
        LikeState {
            liked: self.is_liked(post_id, user_id),
            total_count: self.total_likes(post_id, initial),
        }
    }

    pub fn toggle(&self, post_id: &str, user_id: &str, initial: u64) -> Result<LikeState, LikeError> {
        let _flight = self.begin(post_id, user_id)?;
        let _commit = self
            .commit
            .lock()
            .map_err(|_| StorageError::Unavailable("like store lock poisoned".to_string()))?;

        let likes_key = Self::likes_key(post_id);
        // an unreadable membership key must not be overwritten or removed
        let previous = self.storage.get(&likes_key).map_err(|e| {
            tracing::warn!("Failed to read {}, like toggle aborted: {}", likes_key, e);
            e
        })?;

        let mut members: BTreeMap<String, bool> = match previous.as_deref() {
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding corrupted value under {}: {}", likes_key, e);
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        let count = self.total_likes(post_id, initial);

        let liked = !members.get(user_id).copied().unwrap_or(false);
        let total_count = if liked {
            members.insert(user_id.to_string(), true);
            count + 1
        } else {
            members.remove(user_id);
            count.saturating_sub(1)
        };

        write_json(self.storage.as_ref(), &likes_key, &members)?;

        if let Err(e) = self
            .storage
            .set(&Self::count_key(post_id), &total_count.to_string())
        {
            let restored = match &previous {
                Some(raw) => self.storage.set(&likes_key, raw),
                None => self.storage.remove(&likes_key),
            };
            if let Err(restore_err) = restored {
                tracing::error!(
                    "Like membership for post {} left inconsistent: {}",
                    post_id,
                    restore_err
                );
            }
            return Err(e.into());
        }

        tracing::debug!(
            "Like toggled: post={}, user={}, liked={}, total={}",
            post_id,
            user_id,
            liked,
            total_count
        );

        Ok(LikeState { liked, total_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::FlakyStorage;
    use crate::storage::MemoryStorage;

    fn store() -> (Arc<MemoryStorage>, LikeStore) {
        let storage = Arc::new(MemoryStorage::new());
        (storage.clone(), LikeStore::new(storage))
    }

    #[test]
    fn defaults_to_not_liked_with_initial_count() {
        let (_, likes) = store();

        assert_eq!(
            likes.state("post-1", "user-a", 7),
            LikeState {
                liked: false,
                total_count: 7
            }
        );
    }

    #[test]
    fn toggle_twice_restores_state_and_count() {
        let (_, likes) = store();

        let first = likes.toggle("post-1", "user-a", 7).unwrap();
        assert_eq!(
            first,
            LikeState {
                liked: true,
                total_count: 8
            }
        );
        assert!(likes.is_liked("post-1", "user-a"));

        let second = likes.toggle("post-1", "user-a", 7).unwrap();
        assert_eq!(
            second,
            LikeState {
                liked: false,
                total_count: 7
            }
        );
        assert!(!likes.is_liked("post-1", "user-a"));
    }

    #[test]
    fn users_are_counted_independently() {
        let (_, likes) = store();

        likes.toggle("post-1", "user-a", 0).unwrap();
        let state = likes.toggle("post-1", "user-b", 0).unwrap();

        assert_eq!(state.total_count, 2);
        assert!(likes.is_liked("post-1", "user-a"));
        assert!(likes.is_liked("post-1", "user-b"));
        assert!(!likes.is_liked("post-2", "user-a"));
    }

    #[test]
    fn persisted_layout_matches_browser_keys() {
        let (storage, likes) = store();
        likes.toggle("post-1", "user-a", 3).unwrap();

        assert_eq!(
            storage.get("blog-likes-post-1").unwrap().as_deref(),
            Some(r#"{"user-a":true}"#)
        );
        assert_eq!(
            storage.get("blog-like-counts-post-1").unwrap().as_deref(),
            Some("4")
        );
    }

    #[test]
    fn count_never_goes_negative() {
        let (storage, likes) = store();
        storage
            .set("blog-likes-post-1", r#"{"user-a":true}"#)
            .unwrap();
        storage.set("blog-like-counts-post-1", "0").unwrap();

        let state = likes.toggle("post-1", "user-a", 0).unwrap();
        assert_eq!(
            state,
            LikeState {
                liked: false,
                total_count: 0
            }
        );
    }

    #[test]
    fn second_toggle_while_in_flight_is_rejected() {
        let (_, likes) = store();

        let guard = likes.begin("post-1", "user-a").unwrap();
        assert!(matches!(
            likes.toggle("post-1", "user-a", 0),
            Err(LikeError::InProgress { .. })
        ));
        assert_eq!(likes.total_likes("post-1", 0), 0);

        drop(guard);
        assert!(likes.toggle("post-1", "user-a", 0).unwrap().liked);
    }

    #[test]
    fn unreadable_count_falls_back_to_initial() {
        let (storage, likes) = store();
        storage.set("blog-like-counts-post-1", "lots").unwrap();

        assert_eq!(likes.total_likes("post-1", 12), 12);
    }

    #[test]
    fn failed_count_write_restores_membership() {
        let storage = Arc::new(FlakyStorage::default());
        let likes = LikeStore::new(storage.clone());
        likes.toggle("post-1", "user-a", 5).unwrap();

        storage.fail_writes_with_prefix(LIKE_COUNTS_KEY_PREFIX);
        let result = likes.toggle("post-1", "user-b", 5);

        assert!(matches!(result, Err(LikeError::Storage(_))));
        assert!(!likes.is_liked("post-1", "user-b"));
        assert!(likes.is_liked("post-1", "user-a"));
        assert_eq!(likes.total_likes("post-1", 5), 6);
    }

    #[test]
    fn failed_first_like_leaves_no_membership_key() {
        let storage = Arc::new(FlakyStorage::default());
        let likes = LikeStore::new(storage.clone());

        storage.fail_writes_with_prefix(LIKE_COUNTS_KEY_PREFIX);
        assert!(likes.toggle("post-1", "user-a", 0).is_err());
        assert_eq!(storage.inner.get("blog-likes-post-1").unwrap(), None);
    }

    #[test]
    fn concurrent_toggles_on_one_post_do_not_lose_updates() {
        let likes = Arc::new(LikeStore::new(Arc::new(MemoryStorage::new())));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let likes = likes.clone();
                std::thread::spawn(move || {
                    likes
                        .toggle("post-1", &format!("user-{}", i), 0)
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(likes.total_likes("post-1", 0), 8);
    }

    #[test]
    fn unreadable_membership_aborts_without_touching_other_likes() {
        let storage = Arc::new(FlakyStorage::default());
        let likes = LikeStore::new(storage.clone());
        likes.toggle("post-1", "user-a", 0).unwrap();
        likes.toggle("post-1", "user-b", 0).unwrap();

        storage.fail_reads_with_prefix(LIKES_KEY_PREFIX);
        storage.fail_writes_with_prefix(LIKE_COUNTS_KEY_PREFIX);
        let result = likes.toggle("post-1", "user-c", 0);
        assert!(matches!(result, Err(LikeError::Storage(_))));

        storage.clear_failures();
        assert!(likes.is_liked("post-1", "user-a"));
        assert!(likes.is_liked("post-1", "user-b"));
        assert!(!likes.is_liked("post-1", "user-c"));
        assert_eq!(likes.total_likes("post-1", 0), 2);
    }
}
