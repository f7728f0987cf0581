use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::domain::Comment;
use crate::storage::{read_json, write_json, KeyValueStorage, StorageError};

pub const COMMENTS_KEY_PREFIX: &str = "blog-comments-";
pub const LEGACY_COMMENTS_KEY_PREFIX: &str = "comments_";

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Comment not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Per-post comment lists.
///
/// A plain collection mutator: it does not know who is calling. Ownership checks
/// and content validation belong to whoever invokes it.
///
/// Clones share one write lock, so `add`, `update` and `remove` never interleave
/// their load and persist steps.
#[derive(Clone)]
pub struct CommentStore {
    storage: Arc<dyn KeyValueStorage>,
    writes: Arc<Mutex<()>>,
}

impl CommentStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            writes: Arc::new(Mutex::new(())),
        }
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.writes
            .lock()
            .map_err(|_| StorageError::Unavailable("comment store lock poisoned".to_string()))
    }

    fn key(post_id: &str) -> String {
        format!("{}{}", COMMENTS_KEY_PREFIX, post_id)
    }

    fn legacy_key(post_id: &str) -> String {
        format!("{}{}", LEGACY_COMMENTS_KEY_PREFIX, post_id)
    }

    /// Stored order, canonical entries first, then legacy entries not seen yet.
    fn load(&self, post_id: &str) -> Vec<Comment> {
        let mut comments: Vec<Comment> =
            read_json(self.storage.as_ref(), &Self::key(post_id)).unwrap_or_default();

        let legacy: Vec<Comment> =
            read_json(self.storage.as_ref(), &Self::legacy_key(post_id)).unwrap_or_default();
        for comment in legacy {
            if !comments.iter().any(|c| c.id == comment.id) {
                comments.push(comment);
            }
        }

        comments
    }

    fn persist(&self, post_id: &str, comments: &[Comment]) -> Result<(), StorageError> {
        write_json(self.storage.as_ref(), &Self::key(post_id), &comments)?;

        // merged into the canonical key above
        if let Err(e) = self.storage.remove(&Self::legacy_key(post_id)) {
            tracing::warn!("Failed to drop legacy comments for post {}: {}", post_id, e);
        }
        Ok(())
    }

    /// Comments for a post, newest first.
    pub fn list(&self, post_id: &str) -> Vec<Comment> {
        let mut comments = self.load(post_id);
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments
    }

    pub fn find(&self, post_id: &str, comment_id: &str) -> Option<Comment> {
        self.load(post_id).into_iter().find(|c| c.id == comment_id)
    }

    pub fn count(&self, post_id: &str) -> usize {
        self.load(post_id).len()
    }

    pub fn add(&self, post_id: &str, mut comment: Comment) -> Result<Comment, CommentError> {
        comment.post_id = post_id.to_string();

        let _writes = self.lock_writes()?;
        let mut comments = self.load(post_id);
        comments.push(comment.clone());
        self.persist(post_id, &comments)?;

        tracing::debug!(
            "Comment {} stored for post {} ({} total)",
            comment.id,
            post_id,
            comments.len()
        );
        Ok(comment)
    }

    /// Replaces the content of a comment; only content, `updated_at` and `is_edited` change.
    pub fn update(
        &self,
        post_id: &str,
        comment_id: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Comment, CommentError> {
        let _writes = self.lock_writes()?;
        let mut comments = self.load(post_id);
        let comment = comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| CommentError::NotFound(comment_id.to_string()))?;

        comment.content = content.to_string();
        comment.updated_at = Some(now);
        comment.is_edited = true;
        let updated = comment.clone();

        self.persist(post_id, &comments)?;
        Ok(updated)
    }

    pub fn remove(&self, post_id: &str, comment_id: &str) -> Result<(), CommentError> {
        let _writes = self.lock_writes()?;
        let comments = self.load(post_id);
        let before = comments.len();
        let remaining: Vec<Comment> = comments.into_iter().filter(|c| c.id != comment_id).collect();

        if remaining.len() == before {
            return Err(CommentError::NotFound(comment_id.to_string()));
        }

        self.persist(post_id, &remaining)?;
        Ok(())
    }
}
