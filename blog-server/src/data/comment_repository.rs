use crate::domain::DomainError;
use async_trait::async_trait;
use blog_core::{Comment, CommentStore, KeyValueStorage};
use chrono::Utc;
use std::sync::Arc;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn list(&self, post_id: &str) -> Result<Vec<Comment>, DomainError>;
    async fn find(&self, post_id: &str, comment_id: &str) -> Result<Comment, DomainError>;
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError>;
    async fn update(
        &self,
        post_id: &str,
        comment_id: &str,
        content: &str,
    ) -> Result<Comment, DomainError>;
    async fn delete(&self, post_id: &str, comment_id: &str) -> Result<(), DomainError>;
}

/// Comments kept in the key-value storage under `blog-comments-<postId>`.
pub struct StoredCommentRepository {
    store: CommentStore,
}

impl StoredCommentRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            store: CommentStore::new(storage),
        }
    }
}

#[async_trait]
impl CommentRepository for StoredCommentRepository {
    async fn list(&self, post_id: &str) -> Result<Vec<Comment>, DomainError> {
        Ok(self.store.list(post_id))
    }

    async fn find(&self, post_id: &str, comment_id: &str) -> Result<Comment, DomainError> {
        self.store
            .find(post_id, comment_id)
            .ok_or(DomainError::CommentNotFound)
    }

    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        let post_id = comment.post_id.clone();
        self.store.add(&post_id, comment).map_err(|e| {
            tracing::error!("Failed to store comment for post {}: {}", post_id, e);
            DomainError::from(e)
        })
    }

    async fn update(
        &self,
        post_id: &str,
        comment_id: &str,
        content: &str,
    ) -> Result<Comment, DomainError> {
        Ok(self.store.update(post_id, comment_id, content, Utc::now())?)
    }

    async fn delete(&self, post_id: &str, comment_id: &str) -> Result<(), DomainError> {
        Ok(self.store.remove(post_id, comment_id)?)
    }
}
