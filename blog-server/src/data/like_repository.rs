use crate::domain::DomainError;
use async_trait::async_trait;
use blog_core::{KeyValueStorage, LikeState, LikeStore};
use std::sync::Arc;

#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn state(&self, post_id: &str, user_id: &str, initial: u64) -> Result<LikeState, DomainError>;
    async fn toggle(&self, post_id: &str, user_id: &str, initial: u64) -> Result<LikeState, DomainError>;
}

pub struct StoredLikeRepository {
    store: LikeStore,
}

impl StoredLikeRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            store: LikeStore::new(storage),
        }
    }
}

#[async_trait]
impl LikeRepository for StoredLikeRepository {
    async fn state(&self, post_id: &str, user_id: &str, initial: u64) -> Result<LikeState, DomainError> {
        Ok(self.store.state(post_id, user_id, initial))
    }

    async fn toggle(&self, post_id: &str, user_id: &str, initial: u64) -> Result<LikeState, DomainError> {
        Ok(self.store.toggle(post_id, user_id, initial)?)
    }
}
