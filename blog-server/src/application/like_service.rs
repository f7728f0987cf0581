use crate::data::{ContentRepository, LikeRepository};
use crate::domain::comment::required;
use crate::domain::{AuthenticatedUser, DomainError};
use blog_core::LikeState;
use std::sync::Arc;

pub struct LikeService {
    like_repo: Arc<dyn LikeRepository + Send + Sync>,
    content_repo: Arc<dyn ContentRepository + Send + Sync>,
}

impl LikeService {
    pub fn new(
        like_repo: Arc<dyn LikeRepository + Send + Sync>,
        content_repo: Arc<dyn ContentRepository + Send + Sync>,
    ) -> Self {
        Self {
            like_repo,
            content_repo,
        }
    }

    /// Like state for a post; without a user id only the total is meaningful.
    pub async fn like_state(
        &self,
        post_id: Option<String>,
        user_id: Option<String>,
    ) -> Result<LikeState, DomainError> {
        let post_id = required(post_id)
            .ok_or_else(|| DomainError::ValidationError("postId is required".to_string()))?;
        let post = self.content_repo.find_by_id(&post_id).await?;
        let user_id = required(user_id).unwrap_or_default();

        self.like_repo
            .state(&post.id, &user_id, post.like_count)
            .await
    }

    /// Flips the like of the authenticated user, or of the anonymous id from the
    /// request when nobody is signed in.
    pub async fn toggle_like(
        &self,
        user: Option<&AuthenticatedUser>,
        post_id: Option<String>,
        anonymous_id: Option<String>,
    ) -> Result<LikeState, DomainError> {
        let post_id = required(post_id)
            .ok_or_else(|| DomainError::ValidationError("postId is required".to_string()))?;
        let user_id = user
            .map(|u| u.user_id.clone())
            .or_else(|| required(anonymous_id))
            .ok_or_else(|| DomainError::ValidationError("userId is required".to_string()))?;

        let post = self.content_repo.find_by_id(&post_id).await?;
        let state = self
            .like_repo
            .toggle(&post.id, &user_id, post.like_count)
            .await
            .map_err(|e| {
                tracing::warn!("Like toggle rejected for post {}: {}", post.id, e);
                e
            })?;

        tracing::info!(
            "Like toggled: post_id={}, user_id={}, liked={}, total={}",
            post.id,
            user_id,
            state.liked,
            state.total_count
        );

        Ok(state)
    }
}
