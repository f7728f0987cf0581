use crate::data::CommentRepository;
use crate::domain::comment::{required, CreateCommentRequest, UpdateCommentRequest};
use crate::domain::{AuthenticatedUser, DomainError};
use blog_core::domain::comment::validate_content;
use blog_core::{Comment, CommentDraft};
use chrono::Utc;
use std::sync::Arc;

pub struct CommentService {
    comment_repo: Arc<dyn CommentRepository + Send + Sync>,
}

impl CommentService {
    pub fn new(comment_repo: Arc<dyn CommentRepository + Send + Sync>) -> Self {
        Self { comment_repo }
    }

    pub async fn list_comments(&self, post_id: Option<String>) -> Result<Vec<Comment>, DomainError> {
        let post_id = required(post_id)
            .ok_or_else(|| DomainError::ValidationError("postId is required".to_string()))?;

        self.comment_repo.list(&post_id).await
    }

    pub async fn create_comment(
        &self,
        user: &AuthenticatedUser,
        req: CreateCommentRequest,
    ) -> Result<Comment, DomainError> {
        let (post_id, content) = match (required(req.post_id), req.content) {
            (Some(post_id), Some(content)) => (post_id, content),
            _ => {
                return Err(DomainError::ValidationError(
                    "postId and content are required".to_string(),
                ))
            }
        };

        // post ids are not checked against the content store
        let draft = CommentDraft {
            post_id,
            content,
            user_id: Some(user.user_id.clone()),
            author_name: req.author_name.or_else(|| user.name.clone()),
            author_email: req.author_email.or_else(|| user.email.clone()),
            author_image_url: req.author_image_url.or_else(|| user.picture.clone()),
        };
        let comment = draft.into_comment(Utc::now())?;
        let comment = self.comment_repo.create(comment).await?;

        tracing::info!(
            "Comment created: id={}, post_id={}, user_id={}",
            comment.id,
            comment.post_id,
            user.user_id
        );

        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        user: &AuthenticatedUser,
        req: UpdateCommentRequest,
    ) -> Result<Comment, DomainError> {
        let (post_id, comment_id, content) =
            match (required(req.post_id), required(req.comment_id), req.content) {
                (Some(post_id), Some(comment_id), Some(content)) => (post_id, comment_id, content),
                _ => {
                    return Err(DomainError::ValidationError(
                        "postId, commentId and content are required".to_string(),
                    ))
                }
            };
        let content = validate_content(&content)?;

        self.check_owner(user, &post_id, &comment_id, "edit").await?;
        let comment = self
            .comment_repo
            .update(&post_id, &comment_id, &content)
            .await?;

        tracing::info!(
            "Comment updated: id={}, post_id={}, user_id={}",
            comment_id,
            post_id,
            user.user_id
        );

        Ok(comment)
    }

    pub async fn delete_comment(
        &self,
        user: &AuthenticatedUser,
        post_id: Option<String>,
        comment_id: Option<String>,
    ) -> Result<(), DomainError> {
        let (post_id, comment_id) = match (required(post_id), required(comment_id)) {
            (Some(post_id), Some(comment_id)) => (post_id, comment_id),
            _ => {
                return Err(DomainError::ValidationError(
                    "postId and commentId are required".to_string(),
                ))
            }
        };

        self.check_owner(user, &post_id, &comment_id, "delete").await?;
        self.comment_repo.delete(&post_id, &comment_id).await?;

        tracing::info!(
            "Comment deleted: id={}, post_id={}, user_id={}",
            comment_id,
            post_id,
            user.user_id
        );

        Ok(())
    }

    async fn check_owner(
        &self,
        user: &AuthenticatedUser,
        post_id: &str,
        comment_id: &str,
        action: &str,
    ) -> Result<(), DomainError> {
        let comment = self.comment_repo.find(post_id, comment_id).await?;

        if !comment.is_owned_by(&user.user_id) {
            tracing::warn!(
                "User {} attempted to {} comment {} owned by {:?}",
                user.user_id,
                action,
                comment_id,
                comment.user_id
            );
            return Err(DomainError::Forbidden(format!(
                "you can only {} your own comments",
                action
            )));
        }

        Ok(())
    }
}
