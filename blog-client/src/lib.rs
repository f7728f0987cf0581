//! HTTP client for the blog API.

pub mod error;
pub mod http_client;
pub mod models;

use blog_core::{CategoryWithCount, Comment, LikeState, Post};
use error::BlogClientError;
use models::{CategoryResponse, ListPostsParams, NewComment, PostListResponse};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle over [`http_client::HttpClient`]; clones talk to the same
/// server with the same token.
#[derive(Debug, Clone)]
pub struct BlogClient {
    http_client: Arc<Mutex<http_client::HttpClient>>,
}

impl BlogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Arc::new(Mutex::new(http_client::HttpClient::new(base_url))),
        }
    }

    /// Set the bearer token for comment writes and likes
    pub async fn set_token(&self, token: String) {
        self.http_client.lock().await.set_token(token);
    }

    pub async fn get_token(&self) -> Option<String> {
        self.http_client.lock().await.get_token().cloned()
    }

    pub async fn clear_token(&self) {
        self.http_client.lock().await.clear_token();
    }

    pub async fn base_url(&self) -> String {
        self.http_client.lock().await.base_url().to_string()
    }

    pub async fn list_posts(
        &self,
        params: &ListPostsParams,
    ) -> Result<PostListResponse, BlogClientError> {
        let client = self.http_client.lock().await;
        client.list_posts(params).await
    }

    pub async fn get_post(&self, slug: &str) -> Result<Post, BlogClientError> {
        let client = self.http_client.lock().await;
        client.get_post(slug).await
    }

    pub async fn related_posts(
        &self,
        slug: &str,
        limit: usize,
        fallback: bool,
    ) -> Result<Vec<Post>, BlogClientError> {
        let client = self.http_client.lock().await;
        client.related_posts(slug, limit, fallback).await
    }

    pub async fn categories(&self) -> Result<Vec<CategoryWithCount>, BlogClientError> {
        let client = self.http_client.lock().await;
        client.categories().await
    }

    pub async fn category(&self, slug: &str) -> Result<CategoryResponse, BlogClientError> {
        let client = self.http_client.lock().await;
        client.category(slug).await
    }

    pub async fn popular_tags(&self, limit: usize) -> Result<Vec<String>, BlogClientError> {
        let client = self.http_client.lock().await;
        client.popular_tags(limit).await
    }

    pub async fn comments(&self, post_id: &str) -> Result<Vec<Comment>, BlogClientError> {
        let client = self.http_client.lock().await;
        client.comments(post_id).await
    }

    pub async fn create_comment(&self, comment: &NewComment) -> Result<Comment, BlogClientError> {
        let client = self.http_client.lock().await;
        client.create_comment(comment).await
    }

    pub async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        content: &str,
    ) -> Result<Comment, BlogClientError> {
        let client = self.http_client.lock().await;
        client.update_comment(post_id, comment_id, content).await
    }

    pub async fn delete_comment(
        &self,
        post_id: &str,
        comment_id: &str,
    ) -> Result<(), BlogClientError> {
        let client = self.http_client.lock().await;
        client.delete_comment(post_id, comment_id).await
    }

    pub async fn like_state(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> Result<LikeState, BlogClientError> {
        let client = self.http_client.lock().await;
        client.like_state(post_id, user_id).await
    }

    pub async fn toggle_like(
        &self,
        post_id: &str,
        user_id: Option<&str>,
    ) -> Result<LikeState, BlogClientError> {
        let client = self.http_client.lock().await;
        client.toggle_like(post_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_is_shared_between_clones() {
        let client = BlogClient::new("http://localhost:3000");
        let other = client.clone();

        client.set_token("abc".to_string()).await;
        assert_eq!(other.get_token().await.as_deref(), Some("abc"));

        other.clear_token().await;
        assert_eq!(client.get_token().await, None);
    }
}
