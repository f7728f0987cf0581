use crate::error::BlogClientError;
use crate::models::{
    CategoriesResponse, CategoryResponse, CommentResponse, CommentsResponse, ErrorBody,
    ListPostsParams, NewComment, PostListResponse, PostsResponse, TagsResponse,
    ToggleLikeRequest, UpdateCommentRequest,
};
use blog_core::{CategoryWithCount, Comment, LikeState, Post};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn get_token(&self) -> Option<&String> {
        self.token.as_ref()
    }

    fn add_auth_header(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Decodes a success body, or turns the `{error}` body into a typed error.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, BlogClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await?;
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);

        tracing::debug!("Request failed with {}: {}", status, message);
        Err(BlogClientError::from_status(status.as_u16(), message))
    }

    pub async fn list_posts(
        &self,
        params: &ListPostsParams,
    ) -> Result<PostListResponse, BlogClientError> {
        let url = self.url("/api/posts");
        let response = self.client.get(&url).query(params).send().await?;
        self.handle_response(response).await
    }

    pub async fn get_post(&self, slug: &str) -> Result<Post, BlogClientError> {
        let url = self.url(&format!("/api/posts/{}", slug));
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    pub async fn related_posts(
        &self,
        slug: &str,
        limit: usize,
        fallback: bool,
    ) -> Result<Vec<Post>, BlogClientError> {
        let url = self.url(&format!("/api/posts/{}/related", slug));
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit.to_string()), ("fallback", fallback.to_string())])
            .send()
            .await?;
        let body: PostsResponse = self.handle_response(response).await?;
        Ok(body.posts)
    }

    pub async fn categories(&self) -> Result<Vec<CategoryWithCount>, BlogClientError> {
        let url = self.url("/api/categories");
        let response = self.client.get(&url).send().await?;
        let body: CategoriesResponse = self.handle_response(response).await?;
        Ok(body.categories)
    }

    pub async fn category(&self, slug: &str) -> Result<CategoryResponse, BlogClientError> {
        let url = self.url(&format!("/api/categories/{}", slug));
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    pub async fn popular_tags(&self, limit: usize) -> Result<Vec<String>, BlogClientError> {
        let url = self.url("/api/tags/popular");
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .await?;
        let body: TagsResponse = self.handle_response(response).await?;
        Ok(body.tags)
    }

    pub async fn comments(&self, post_id: &str) -> Result<Vec<Comment>, BlogClientError> {
        let url = self.url("/api/comments");
        let response = self
            .client
            .get(&url)
            .query(&[("postId", post_id)])
            .send()
            .await?;
        let body: CommentsResponse = self.handle_response(response).await?;
        Ok(body.comments)
    }

    pub async fn create_comment(&self, comment: &NewComment) -> Result<Comment, BlogClientError> {
        let url = self.url("/api/comments");
        let response = self
            .add_auth_header(self.client.post(&url))
            .json(comment)
            .send()
            .await?;
        let body: CommentResponse = self.handle_response(response).await?;
        Ok(body.comment)
    }

    pub async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        content: &str,
    ) -> Result<Comment, BlogClientError> {
        let url = self.url("/api/comments");
        let request = UpdateCommentRequest {
            post_id,
            comment_id,
            content,
        };

        let response = self
            .add_auth_header(self.client.put(&url))
            .json(&request)
            .send()
            .await?;
        let body: CommentResponse = self.handle_response(response).await?;
        Ok(body.comment)
    }

    pub async fn delete_comment(
        &self,
        post_id: &str,
        comment_id: &str,
    ) -> Result<(), BlogClientError> {
        let url = self.url("/api/comments");
        let response = self
            .add_auth_header(self.client.delete(&url))
            .query(&[("postId", post_id), ("commentId", comment_id)])
            .send()
            .await?;
        let _: serde_json::Value = self.handle_response(response).await?;
        Ok(())
    }

    pub async fn like_state(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> Result<LikeState, BlogClientError> {
        let url = self.url("/api/likes");
        let response = self
            .client
            .get(&url)
            .query(&[("postId", post_id), ("userId", user_id)])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Toggles a like. Without a token the anonymous `user_id` identifies the reader.
    pub async fn toggle_like(
        &self,
        post_id: &str,
        user_id: Option<&str>,
    ) -> Result<LikeState, BlogClientError> {
        let url = self.url("/api/likes");
        let request = ToggleLikeRequest { post_id, user_id };

        let response = self
            .add_auth_header(self.client.post(&url))
            .json(&request)
            .send()
            .await?;
        self.handle_response(response).await
    }
}
