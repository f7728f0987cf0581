//! The same reads and writes as the server API, answered from the bundled
//! content and the local state directory.

use anyhow::{anyhow, bail, Context, Result};
use blog_client::models::{CategoryResponse, ListPostsParams, PostListResponse};
use blog_core::{
    filter_by_category, page_number_window, paginate, related_posts, search, sort_posts,
    CategoryWithCount, Comment, CommentDraft, CommentStore, ContentStore, KeyValueStorage,
    LikeState, LikeStore, Post, SortMode,
};
use std::sync::Arc;

const MAX_PAGE_SIZE: usize = 100;

pub struct LocalBlog {
    content: ContentStore,
    comments: CommentStore,
    likes: LikeStore,
    user_id: String,
}

impl LocalBlog {
    pub fn new(storage: Arc<dyn KeyValueStorage>, user_id: String) -> Result<Self> {
        let content = ContentStore::seeded().context("Failed to load bundled content")?;

        Ok(Self {
            content,
            comments: CommentStore::new(storage.clone()),
            likes: LikeStore::new(storage),
            user_id,
        })
    }

    pub fn list_posts(&self, params: &ListPostsParams) -> Result<PostListResponse> {
        let page_size = params.page_size.unwrap_or(10);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            bail!("page size must be between 1 and {}", MAX_PAGE_SIZE);
        }

        let term = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
        let mode = match params.sort.as_deref() {
            Some(sort) => sort.parse::<SortMode>()?,
            None if term.is_some() => SortMode::Relevance,
            None => SortMode::Latest,
        };

        let corpus = self.content.corpus();
        let matched: Vec<&Post> = match term {
            Some(term) => search(term, &corpus),
            None => corpus.iter().collect(),
        };
        let mut posts = filter_by_category(matched, params.category.as_deref());
        sort_posts(&mut posts, mode);

        let page = paginate(&posts, page_size, params.page.unwrap_or(1));
        let page_numbers =
            page_number_window(page.pagination.current_page, page.pagination.total_pages);

        Ok(PostListResponse {
            posts: page.items.into_iter().cloned().collect(),
            pagination: page.pagination,
            page_numbers,
        })
    }

    pub fn get_post(&self, slug: &str) -> Result<Post> {
        self.content
            .post_by_slug(slug)
            .cloned()
            .ok_or_else(|| anyhow!("Post '{}' not found", slug))
    }

    pub fn related_posts(&self, slug: &str, limit: usize, fallback: bool) -> Result<Vec<Post>> {
        let reference = self.get_post(slug)?;
        let corpus = self.content.corpus();

        Ok(related_posts(&reference, &corpus, limit, fallback)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn categories(&self) -> Vec<CategoryWithCount> {
        self.content.categories_with_count()
    }

    pub fn category(&self, slug: &str) -> Result<CategoryResponse> {
        let category = self
            .content
            .category_by_slug(slug)
            .cloned()
            .ok_or_else(|| anyhow!("Category '{}' not found", slug))?;
        let posts = self
            .content
            .posts_by_category(slug)
            .into_iter()
            .cloned()
            .collect();

        Ok(CategoryResponse { category, posts })
    }

    pub fn popular_tags(&self, limit: usize) -> Vec<String> {
        self.content.popular_tags(limit)
    }

    pub fn comments(&self, post_id: &str) -> Vec<Comment> {
        self.comments.list(post_id)
    }

    pub fn add_comment(
        &self,
        post_id: &str,
        content: &str,
        author_name: Option<String>,
    ) -> Result<Comment> {
        let draft = CommentDraft {
            user_id: Some(self.user_id.clone()),
            author_name,
            ..CommentDraft::new(post_id, content)
        };
        let comment = draft.into_comment(chrono::Utc::now())?;
        Ok(self.comments.add(post_id, comment)?)
    }

    pub fn edit_comment(&self, post_id: &str, comment_id: &str, content: &str) -> Result<Comment> {
        self.check_owner(post_id, comment_id)?;
        let content = blog_core::domain::comment::validate_content(content)?;
        Ok(self
            .comments
            .update(post_id, comment_id, &content, chrono::Utc::now())?)
    }

    pub fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<()> {
        self.check_owner(post_id, comment_id)?;
        Ok(self.comments.remove(post_id, comment_id)?)
    }

    pub fn like_state(&self, post_id: &str) -> Result<LikeState> {
        let post = self.require_post(post_id)?;
        Ok(self.likes.state(&post.id, &self.user_id, post.like_count))
    }

    pub fn toggle_like(&self, post_id: &str) -> Result<LikeState> {
        let post = self.require_post(post_id)?;
        Ok(self.likes.toggle(&post.id, &self.user_id, post.like_count)?)
    }

    fn require_post(&self, post_id: &str) -> Result<&Post> {
        self.content
            .post_by_id(post_id)
            .ok_or_else(|| anyhow!("Post '{}' not found", post_id))
    }

    fn check_owner(&self, post_id: &str, comment_id: &str) -> Result<()> {
        let comment = self
            .comments
            .find(post_id, comment_id)
            .ok_or_else(|| anyhow!("Comment '{}' not found", comment_id))?;
        if !comment.is_owned_by(&self.user_id) {
            bail!("Comment '{}' belongs to someone else", comment_id);
        }
        Ok(())
    }
}
