use crate::data::ContentRepository;
use crate::domain::post::{
    PostListQuery, PostListResponse, DEFAULT_PAGE_SIZE, DEFAULT_POPULAR_TAGS,
    DEFAULT_RELATED_LIMIT, MAX_PAGE_SIZE,
};
use crate::domain::DomainError;
use blog_core::query::{
    filter_by_category, page_number_window, paginate, search, sort_posts, SortMode,
};
use blog_core::{related_posts, Category, CategoryWithCount, Post};
use std::sync::Arc;

pub struct BlogService {
    content_repo: Arc<dyn ContentRepository + Send + Sync>,
}

impl BlogService {
    pub fn new(content_repo: Arc<dyn ContentRepository + Send + Sync>) -> Self {
        Self { content_repo }
    }

    /// Search (when `q` is given), category filter, sort, then one page.
    pub async fn list_posts(&self, query: PostListQuery) -> Result<PostListResponse, DomainError> {
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(DomainError::ValidationError(format!(
                "pageSize must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let search_term = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());

        let mode = match query.sort.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(sort) => sort.parse::<SortMode>()?,
            None if search_term.is_some() => SortMode::Relevance,
            None => SortMode::Latest,
        };

        let corpus = self.content_repo.published_posts().await?;
        let matched: Vec<&Post> = match search_term {
            Some(term) => search(term, &corpus),
            None => corpus.iter().collect(),
        };
        let mut posts = filter_by_category(matched, query.category.as_deref());
        sort_posts(&mut posts, mode);

        let page = paginate(&posts, page_size, query.page.unwrap_or(1));
        let page_numbers =
            page_number_window(page.pagination.current_page, page.pagination.total_pages);

        tracing::debug!(
            "Listed posts: q={:?}, category={:?}, sort={}, page {}/{} ({} total)",
            search_term,
            query.category,
            mode,
            page.pagination.current_page,
            page.pagination.total_pages,
            page.pagination.total_items
        );

        Ok(PostListResponse {
            posts: page.items.into_iter().cloned().collect(),
            pagination: page.pagination,
            page_numbers,
        })
    }

    pub async fn get_post(&self, slug: &str) -> Result<Post, DomainError> {
        self.content_repo.find_by_slug(slug).await
    }

    pub async fn get_post_by_id(&self, id: &str) -> Result<Post, DomainError> {
        self.content_repo.find_by_id(id).await
    }

    pub async fn related_posts(
        &self,
        slug: &str,
        limit: Option<usize>,
        fallback: Option<bool>,
    ) -> Result<Vec<Post>, DomainError> {
        let reference = self.content_repo.find_by_slug(slug).await?;
        let corpus = self.content_repo.published_posts().await?;

        let related = related_posts(
            &reference,
            &corpus,
            limit.unwrap_or(DEFAULT_RELATED_LIMIT),
            fallback.unwrap_or(true),
        );
        Ok(related.into_iter().cloned().collect())
    }

    pub async fn categories(&self) -> Result<Vec<CategoryWithCount>, DomainError> {
        self.content_repo.categories_with_count().await
    }

    pub async fn category(&self, slug: &str) -> Result<(Category, Vec<Post>), DomainError> {
        self.content_repo.find_category(slug).await
    }

    pub async fn popular_tags(&self, limit: Option<usize>) -> Result<Vec<String>, DomainError> {
        self.content_repo
            .popular_tags(limit.unwrap_or(DEFAULT_POPULAR_TAGS))
            .await
    }
}
