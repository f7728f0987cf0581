use crate::domain::DomainError;
use async_trait::async_trait;
use blog_core::{Category, CategoryWithCount, ContentStore, Post};

/// Read access to published content. Drafts never leave the repository.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn published_posts(&self) -> Result<Vec<Post>, DomainError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: &str) -> Result<Post, DomainError>;
    async fn categories_with_count(&self) -> Result<Vec<CategoryWithCount>, DomainError>;
    async fn find_category(&self, slug: &str) -> Result<(Category, Vec<Post>), DomainError>;
    async fn popular_tags(&self, limit: usize) -> Result<Vec<String>, DomainError>;
}

pub struct InMemoryContentRepository {
    store: ContentStore,
}

impl InMemoryContentRepository {
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn published_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.store.corpus())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Post, DomainError> {
        self.store
            .post_by_slug(slug)
            .cloned()
            .ok_or(DomainError::PostNotFound)
    }

    async fn find_by_id(&self, id: &str) -> Result<Post, DomainError> {
        self.store
            .post_by_id(id)
            .cloned()
            .ok_or(DomainError::PostNotFound)
    }

    async fn categories_with_count(&self) -> Result<Vec<CategoryWithCount>, DomainError> {
        Ok(self.store.categories_with_count())
    }

    async fn find_category(&self, slug: &str) -> Result<(Category, Vec<Post>), DomainError> {
        let category = self
            .store
            .category_by_slug(slug)
            .cloned()
            .ok_or(DomainError::CategoryNotFound)?;
        let posts = self
            .store
            .posts_by_category(slug)
            .into_iter()
            .cloned()
            .collect();

        Ok((category, posts))
    }

    async fn popular_tags(&self, limit: usize) -> Result<Vec<String>, DomainError> {
        Ok(self.store.popular_tags(limit))
    }
}
