//! The in-memory post and category collection.
//!
//! Seeded once at start-up from JSON (the embedded seed or a file) and read-only
//! afterwards; queries borrow from it.

mod seed;

pub use seed::{PostSeed, SeedData};

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

use crate::domain::{Category, CategoryRef, CategoryWithCount, Post};

const EMBEDDED_SEED: &str = include_str!("../../content/seed.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read content file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse content: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate {kind} {value}")]
    Duplicate { kind: &'static str, value: String },

    #[error("Post {post} references unknown category {category}")]
    UnknownCategory { post: String, category: String },

    #[error("Post {0} was updated before it was published")]
    UpdatedBeforePublished(String),

    #[error("Invalid slug {0}")]
    InvalidSlug(String),
}

#[derive(Debug, Clone)]
pub struct ContentStore {
    posts: Vec<Post>,
    categories: Vec<Category>,
}

pub fn is_url_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl ContentStore {
    /// The content bundled with the crate.
    pub fn seeded() -> Result<Self, ContentError> {
        Self::from_json(EMBEDDED_SEED)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let seed: SeedData = serde_json::from_str(raw)?;
        Self::from_seed(seed)
    }

    pub fn from_seed(seed: SeedData) -> Result<Self, ContentError> {
        let mut category_slugs = HashSet::new();
        let mut category_ids = HashSet::new();
        for category in &seed.categories {
            if !is_url_safe_slug(&category.slug) {
                return Err(ContentError::InvalidSlug(category.slug.clone()));
            }
            if !category_slugs.insert(category.slug.as_str()) {
                return Err(ContentError::Duplicate {
                    kind: "category slug",
                    value: category.slug.clone(),
                });
            }
            if !category_ids.insert(category.id.as_str()) {
                return Err(ContentError::Duplicate {
                    kind: "category id",
                    value: category.id.clone(),
                });
            }
        }

        let by_slug: HashMap<&str, &Category> = seed
            .categories
            .iter()
            .map(|c| (c.slug.as_str(), c))
            .collect();

        let mut post_ids = HashSet::new();
        let mut post_slugs = HashSet::new();
        let mut posts = Vec::with_capacity(seed.posts.len());

        for entry in seed.posts {
            if !is_url_safe_slug(&entry.slug) {
                return Err(ContentError::InvalidSlug(entry.slug));
            }
            if !post_ids.insert(entry.id.clone()) {
                return Err(ContentError::Duplicate {
                    kind: "post id",
                    value: entry.id,
                });
            }
            if !post_slugs.insert(entry.slug.clone()) {
                return Err(ContentError::Duplicate {
                    kind: "post slug",
                    value: entry.slug,
                });
            }

            let category = by_slug.get(entry.category.as_str()).ok_or_else(|| {
                ContentError::UnknownCategory {
                    post: entry.slug.clone(),
                    category: entry.category.clone(),
                }
            })?;

            let post = entry.into_post(CategoryRef::from(*category));
            if post.updated_at < post.published_at {
                return Err(ContentError::UpdatedBeforePublished(post.slug));
            }
            posts.push(post);
        }

        tracing::info!(
            "Content loaded: {} posts, {} categories",
            posts.len(),
            seed.categories.len()
        );

        Ok(Self {
            posts,
            categories: seed.categories,
        })
    }

    /// Every post, drafts included.
    pub fn all_posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn published_posts(&self) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.is_published()).collect()
    }

    /// Published posts as an owned corpus, for the query and ranking functions.
    pub fn corpus(&self) -> Vec<Post> {
        self.posts
            .iter()
            .filter(|p| p.is_published())
            .cloned()
            .collect()
    }

    pub fn post_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts
            .iter()
            .find(|p| p.slug == slug && p.is_published())
    }

    pub fn post_by_id(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id && p.is_published())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Categories with their live published-post count.
    pub fn categories_with_count(&self) -> Vec<CategoryWithCount> {
        self.categories
            .iter()
            .map(|category| CategoryWithCount {
                category: category.clone(),
                post_count: self
                    .posts
                    .iter()
                    .filter(|p| p.is_published() && p.category.id == category.id)
                    .count(),
            })
            .collect()
    }

    /// Published posts in a category, newest first.
    pub fn posts_by_category(&self, slug: &str) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .iter()
            .filter(|p| p.is_published() && p.category.slug == slug)
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts
    }

    pub fn latest_posts(&self, limit: usize) -> Vec<&Post> {
        let mut posts = self.published_posts();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts.truncate(limit);
        posts
    }

    pub fn featured_posts(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .iter()
            .filter(|p| p.is_published() && p.featured)
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts
    }

    /// Most used tags across published posts; ties are ordered alphabetically.
    pub fn popular_tags(&self, limit: usize) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for post in self.posts.iter().filter(|p| p.is_published()) {
            for tag in &post.tags {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }

        let mut tags: Vec<(&str, usize)> = counts.into_iter().collect();
        // BTreeMap iteration is alphabetical and the sort is stable
        tags.sort_by(|a, b| b.1.cmp(&a.1));
        tags.into_iter()
            .take(limit)
            .map(|(tag, _)| tag.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{category, post};

    fn store() -> ContentStore {
        let frontend = category("cat-fe", "frontend");
        let backend = category("cat-be", "backend");
        let mut draft = post("4", "draft-post", &frontend, &["react"], 4);
        draft.status = crate::domain::PostStatus::Draft;

        ContentStore {
            posts: vec![
                post("1", "hooks", &frontend, &["react", "hooks"], 1),
                post("2", "state", &frontend, &["react"], 2),
                post("3", "rust-api", &backend, &["rust", "api"], 3),
                draft,
            ],
            categories: vec![frontend, backend],
        }
    }

    #[test]
    fn embedded_seed_is_valid() {
        let store = ContentStore::seeded().unwrap();

        assert!(!store.all_posts().is_empty());
        assert!(!store.categories().is_empty());
        for post in store.all_posts() {
            assert!(post.reading_time >= 1);
            assert!(post.updated_at >= post.published_at);
        }
    }

    #[test]
    fn category_counts_are_live_and_skip_drafts() {
        let counts = store().categories_with_count();

        assert_eq!(counts[0].category.slug, "frontend");
        assert_eq!(counts[0].post_count, 2);
        assert_eq!(counts[1].post_count, 1);
    }

    #[test]
    fn drafts_are_hidden_from_lookups() {
        let store = store();

        assert!(store.post_by_slug("draft-post").is_none());
        assert!(store.post_by_slug("hooks").is_some());
        assert_eq!(store.published_posts().len(), 3);
        assert_eq!(store.corpus().len(), 3);
    }

    #[test]
    fn latest_and_by_category_are_newest_first() {
        let store = store();

        let latest: Vec<&str> = store.latest_posts(2).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(latest, vec!["3", "2"]);

        let frontend: Vec<&str> = store
            .posts_by_category("frontend")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(frontend, vec!["2", "1"]);
    }

    #[test]
    fn popular_tags_by_frequency_then_name() {
        assert_eq!(store().popular_tags(3), vec!["react", "api", "hooks"]);
    }

    #[test]
    fn seed_validation_rejects_bad_references() {
        let raw = r#"{
            "categories": [{"id": "c1", "slug": "frontend", "name": "Frontend"}],
            "posts": [{
                "id": "p1", "slug": "a-post", "title": "A", "excerpt": "", "content": "",
                "category": "backend", "tags": [], "author": {"name": "Kim"},
                "publishedAt": "2024-01-01T00:00:00Z"
            }]
        }"#;

        assert!(matches!(
            ContentStore::from_json(raw),
            Err(ContentError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn seed_validation_rejects_duplicate_slugs() {
        let raw = r#"{
            "categories": [{"id": "c1", "slug": "frontend", "name": "Frontend"}],
            "posts": [
                {"id": "p1", "slug": "same", "title": "A", "excerpt": "", "content": "",
                 "category": "frontend", "author": {"name": "Kim"},
                 "publishedAt": "2024-01-01T00:00:00Z"},
                {"id": "p2", "slug": "same", "title": "B", "excerpt": "", "content": "",
                 "category": "frontend", "author": {"name": "Kim"},
                 "publishedAt": "2024-01-02T00:00:00Z"}
            ]
        }"#;

        assert!(matches!(
            ContentStore::from_json(raw),
            Err(ContentError::Duplicate { kind: "post slug", .. })
        ));
    }

    #[test]
    fn slugs_must_be_url_safe() {
        assert!(is_url_safe_slug("react-hooks-101"));
        assert!(!is_url_safe_slug("React Hooks"));
        assert!(!is_url_safe_slug("-leading"));
        assert!(!is_url_safe_slug(""));
    }
}
