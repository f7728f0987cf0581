use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::post::reading_time;
use crate::domain::{Author, Category, CategoryRef, Post, PostStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    pub categories: Vec<Category>,
    pub posts: Vec<PostSeed>,
}

/// A post as written in the seed file: the category is given by slug and the
/// reading time is derived rather than stored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSeed {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Author,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default = "published")]
    pub status: PostStatus,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub featured: bool,
}

fn published() -> PostStatus {
    PostStatus::Published
}

impl PostSeed {
    pub fn into_post(self, category: CategoryRef) -> Post {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
                tags.push(tag);
            }
        }

        Post {
            reading_time: reading_time(&self.content),
            id: self.id,
            slug: self.slug,
            title: self.title,
            excerpt: self.excerpt,
            content: self.content,
            category,
            tags,
            author: self.author,
            updated_at: self.updated_at.unwrap_or(self.published_at),
            published_at: self.published_at,
            status: self.status,
            view_count: self.view_count,
            like_count: self.like_count,
            featured: self.featured,
        }
    }
}
