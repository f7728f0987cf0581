//! Blog core: the post collection, search and ranking over it, and the locally
//! persisted reader state (comments, likes, identity, recent searches).
//!
//! Nothing here depends on an async runtime, so the same code runs inside the
//! actix-web server, the command line client and the browser build.

pub mod auth_error;
pub mod content;
pub mod domain;
pub mod interaction;
pub mod query;
pub mod related;
pub mod relative_time;
pub mod storage;

pub use auth_error::{classify, retry_delay, AuthError, AuthErrorKind, RawAuthError, Severity};
pub use content::{ContentError, ContentStore};
pub use domain::{
    Author, Category, CategoryRef, CategoryWithCount, Comment, CommentDraft, CommentStatus, Post,
    PostStatus, ValidationError,
};
pub use interaction::{
    get_or_create_user_id, CommentError, CommentStore, LikeError, LikeState, LikeStore,
    RecentSearches,
};
pub use query::{
    filter_by_category, highlight, page_number_window, paginate, search, sort_posts, Page,
    Pagination, Segment, SortMode,
};
pub use related::related_posts;
pub use relative_time::format_relative;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{TimeZone, Utc};

    use crate::domain::{Author, Category, CategoryRef, Post, PostStatus};

    pub fn category(id: &str, slug: &str) -> Category {
        Category {
            id: id.to_string(),
            slug: slug.to_string(),
            name: slug.to_string(),
            description: String::new(),
            color: None,
        }
    }

    /// A published post dated 2024-01-`day`.
    pub fn post(id: &str, slug: &str, category: &Category, tags: &[&str], day: u32) -> Post {
        let published_at = Utc
            .with_ymd_and_hms(2024, 1, day, 9, 0, 0)
            .single()
            .unwrap();

        Post {
            id: id.to_string(),
            slug: slug.to_string(),
            title: format!("Post {}", id),
            excerpt: String::new(),
            content: String::new(),
            category: CategoryRef::from(category),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: Author {
                name: "Kim".to_string(),
                avatar: None,
                bio: None,
            },
            published_at,
            updated_at: published_at,
            status: PostStatus::Published,
            view_count: 0,
            like_count: 0,
            featured: false,
            reading_time: 1,
        }
    }
}
