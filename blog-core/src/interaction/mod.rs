//! State that follows a reader around: comments, likes, the anonymous
//! identity and recent searches. Everything here is persisted through a
//! [`KeyValueStorage`](crate::storage::KeyValueStorage) and partitioned by key,
//! so operations on different posts never touch the same entry.

pub mod comments;
pub mod identity;
pub mod likes;
pub mod recent;

pub use comments::{CommentError, CommentStore};
pub use identity::get_or_create_user_id;
pub use likes::{LikeError, LikeState, LikeStore};
pub use recent::RecentSearches;
