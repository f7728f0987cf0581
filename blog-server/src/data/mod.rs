pub mod comment_repository;
pub mod content_repository;
pub mod like_repository;

pub use comment_repository::{CommentRepository, StoredCommentRepository};
pub use content_repository::{ContentRepository, InMemoryContentRepository};
pub use like_repository::{LikeRepository, StoredLikeRepository};
