pub mod comment;
pub mod error;
pub mod like;
pub mod post;
pub mod user;

pub use error::DomainError;
pub use user::AuthenticatedUser;
