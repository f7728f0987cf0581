pub mod category;
pub mod comment;
pub mod post;

pub use category::{Category, CategoryWithCount};
pub use comment::{Comment, CommentDraft, CommentStatus, ValidationError};
pub use post::{Author, CategoryRef, Post, PostStatus};

use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Builds a client-side identifier of the form `<prefix>-<unix millis>-<base36 suffix>`.
///
/// Not globally unique, but two ids generated in the same millisecond collide
/// only if the 9-character random suffix matches as well.
pub fn local_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();

    format!(
        "{}-{}-{}",
        prefix,
        chrono::Utc::now().timestamp_millis(),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_id_has_prefix_time_and_suffix() {
        let id = local_id("comment");
        let parts: Vec<&str> = id.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "comment");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn local_ids_differ() {
        assert_ne!(local_id("user"), local_id("user"));
    }
}
