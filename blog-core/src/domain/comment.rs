use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_COMMENT_LENGTH: usize = 5;
pub const MAX_COMMENT_LENGTH: usize = 1000;
pub const MIN_AUTHOR_NAME_LENGTH: usize = 2;

const ANONYMOUS_AUTHOR: &str = "Anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[default]
    Approved,
    Pending,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_image_url: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: CommentStatus,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub dislike_count: u32,
    #[serde(default)]
    pub report_count: u32,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_author: bool,
}

impl Comment {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Post id is required")]
    MissingPostId,

    #[error("Comment content is required")]
    MissingContent,

    #[error("Comment must be at least {min} characters (got {actual})")]
    ContentTooShort { min: usize, actual: usize },

    #[error("Comment must be at most {max} characters (got {actual})")]
    ContentTooLong { max: usize, actual: usize },

    #[error("Author name must be at least {min} characters")]
    AuthorNameTooShort { min: usize },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

/// Checks comment content against the length bounds and returns it trimmed.
pub fn validate_content(content: &str) -> Result<String, ValidationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingContent);
    }

    let length = trimmed.chars().count();
    if length < MIN_COMMENT_LENGTH {
        return Err(ValidationError::ContentTooShort {
            min: MIN_COMMENT_LENGTH,
            actual: length,
        });
    }
    if length > MAX_COMMENT_LENGTH {
        return Err(ValidationError::ContentTooLong {
            max: MAX_COMMENT_LENGTH,
            actual: length,
        });
    }

    Ok(trimmed.to_string())
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

/// Unvalidated comment input, as submitted by a form or an API request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    pub post_id: String,
    pub content: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default)]
    pub author_image_url: Option<String>,
}

impl CommentDraft {
    pub fn new(post_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Validates the draft and turns it into an approved comment with a fresh id.
    pub fn into_comment(self, now: DateTime<Utc>) -> Result<Comment, ValidationError> {
        let post_id = self.post_id.trim().to_string();
        if post_id.is_empty() {
            return Err(ValidationError::MissingPostId);
        }

        let content = validate_content(&self.content)?;

        let author_name = match non_blank(self.author_name) {
            Some(name) if name.chars().count() < MIN_AUTHOR_NAME_LENGTH => {
                return Err(ValidationError::AuthorNameTooShort {
                    min: MIN_AUTHOR_NAME_LENGTH,
                })
            }
            Some(name) => name,
            None => ANONYMOUS_AUTHOR.to_string(),
        };

        let author_email = non_blank(self.author_email);
        if let Some(email) = &author_email {
            if !looks_like_email(email) {
                return Err(ValidationError::InvalidEmail(email.clone()));
            }
        }

        Ok(Comment {
            id: super::local_id("comment"),
            post_id,
            user_id: non_blank(self.user_id),
            author_name,
            author_email,
            author_image_url: non_blank(self.author_image_url),
            content,
            created_at: now,
            updated_at: None,
            status: CommentStatus::Approved,
            like_count: 0,
            dislike_count: 0,
            report_count: 0,
            is_edited: false,
            is_pinned: false,
            is_author: false,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(content: &str) -> CommentDraft {
        CommentDraft::new("post-1", content)
    }

    #[test]
    fn content_length_boundaries() {
        let now = Utc::now();

        assert!(matches!(
            draft(&"a".repeat(4)).into_comment(now),
            Err(ValidationError::ContentTooShort { actual: 4, .. })
        ));
        assert!(draft(&"a".repeat(5)).into_comment(now).is_ok());
        assert!(draft(&"a".repeat(1000)).into_comment(now).is_ok());
        assert!(matches!(
            draft(&"a".repeat(1001)).into_comment(now),
            Err(ValidationError::ContentTooLong { actual: 1001, .. })
        ));
    }

    #[test]
    fn short_greeting_is_rejected_and_hello_accepted() {
        let now = Utc::now();

        assert!(draft("hi").into_comment(now).is_err());

        let comment = draft("hello").into_comment(now).unwrap();
        assert_eq!(comment.content, "hello");
        assert_eq!(comment.status, CommentStatus::Approved);
        assert!(!comment.is_edited);
        assert_eq!(comment.like_count, 0);
    }

    #[test]
    fn length_is_measured_after_trimming() {
        let now = Utc::now();

        assert!(draft("   abcd   ").into_comment(now).is_err());
        let comment = draft("  abcde \n").into_comment(now).unwrap();
        assert_eq!(comment.content, "abcde");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // five Hangul syllables are 15 bytes
        assert!(validate_content("안녕하세요").is_ok());
    }

    #[test]
    fn post_id_and_content_are_mandatory() {
        let now = Utc::now();

        assert_eq!(
            CommentDraft::new("  ", "hello world").into_comment(now),
            Err(ValidationError::MissingPostId)
        );
        assert_eq!(
            draft("   ").into_comment(now),
            Err(ValidationError::MissingContent)
        );
    }

    #[test]
    fn author_fields_are_checked_when_present() {
        let now = Utc::now();

        let mut short_name = draft("hello world");
        short_name.author_name = Some(" J ".to_string());
        assert!(matches!(
            short_name.into_comment(now),
            Err(ValidationError::AuthorNameTooShort { .. })
        ));

        let mut bad_email = draft("hello world");
        bad_email.author_email = Some("not-an-email".to_string());
        assert!(matches!(
            bad_email.into_comment(now),
            Err(ValidationError::InvalidEmail(_))
        ));

        let mut ok = draft("hello world");
        ok.author_name = Some("Jo".to_string());
        ok.author_email = Some("jo@example.com".to_string());
        ok.author_image_url = Some("   ".to_string());
        let comment = ok.into_comment(now).unwrap();
        assert_eq!(comment.author_name, "Jo");
        assert_eq!(comment.author_email.as_deref(), Some("jo@example.com"));
        assert_eq!(comment.author_image_url, None);
    }

    #[test]
    fn blank_author_name_falls_back_to_anonymous() {
        let comment = draft("hello world").into_comment(Utc::now()).unwrap();
        assert_eq!(comment.author_name, ANONYMOUS_AUTHOR);
        assert_eq!(comment.user_id, None);
    }

    #[test]
    fn ownership_requires_matching_user() {
        let mut with_user = draft("hello world");
        with_user.user_id = Some("user_1".to_string());
        let comment = with_user.into_comment(Utc::now()).unwrap();

        assert!(comment.is_owned_by("user_1"));
        assert!(!comment.is_owned_by("user_2"));

        let anonymous = draft("hello world").into_comment(Utc::now()).unwrap();
        assert!(!anonymous.is_owned_by("user_1"));
    }

    #[test]
    fn comment_serializes_with_camel_case_keys() {
        let comment = draft("hello world").into_comment(Utc::now()).unwrap();
        let json = serde_json::to_value(&comment).unwrap();

        assert_eq!(json["postId"], "post-1");
        assert_eq!(json["status"], "approved");
        assert_eq!(json["isEdited"], false);
        assert!(json.get("userId").is_none());
    }
}
