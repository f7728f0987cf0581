use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Post;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Newest first.
    #[default]
    Latest,
    /// Oldest first.
    Oldest,
    /// Most viewed first.
    Popular,
    /// Keep the incoming order, which search already ranked.
    Relevance,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sort mode '{0}' (expected latest, newest, oldest, popular, views or relevance)")]
pub struct UnknownSortMode(pub String);

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Latest => "latest",
            SortMode::Oldest => "oldest",
            SortMode::Popular => "popular",
            SortMode::Relevance => "relevance",
        }
    }
}

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "latest" | "newest" => Ok(SortMode::Latest),
            "oldest" => Ok(SortMode::Oldest),
            "popular" | "views" => Ok(SortMode::Popular),
            "relevance" => Ok(SortMode::Relevance),
            _ => Err(UnknownSortMode(value.to_string())),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orders posts in place. The sort is stable, so equal keys keep their input order.
pub fn sort_posts(posts: &mut [&Post], mode: SortMode) {
    match mode {
        SortMode::Latest => posts.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
        SortMode::Oldest => posts.sort_by(|a, b| a.published_at.cmp(&b.published_at)),
        SortMode::Popular => posts.sort_by(|a, b| b.view_count.cmp(&a.view_count)),
        SortMode::Relevance => {}
    }
}
