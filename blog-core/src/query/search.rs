use crate::domain::Post;

/// Category filter value that disables filtering.
pub const ALL_CATEGORIES: &str = "all";

const TITLE_WEIGHT: u32 = 10;
const TAG_WEIGHT: u32 = 5;
const EXCERPT_WEIGHT: u32 = 3;
const MAX_CONTENT_HITS: usize = 3;

/// Relevance of `post` for an already lowercased, non-empty `needle`.
///
/// Zero means the post does not match at all.
pub fn search_score(post: &Post, needle: &str) -> u32 {
    let mut score = 0;

    if post.title.to_lowercase().contains(needle) {
        score += TITLE_WEIGHT;
    }
    if post
        .tags
        .iter()
        .any(|tag| tag.to_lowercase().contains(needle))
    {
        score += TAG_WEIGHT;
    }
    if post.excerpt.to_lowercase().contains(needle) {
        score += EXCERPT_WEIGHT;
    }

    let content_hits = post
        .content
        .to_lowercase()
        .matches(needle)
        .take(MAX_CONTENT_HITS)
        .count();
    score + content_hits as u32
}

/// Case-insensitive search over title, excerpt, content and tags.
///
/// Best match first; equal scores keep the newest post first. A blank query
/// matches nothing.
pub fn search<'a, I>(query: &str, corpus: I) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<(u32, &Post)> = corpus
        .into_iter()
        .map(|post| (search_score(post, &needle), post))
        .filter(|(score, _)| *score > 0)
        .collect();

    hits.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .cmp(score_a)
            .then_with(|| b.published_at.cmp(&a.published_at))
    });

    tracing::debug!("Search '{}' matched {} posts", needle, hits.len());
    hits.into_iter().map(|(_, post)| post).collect()
}

/// Keeps posts whose category slug equals `category`. `None`, `""` and `"all"`
/// keep everything.
pub fn filter_by_category<'a>(posts: Vec<&'a Post>, category: Option<&str>) -> Vec<&'a Post> {
    match category.map(str::trim) {
        None | Some("") | Some(ALL_CATEGORIES) => posts,
        Some(slug) => posts
            .into_iter()
            .filter(|post| post.category.slug == slug)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{category, post};

    fn ids(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn title_match_outranks_tag_match() {
        let frontend = category("cat-fe", "frontend");
        let mut x = post("x", "x", &frontend, &["hooks"], 1);
        x.title = "Getting started with React".to_string();
        let y = post("y", "y", &frontend, &["react"], 2);
        let z = post("z", "z", &frontend, &["rust"], 3);
        let corpus = vec![y, z, x];

        let result = search("React", &corpus);

        assert_eq!(ids(&result), vec!["x", "y"]);
    }

    #[test]
    fn blank_query_matches_nothing() {
        let frontend = category("cat-fe", "frontend");
        let corpus = vec![post("1", "one", &frontend, &["react"], 1)];

        assert!(search("", &corpus).is_empty());
        assert!(search("   ", &corpus).is_empty());
    }

    #[test]
    fn content_occurrences_are_capped() {
        let frontend = category("cat-fe", "frontend");
        let mut post = post("1", "one", &frontend, &[], 1);
        post.content = "cache cache cache cache cache".to_string();

        assert_eq!(search_score(&post, "cache"), 3);
        post.excerpt = "About the cache".to_string();
        assert_eq!(search_score(&post, "cache"), 6);
    }

    #[test]
    fn ties_are_newest_first_and_scores_never_increase() {
        let frontend = category("cat-fe", "frontend");
        let mut older = post("old", "old", &frontend, &["api"], 1);
        older.excerpt = "api design".to_string();
        let mut newer = post("new", "new", &frontend, &["api"], 5);
        newer.excerpt = "api design".to_string();
        let mut best = post("best", "best", &frontend, &[], 2);
        best.title = "API handbook".to_string();
        best.content = "api api".to_string();
        let corpus = vec![older, best, newer];

        let result = search("api", &corpus);
        assert_eq!(ids(&result), vec!["best", "new", "old"]);

        let scores: Vec<u32> = result.iter().map(|p| search_score(p, "api")).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn category_filter_treats_all_and_empty_as_no_filter() {
        let frontend = category("cat-fe", "frontend");
        let backend = category("cat-be", "backend");
        let corpus = vec![
            post("1", "one", &frontend, &[], 1),
            post("2", "two", &backend, &[], 2),
        ];
        let all: Vec<&Post> = corpus.iter().collect();

        assert_eq!(filter_by_category(all.clone(), None).len(), 2);
        assert_eq!(filter_by_category(all.clone(), Some("")).len(), 2);
        assert_eq!(filter_by_category(all.clone(), Some("all")).len(), 2);
        assert_eq!(ids(&filter_by_category(all.clone(), Some("backend"))), vec!["2"]);
        assert!(filter_by_category(all, Some("career")).is_empty());
    }
}
