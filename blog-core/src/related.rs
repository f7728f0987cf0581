//! "More like this" ranking by category affinity and shared tags.

use std::collections::HashSet;

use crate::domain::Post;

const SAME_CATEGORY_SCORE: u32 = 10;
const SHARED_TAG_SCORE: u32 = 2;

/// How related `candidate` is to `reference`; zero means unrelated.
pub fn relatedness(reference: &Post, candidate: &Post) -> u32 {
    let category = if candidate.category.id == reference.category.id {
        SAME_CATEGORY_SCORE
    } else {
        0
    };
    category + SHARED_TAG_SCORE * reference.shared_tag_count(candidate) as u32
}

/// Posts related to `reference`, best first, never including `reference` itself.
///
/// With `fallback_to_latest` the list is topped up with the newest remaining
/// posts until it holds `limit` entries or the corpus runs out.
pub fn related_posts<'a, I>(
    reference: &Post,
    corpus: I,
    limit: usize,
    fallback_to_latest: bool,
) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut candidates: Vec<&'a Post> = Vec::new();
    for post in corpus {
        if post.id != reference.id && seen.insert(post.id.as_str()) {
            candidates.push(post);
        }
    }

    let mut scored: Vec<(u32, &Post)> = candidates
        .iter()
        .map(|post| (relatedness(reference, post), *post))
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .cmp(score_a)
            .then_with(|| b.published_at.cmp(&a.published_at))
    });

    let mut related: Vec<&Post> = scored
        .into_iter()
        .take(limit)
        .map(|(_, post)| post)
        .collect();

    if fallback_to_latest && related.len() < limit {
        let mut latest = candidates;
        latest.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        for post in latest {
            if related.len() >= limit {
                break;
            }
            if !related.iter().any(|r| r.id == post.id) {
                related.push(post);
            }
        }
    }

    tracing::debug!(
        "Related posts for {}: {} of {} requested",
        reference.slug,
        related.len(),
        limit
    );
    related
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{category, post};

    fn ids(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn ranks_by_category_then_tags() {
        let frontend = category("cat-fe", "frontend");
        let backend = category("cat-be", "backend");
        let a = post("A", "a", &frontend, &["react", "hooks"], 1);
        let b = post("B", "b", &frontend, &["react"], 2);
        let c = post("C", "c", &backend, &["hooks"], 3);

        assert_eq!(relatedness(&a, &b), 12);
        assert_eq!(relatedness(&a, &c), 2);

        let corpus = vec![a.clone(), b, c];
        assert_eq!(ids(&related_posts(&a, &corpus, 2, false)), vec!["B", "C"]);
    }

    #[test]
    fn unrelated_posts_only_appear_as_fallback() {
        let frontend = category("cat-fe", "frontend");
        let backend = category("cat-be", "backend");
        let reference = post("ref", "ref", &frontend, &["react"], 1);
        let corpus = vec![
            reference.clone(),
            post("same-cat", "same-cat", &frontend, &[], 2),
            post("old", "old", &backend, &["rust"], 3),
            post("new", "new", &backend, &["go"], 9),
        ];

        assert_eq!(
            ids(&related_posts(&reference, &corpus, 3, false)),
            vec!["same-cat"]
        );
        assert_eq!(
            ids(&related_posts(&reference, &corpus, 3, true)),
            vec!["same-cat", "new", "old"]
        );
    }

    #[test]
    fn fallback_fills_exactly_to_limit_without_duplicates() {
        let frontend = category("cat-fe", "frontend");
        let backend = category("cat-be", "backend");
        let reference = post("0", "zero", &frontend, &["react"], 1);
        let mut corpus = vec![reference.clone()];
        for day in 2..=8 {
            let cat = if day % 2 == 0 { &frontend } else { &backend };
            corpus.push(post(&day.to_string(), &format!("p{}", day), cat, &[], day));
        }

        for limit in 0..=7 {
            let related = related_posts(&reference, &corpus, limit, true);
            assert_eq!(related.len(), limit);
            assert!(related.iter().all(|p| p.id != reference.id));
            let unique: HashSet<&str> = related.iter().map(|p| p.id.as_str()).collect();
            assert_eq!(unique.len(), related.len());
        }
    }

    #[test]
    fn scored_ties_prefer_newer_posts() {
        let frontend = category("cat-fe", "frontend");
        let reference = post("ref", "ref", &frontend, &[], 1);
        let corpus = vec![
            post("older", "older", &frontend, &[], 2),
            post("newer", "newer", &frontend, &[], 5),
        ];

        assert_eq!(
            ids(&related_posts(&reference, &corpus, 5, false)),
            vec!["newer", "older"]
        );
    }
}
