use serde::{Deserialize, Serialize};

/// A piece of text that either matched the search term or sits between matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

impl Segment {
    fn new(text: &str, matched: bool) -> Self {
        Self {
            text: text.to_string(),
            matched,
        }
    }
}

/// Byte length of the prefix of `haystack` that equals `needle` ignoring case.
fn prefix_match(haystack: &str, needle: &[char]) -> Option<usize> {
    let mut chars = haystack.char_indices();
    for expected in needle {
        let (_, c) = chars.next()?;
        if !c.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(chars.next().map_or(haystack.len(), |(i, _)| i))
}

/// Splits `text` around case-insensitive occurrences of `term`, keeping the
/// original casing. Concatenating the segments gives back `text`.
pub fn highlight(text: &str, term: &str) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }

    let needle: Vec<char> = term.trim().chars().collect();
    if needle.is_empty() {
        return vec![Segment::new(text, false)];
    }

    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < text.len() {
        match prefix_match(&text[pos..], &needle) {
            Some(len) => {
                if plain_start < pos {
                    segments.push(Segment::new(&text[plain_start..pos], false));
                }
                segments.push(Segment::new(&text[pos..pos + len], true));
                pos += len;
                plain_start = pos;
            }
            None => {
                pos += text[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if plain_start < text.len() {
        segments.push(Segment::new(&text[plain_start..], false));
    }
    segments
}
