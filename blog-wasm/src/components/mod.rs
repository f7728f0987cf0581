mod comments;
mod like_button;
mod post_list;
mod post_view;
mod search;

pub use comments::CommentSection;
pub use like_button::LikeButton;
pub use post_list::PostList;
pub use post_view::PostView;
pub use search::SearchDialog;

use blog_core::{highlight, Post};
use yew::prelude::*;

/// `text` with every case-insensitive occurrence of `term` wrapped in `<mark>`.
pub fn highlighted(text: &str, term: &str) -> Html {
    highlight(text, term)
        .into_iter()
        .map(|segment| {
            if segment.matched {
                html! { <mark>{ segment.text }</mark> }
            } else {
                html! { { segment.text } }
            }
        })
        .collect()
}

pub fn post_meta(post: &Post) -> String {
    format!(
        "{} · {} · {} min read",
        post.category.name,
        post.published_at.format("%b %-d, %Y"),
        post.reading_time
    )
}
