use crate::app::Route;
use crate::components::{post_meta, CommentSection, LikeButton};
use crate::services::{Services, RELATED_LIMIT};
use blog_core::related_posts;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub services: Services,
    pub slug: String,
}

pub struct PostView;

impl Component for PostView {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Props { services, slug } = ctx.props();

        let Some(post) = services.content.post_by_slug(slug) else {
            return html! {
                <div class="not-found">
                    <p>{ "Post not found." }</p>
                    <Link<Route> to={Route::Home}>{ "Back to all posts" }</Link<Route>>
                </div>
            };
        };

        let corpus = services.content.corpus();
        let related = related_posts(post, &corpus, RELATED_LIMIT, true);

        html! {
            <article class="post-view">
                <h2>{ &post.title }</h2>
                <small>{ format!("by {} · {}", post.author.name, post_meta(post)) }</small>
                <div class="tags">
                    { for post.tags.iter().map(|tag| html! { <span class="tag">{ tag }</span> }) }
                </div>

                { for post.content.split("\n\n").map(|paragraph| html! { <p>{ paragraph }</p> }) }

                <LikeButton
                    key={format!("like-{}", post.id)}
                    services={services.clone()}
                    post_id={post.id.clone()}
                    initial={post.like_count}
                />

                <CommentSection
                    key={format!("comments-{}", post.id)}
                    services={services.clone()}
                    post_id={post.id.clone()}
                />

                if !related.is_empty() {
                    <section class="related">
                        <h3>{ "Related posts" }</h3>
                        <ul>
                            { for related.iter().map(|post| html! {
                                <li key={post.id.clone()}>
                                    <Link<Route> to={Route::Post { slug: post.slug.clone() }}>
                                        { &post.title }
                                    </Link<Route>>
                                </li>
                            }) }
                        </ul>
                    </section>
                }
            </article>
        }
    }
}
