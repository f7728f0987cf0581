use crate::app::Route;
use crate::components::post_meta;
use crate::services::{listing, Services};
use blog_core::query::ALL_CATEGORIES;
use blog_core::{Pagination, Post, SortMode};
use web_sys::HtmlSelectElement;
use yew::prelude::*;
use yew_router::prelude::*;

const SORT_CHOICES: [(SortMode, &str); 3] = [
    (SortMode::Latest, "Newest"),
    (SortMode::Oldest, "Oldest"),
    (SortMode::Popular, "Most viewed"),
];

pub enum Msg {
    SetCategory(String),
    SetSort(SortMode),
    SetPage(usize),
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub services: Services,
}

pub struct PostList {
    category: String,
    sort: SortMode,
    page: usize,
}

impl Component for PostList {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            sort: ctx.props().services.sort_mode(),
            page: 1,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetCategory(category) => {
                self.category = category;
                self.page = 1;
            }
            Msg::SetSort(sort) => {
                ctx.props().services.save_sort_mode(sort);
                self.sort = sort;
                self.page = 1;
            }
            Msg::SetPage(page) => self.page = page,
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let services = &ctx.props().services;
        let corpus = services.content.corpus();
        let (page, numbers) = listing(&corpus, &self.category, self.sort, self.page);

        html! {
            <div class="posts-section">
                <div class="filters">
                    { self.view_category_select(ctx) }
                    { self.view_sort_select(ctx) }
                </div>

                <div class="posts-list">
                    { for page.items.iter().map(|post| self.view_post(post, services)) }
                </div>

                if page.items.is_empty() {
                    <p>{ "No posts in this category yet." }</p>
                }

                { self.view_pagination(ctx, &page.pagination, &numbers) }
            </div>
        }
    }
}

impl PostList {
    fn view_category_select(&self, ctx: &Context<Self>) -> Html {
        let categories = ctx.props().services.content.categories_with_count();
        let onchange = ctx.link().callback(|e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            Msg::SetCategory(select.value())
        });

        html! {
            <select {onchange}>
                <option value={ALL_CATEGORIES} selected={self.category == ALL_CATEGORIES}>
                    { "All categories" }
                </option>
                { for categories.iter().map(|entry| html! {
                    <option
                        value={entry.category.slug.clone()}
                        selected={self.category == entry.category.slug}
                    >
                        { format!("{} ({})", entry.category.name, entry.post_count) }
                    </option>
                }) }
            </select>
        }
    }

    fn view_sort_select(&self, ctx: &Context<Self>) -> Html {
        let onchange = ctx.link().batch_callback(|e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            select.value().parse::<SortMode>().ok().map(Msg::SetSort)
        });

        html! {
            <select {onchange}>
                { for SORT_CHOICES.iter().map(|(mode, label)| html! {
                    <option value={mode.as_str()} selected={*mode == self.sort}>
                        { *label }
                    </option>
                }) }
            </select>
        }
    }

    fn view_post(&self, post: &Post, services: &Services) -> Html {
        let likes = services.likes.total_likes(&post.id, post.like_count);

        html! {
            <div class="post" key={post.id.clone()}>
                <h3>
                    <Link<Route> to={Route::Post { slug: post.slug.clone() }}>
                        { &post.title }
                    </Link<Route>>
                </h3>
                <p>{ &post.excerpt }</p>
                <small>
                    { format!("{} · {} views · {} likes", post_meta(post), post.view_count, likes) }
                </small>
            </div>
        }
    }

    fn view_pagination(&self, ctx: &Context<Self>, pagination: &Pagination, numbers: &[usize]) -> Html {
        if pagination.total_pages <= 1 {
            return html! {};
        }

        let current = pagination.current_page;
        let prev = ctx.link().callback(move |_| Msg::SetPage(current.saturating_sub(1)));
        let next = ctx.link().callback(move |_| Msg::SetPage(current + 1));

        html! {
            <nav class="pagination">
                <button onclick={prev} disabled={!pagination.has_prev}>{ "Previous" }</button>
                { for numbers.iter().map(|&number| html! {
                    <button
                        key={number}
                        class={classes!((number == current).then_some("current"))}
                        onclick={ctx.link().callback(move |_| Msg::SetPage(number))}
                    >
                        { number }
                    </button>
                }) }
                <button onclick={next} disabled={!pagination.has_next}>{ "Next" }</button>
            </nav>
        }
    }
}
