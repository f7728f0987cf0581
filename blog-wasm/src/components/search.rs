use crate::app::Route;
use crate::components::highlighted;
use crate::services::Services;
use blog_core::query::SEARCH_PREVIEW_LIMIT;
use blog_core::{search, Post};
use gloo_timers::callback::Timeout;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

const SEARCH_DEBOUNCE_MS: u32 = 300;

pub enum Msg {
    Input(String),
    Run,
    Choose(String),
    Remember,
    RemoveRecent(String),
    ClearRecent,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub services: Services,
}

pub struct SearchDialog {
    query: String,
    results: Vec<Post>,
    recent: Vec<String>,
    // dropping the timeout cancels it
    pending: Option<Timeout>,
}

impl Component for SearchDialog {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            recent: ctx.props().services.recent.list(),
            pending: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let services = &ctx.props().services;

        match msg {
            Msg::Input(query) => {
                self.query = query;
                let link = ctx.link().clone();
                self.pending = Some(Timeout::new(SEARCH_DEBOUNCE_MS, move || {
                    link.send_message(Msg::Run)
                }));
                true
            }

            Msg::Run => {
                self.pending = None;
                let corpus = services.content.corpus();
                self.results = search(&self.query, &corpus)
                    .into_iter()
                    .take(SEARCH_PREVIEW_LIMIT)
                    .cloned()
                    .collect();
                log::debug!("Search {:?}: {} results", self.query, self.results.len());
                true
            }

            Msg::Choose(query) => {
                self.query = query;
                ctx.link().send_message(Msg::Run);
                true
            }

            Msg::Remember => {
                match services.recent.record(&self.query) {
                    Ok(recent) => self.recent = recent,
                    Err(e) => log::warn!("Failed to remember search: {}", e),
                }
                self.query.clear();
                self.results.clear();
                true
            }

            Msg::RemoveRecent(query) => {
                match services.recent.remove(&query) {
                    Ok(recent) => self.recent = recent,
                    Err(e) => log::warn!("Failed to forget search: {}", e),
                }
                true
            }

            Msg::ClearRecent => {
                match services.recent.clear() {
                    Ok(()) => self.recent.clear(),
                    Err(e) => log::warn!("Failed to clear recent searches: {}", e),
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let oninput = ctx.link().callback(|e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::Input(input.value())
        });

        html! {
            <div class="search">
                <input
                    type="search"
                    placeholder="Search posts..."
                    value={self.query.clone()}
                    {oninput}
                />
                if self.query.trim().is_empty() {
                    { self.view_recent(ctx) }
                } else {
                    { self.view_results(ctx) }
                }
            </div>
        }
    }
}

impl SearchDialog {
    fn view_recent(&self, ctx: &Context<Self>) -> Html {
        if self.recent.is_empty() {
            return html! {};
        }

        html! {
            <div class="recent-searches">
                <span>{ "Recent: " }</span>
                { for self.recent.iter().map(|query| {
                    let choose = {
                        let query = query.clone();
                        ctx.link().callback(move |_| Msg::Choose(query.clone()))
                    };
                    let remove = {
                        let query = query.clone();
                        ctx.link().callback(move |_| Msg::RemoveRecent(query.clone()))
                    };
                    html! {
                        <span class="chip" key={query.clone()}>
                            <button onclick={choose}>{ query }</button>
                            <button class="remove" onclick={remove}>{ "×" }</button>
                        </span>
                    }
                }) }
                <button onclick={ctx.link().callback(|_| Msg::ClearRecent)}>
                    { "Clear" }
                </button>
            </div>
        }
    }

    fn view_results(&self, ctx: &Context<Self>) -> Html {
        if self.pending.is_some() {
            return html! { <div class="loading">{ "Searching..." }</div> };
        }
        if self.results.is_empty() {
            return html! { <p>{ "No posts match your search." }</p> };
        }

        let term = self.query.trim();
        html! {
            <ul class="search-results">
                { for self.results.iter().map(|post| html! {
                    <li key={post.id.clone()} onclick={ctx.link().callback(|_| Msg::Remember)}>
                        <Link<Route> to={Route::Post { slug: post.slug.clone() }}>
                            { highlighted(&post.title, term) }
                        </Link<Route>>
                        <small>{ highlighted(&post.excerpt, term) }</small>
                    </li>
                }) }
            </ul>
        }
    }
}
