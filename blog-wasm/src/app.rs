use crate::components::{PostList, PostView, SearchDialog};
use crate::services::{Blog, Services};
use crate::storage::open_storage;
use blog_core::ContentStore;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/posts/:slug")]
    Post { slug: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub struct App {
    services: Result<Services, String>,
}

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let services = ContentStore::seeded()
            .map(|content| Services::new(Blog::new(content, open_storage())))
            .map_err(|e| {
                log::error!("Failed to load posts: {}", e);
                e.to_string()
            });

        if let Ok(services) = &services {
            log::info!("Reader identity {}", services.user_id);
        }

        Self { services }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        let services = match &self.services {
            Ok(services) => services.clone(),
            Err(error) => {
                return html! {
                    <div class="container">
                        <div class="error">{ format!("Error: {}", error) }</div>
                    </div>
                }
            }
        };

        let render = {
            let services = services.clone();
            move |route: Route| switch(route, &services)
        };

        html! {
            <HashRouter>
                <div class="container">
                    <header>
                        <h1><Link<Route> to={Route::Home}>{ "Blog" }</Link<Route>></h1>
                        <SearchDialog services={services} />
                    </header>
                    <Switch<Route> render={render} />
                </div>
            </HashRouter>
        }
    }
}

fn switch(route: Route, services: &Services) -> Html {
    match route {
        Route::Home => html! { <PostList services={services.clone()} /> },
        Route::Post { slug } => html! { <PostView services={services.clone()} {slug} /> },
        Route::NotFound => html! { <p>{ "Page not found" }</p> },
    }
}
