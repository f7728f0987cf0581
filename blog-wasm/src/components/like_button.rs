use crate::services::Services;
use blog_core::LikeState;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

pub enum Msg {
    Toggle,
    Settled(Result<LikeState, String>),
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub services: Services,
    pub post_id: String,
    /// Like count shipped with the post, before any local toggles.
    pub initial: u64,
}

pub struct LikeButton {
    state: LikeState,
    busy: bool,
    error: Option<String>,
}

impl Component for LikeButton {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let Props {
            services,
            post_id,
            initial,
        } = ctx.props();

        Self {
            state: services.likes.state(post_id, &services.user_id, *initial),
            busy: false,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Toggle => {
                // clicks while a toggle settles are dropped
                if self.busy {
                    return false;
                }
                self.busy = true;
                self.error = None;

                let services = ctx.props().services.clone();
                let post_id = ctx.props().post_id.clone();
                let initial = ctx.props().initial;
                let link = ctx.link().clone();

                spawn_local(async move {
                    let result = services
                        .likes
                        .toggle(&post_id, &services.user_id, initial)
                        .map_err(|e| e.to_string());
                    link.send_message(Msg::Settled(result));
                });
                true
            }

            Msg::Settled(Ok(state)) => {
                self.state = state;
                self.busy = false;
                true
            }

            Msg::Settled(Err(e)) => {
                log::warn!("Like toggle failed: {}", e);
                self.error = Some(e);
                self.busy = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let heart = if self.state.liked { "♥" } else { "♡" };

        html! {
            <div class="like">
                <button
                    class={classes!("like-button", self.state.liked.then_some("liked"))}
                    disabled={self.busy}
                    onclick={ctx.link().callback(|_| Msg::Toggle)}
                >
                    { format!("{} {}", heart, self.state.total_count) }
                </button>
                if let Some(error) = &self.error {
                    <span class="error">{ error }</span>
                }
            </div>
        }
    }
}
