use crate::services::Services;
use blog_core::domain::comment::{validate_content, MAX_COMMENT_LENGTH};
use blog_core::{format_relative, Comment, CommentDraft};
use chrono::Utc;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

pub enum Msg {
    UpdateDraft(String),
    UpdateName(String),
    Submit,
    StartEdit(String),
    UpdateEdit(String),
    SaveEdit,
    CancelEdit,
    Delete(String),
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub services: Services,
    pub post_id: String,
}

pub struct CommentSection {
    comments: Vec<Comment>,
    draft: String,
    name: String,
    // (comment id, content being edited)
    editing: Option<(String, String)>,
    error: Option<String>,
}

impl Component for CommentSection {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let Props { services, post_id } = ctx.props();

        Self {
            comments: services.comments.list(post_id),
            draft: String::new(),
            name: String::new(),
            editing: None,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let Props { services, post_id } = ctx.props();

        match msg {
            Msg::UpdateDraft(value) => self.draft = value,
            Msg::UpdateName(value) => self.name = value,

            Msg::Submit => {
                let draft = CommentDraft {
                    user_id: Some(services.user_id.clone()),
                    author_name: Some(self.name.clone()),
                    ..CommentDraft::new(post_id.as_str(), self.draft.as_str())
                };

                let result = draft
                    .into_comment(Utc::now())
                    .map_err(|e| e.to_string())
                    .and_then(|comment| {
                        services
                            .comments
                            .add(post_id, comment)
                            .map_err(|e| e.to_string())
                    });

                match result {
                    Ok(comment) => {
                        log::info!("Comment {} posted on {}", comment.id, post_id);
                        self.draft.clear();
                        self.error = None;
                        self.reload(ctx);
                    }
                    Err(e) => self.error = Some(e),
                }
            }

            Msg::StartEdit(comment_id) => {
                let content = self
                    .own_comment(ctx, &comment_id)
                    .map(|c| c.content.clone());
                if let Some(content) = content {
                    self.editing = Some((comment_id, content));
                    self.error = None;
                }
            }

            Msg::UpdateEdit(value) => {
                if let Some((_, content)) = self.editing.as_mut() {
                    *content = value;
                }
            }

            Msg::SaveEdit => {
                let Some((comment_id, content)) = self.editing.take() else {
                    return false;
                };

                let result = validate_content(&content)
                    .map_err(|e| e.to_string())
                    .and_then(|content| {
                        services
                            .comments
                            .update(post_id, &comment_id, &content, Utc::now())
                            .map_err(|e| e.to_string())
                    });

                match result {
                    Ok(_) => {
                        self.error = None;
                        self.reload(ctx);
                    }
                    Err(e) => {
                        self.error = Some(e);
                        self.editing = Some((comment_id, content));
                    }
                }
            }

            Msg::CancelEdit => self.editing = None,

            Msg::Delete(comment_id) => {
                if self.own_comment(ctx, &comment_id).is_none() {
                    return false;
                }
                match services.comments.remove(post_id, &comment_id) {
                    Ok(()) => self.reload(ctx),
                    Err(e) => self.error = Some(e.to_string()),
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <section class="comments">
                <h3>{ format!("Comments ({})", self.comments.len()) }</h3>
                { self.view_form(ctx) }
                if let Some(error) = &self.error {
                    <div class="error">{ error }</div>
                }
                { for self.comments.iter().map(|comment| self.view_comment(ctx, comment)) }
            </section>
        }
    }
}

impl CommentSection {
    fn reload(&mut self, ctx: &Context<Self>) {
        let Props { services, post_id } = ctx.props();
        self.comments = services.comments.list(post_id);
    }

    fn own_comment(&self, ctx: &Context<Self>, comment_id: &str) -> Option<&Comment> {
        let user_id = &ctx.props().services.user_id;
        self.comments
            .iter()
            .find(|c| c.id == comment_id && c.is_owned_by(user_id))
    }

    fn view_form(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="comment-form">
                <input
                    type="text"
                    placeholder="Your name (optional)"
                    value={self.name.clone()}
                    oninput={ctx.link().callback(|e: InputEvent| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        Msg::UpdateName(input.value())
                    })}
                />
                <textarea
                    placeholder="Share your thoughts..."
                    value={self.draft.clone()}
                    oninput={ctx.link().callback(|e: InputEvent| {
                        let input: HtmlTextAreaElement = e.target_unchecked_into();
                        Msg::UpdateDraft(input.value())
                    })}
                />
                <small>{ format!("{}/{}", self.draft.chars().count(), MAX_COMMENT_LENGTH) }</small>
                <button onclick={ctx.link().callback(|_| Msg::Submit)}>
                    { "Post comment" }
                </button>
            </div>
        }
    }

    fn view_comment(&self, ctx: &Context<Self>, comment: &Comment) -> Html {
        let owned = comment.is_owned_by(&ctx.props().services.user_id);
        let age = format_relative(comment.created_at, Utc::now());

        let body = match &self.editing {
            Some((id, content)) if *id == comment.id => html! {
                <div class="edit-form">
                    <textarea
                        value={content.clone()}
                        oninput={ctx.link().callback(|e: InputEvent| {
                            let input: HtmlTextAreaElement = e.target_unchecked_into();
                            Msg::UpdateEdit(input.value())
                        })}
                    />
                    <div class="edit-actions">
                        <button onclick={ctx.link().callback(|_| Msg::SaveEdit)}>{ "Save" }</button>
                        <button onclick={ctx.link().callback(|_| Msg::CancelEdit)}>{ "Cancel" }</button>
                    </div>
                </div>
            },
            _ => html! { <p>{ &comment.content }</p> },
        };

        let comment_id = comment.id.clone();
        let edit = {
            let comment_id = comment_id.clone();
            ctx.link().callback(move |_| Msg::StartEdit(comment_id.clone()))
        };
        let delete = ctx.link().callback(move |_| Msg::Delete(comment_id.clone()));

        html! {
            <div class="comment" key={comment.id.clone()}>
                <strong>{ &comment.author_name }</strong>
                <small>
                    { age }
                    if comment.is_edited {
                        { " · edited" }
                    }
                </small>
                { body }
                if owned && self.editing.is_none() {
                    <div class="comment-actions">
                        <button onclick={edit}>{ "Edit" }</button>
                        <button onclick={delete}>{ "Delete" }</button>
                    </div>
                }
            </div>
        }
    }
}
