use crate::application::{BlogService, CommentService, LikeService};
use crate::domain::comment::{
    CommentResponse, CommentsQuery, CommentsResponse, CreateCommentRequest, DeleteCommentQuery,
    SuccessResponse, UpdateCommentRequest,
};
use crate::domain::like::{LikeQuery, ToggleLikeRequest};
use crate::domain::post::{
    CategoriesResponse, CategoryResponse, PostListQuery, PostsResponse, RelatedQuery, TagsQuery,
    TagsResponse,
};
use crate::domain::{AuthenticatedUser, DomainError};
use actix_web::{error, web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;

// Преобразование DomainError в HttpResponse
pub fn error_to_response(err: DomainError) -> HttpResponse {
    let status_code = err.to_status_code();
    let message = err.to_string();

    match status_code {
        400 => HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        401 => HttpResponse::Unauthorized().json(serde_json::json!({ "error": message })),
        403 => HttpResponse::Forbidden().json(serde_json::json!({ "error": message })),
        404 => HttpResponse::NotFound().json(serde_json::json!({ "error": message })),
        409 => HttpResponse::Conflict().json(serde_json::json!({ "error": message })),
        _ => {
            tracing::error!("Request failed: {}", message);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Internal server error" }))
        }
    }
}

fn require_user(
    user: Option<AuthenticatedUser>,
    action: &str,
) -> Result<AuthenticatedUser, DomainError> {
    user.ok_or_else(|| DomainError::Unauthorized(format!("sign in to {}", action)))
}

// Тело разбирается только после проверки токена
fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, DomainError> {
    serde_json::from_slice(body).map_err(|e| DomainError::ValidationError(e.to_string()))
}

/// Malformed JSON bodies and query strings get the same `{error}` shape as
/// every other failure.
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    let message = format!("Validation error: {}", err);
    error::InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
    )
    .into()
}

pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    let message = format!("Validation error: {}", err);
    error::InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
    )
    .into()
}

// ============== Post Handlers ==============

pub async fn list_posts(
    blog_service: web::Data<Arc<BlogService>>,
    query: web::Query<PostListQuery>,
) -> impl Responder {
    let query = query.into_inner();

    tracing::info!(
        "Listing posts: q={:?}, category={:?}, sort={:?}, page={:?}",
        query.q,
        query.category,
        query.sort,
        query.page
    );

    match blog_service.list_posts(query).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_to_response(err),
    }
}

pub async fn get_post(
    blog_service: web::Data<Arc<BlogService>>,
    path: web::Path<String>,
) -> impl Responder {
    let slug = path.into_inner();

    tracing::info!("Getting post with slug={}", slug);

    match blog_service.get_post(&slug).await {
        Ok(post) => HttpResponse::Ok().json(post),
        Err(err) => error_to_response(err),
    }
}

pub async fn related_posts(
    blog_service: web::Data<Arc<BlogService>>,
    path: web::Path<String>,
    query: web::Query<RelatedQuery>,
) -> impl Responder {
    let slug = path.into_inner();

    match blog_service
        .related_posts(&slug, query.limit, query.fallback)
        .await
    {
        Ok(posts) => HttpResponse::Ok().json(PostsResponse { posts }),
        Err(err) => error_to_response(err),
    }
}

// ============== Category / Tag Handlers ==============

pub async fn list_categories(blog_service: web::Data<Arc<BlogService>>) -> impl Responder {
    match blog_service.categories().await {
        Ok(categories) => HttpResponse::Ok().json(CategoriesResponse { categories }),
        Err(err) => error_to_response(err),
    }
}

pub async fn get_category(
    blog_service: web::Data<Arc<BlogService>>,
    path: web::Path<String>,
) -> impl Responder {
    let slug = path.into_inner();

    tracing::info!("Getting category with slug={}", slug);

    match blog_service.category(&slug).await {
        Ok((category, posts)) => HttpResponse::Ok().json(CategoryResponse { category, posts }),
        Err(err) => error_to_response(err),
    }
}

pub async fn popular_tags(
    blog_service: web::Data<Arc<BlogService>>,
    query: web::Query<TagsQuery>,
) -> impl Responder {
    match blog_service.popular_tags(query.limit).await {
        Ok(tags) => HttpResponse::Ok().json(TagsResponse { tags }),
        Err(err) => error_to_response(err),
    }
}

// ============== Comment Handlers ==============

pub async fn list_comments(
    comment_service: web::Data<Arc<CommentService>>,
    query: web::Query<CommentsQuery>,
) -> impl Responder {
    match comment_service
        .list_comments(query.into_inner().post_id)
        .await
    {
        Ok(comments) => HttpResponse::Ok().json(CommentsResponse { comments }),
        Err(err) => error_to_response(err),
    }
}

pub async fn create_comment(
    user: Option<AuthenticatedUser>,
    comment_service: web::Data<Arc<CommentService>>,
    body: web::Bytes,
) -> impl Responder {
    let user = match require_user(user, "comment") {
        Ok(user) => user,
        Err(err) => return error_to_response(err),
    };
    let req: CreateCommentRequest = match parse_body(&body) {
        Ok(req) => req,
        Err(err) => return error_to_response(err),
    };

    tracing::info!("Creating comment for user_id={}", user.user_id);

    match comment_service
        .create_comment(&user, req)
        .await
    {
        Ok(comment) => HttpResponse::Ok().json(CommentResponse {
            success: true,
            comment,
        }),
        Err(err) => error_to_response(err),
    }
}

pub async fn update_comment(
    user: Option<AuthenticatedUser>,
    comment_service: web::Data<Arc<CommentService>>,
    body: web::Bytes,
) -> impl Responder {
    let user = match require_user(user, "edit comments") {
        Ok(user) => user,
        Err(err) => return error_to_response(err),
    };
    let req: UpdateCommentRequest = match parse_body(&body) {
        Ok(req) => req,
        Err(err) => return error_to_response(err),
    };

    tracing::info!("Updating comment for user_id={}", user.user_id);

    match comment_service
        .update_comment(&user, req)
        .await
    {
        Ok(comment) => HttpResponse::Ok().json(CommentResponse {
            success: true,
            comment,
        }),
        Err(err) => error_to_response(err),
    }
}

pub async fn delete_comment(
    user: Option<AuthenticatedUser>,
    comment_service: web::Data<Arc<CommentService>>,
    query: web::Query<DeleteCommentQuery>,
) -> impl Responder {
    let user = match require_user(user, "delete comments") {
        Ok(user) => user,
        Err(err) => return error_to_response(err),
    };
    let query = query.into_inner();

    tracing::info!("Deleting comment for user_id={}", user.user_id);

    match comment_service
        .delete_comment(&user, query.post_id, query.comment_id)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(SuccessResponse { success: true }),
        Err(err) => error_to_response(err),
    }
}

// ============== Like Handlers ==============

pub async fn get_like_state(
    like_service: web::Data<Arc<LikeService>>,
    query: web::Query<LikeQuery>,
) -> impl Responder {
    let query = query.into_inner();

    match like_service.like_state(query.post_id, query.user_id).await {
        Ok(state) => HttpResponse::Ok().json(state),
        Err(err) => error_to_response(err),
    }
}

pub async fn toggle_like(
    user: Option<AuthenticatedUser>,
    like_service: web::Data<Arc<LikeService>>,
    body: web::Json<ToggleLikeRequest>,
) -> impl Responder {
    let body = body.into_inner();

    match like_service
        .toggle_like(user.as_ref(), body.post_id, body.user_id)
        .await
    {
        Ok(state) => HttpResponse::Ok().json(state),
        Err(err) => error_to_response(err),
    }
}
