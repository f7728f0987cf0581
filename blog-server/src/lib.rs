//! HTTP API over the blog content engine: read endpoints for posts, categories
//! and tags, the comment write API behind a bearer-token identity gate, and
//! likes.

pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

use actix_web::web;
use application::{BlogService, CommentService, LikeService};
use blog_core::{ContentStore, KeyValueStorage};
use data::{InMemoryContentRepository, StoredCommentRepository, StoredLikeRepository};
use infrastructure::jwt::JwtService;
use presentation::http_handlers;
use std::sync::Arc;

/// Everything a worker needs, shared between actix-web workers through `Arc`s.
#[derive(Clone)]
pub struct AppServices {
    pub blog_service: Arc<BlogService>,
    pub comment_service: Arc<CommentService>,
    pub like_service: Arc<LikeService>,
    pub jwt_service: Arc<JwtService>,
}

impl AppServices {
    pub fn new(
        content: ContentStore,
        storage: Arc<dyn KeyValueStorage>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        // Repositories
        let content_repo = Arc::new(InMemoryContentRepository::new(content));
        let comment_repo = Arc::new(StoredCommentRepository::new(storage.clone()));
        let like_repo = Arc::new(StoredLikeRepository::new(storage));

        // Application services
        let blog_service = Arc::new(BlogService::new(content_repo.clone()));
        let comment_service = Arc::new(CommentService::new(comment_repo));
        let like_service = Arc::new(LikeService::new(like_repo, content_repo));

        Self {
            blog_service,
            comment_service,
            like_service,
            jwt_service,
        }
    }

    /// Registers shared state and all `/api` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.blog_service.clone()))
            .app_data(web::Data::new(self.comment_service.clone()))
            .app_data(web::Data::new(self.like_service.clone()))
            .app_data(web::Data::new(self.jwt_service.clone()))
            .app_data(web::JsonConfig::default().error_handler(http_handlers::json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(http_handlers::query_error_handler))
            .service(
                web::scope("/api")
                    // Public routes - content (read-only)
                    .route("/posts", web::get().to(http_handlers::list_posts))
                    .route("/posts/{slug}", web::get().to(http_handlers::get_post))
                    .route(
                        "/posts/{slug}/related",
                        web::get().to(http_handlers::related_posts),
                    )
                    .route("/categories", web::get().to(http_handlers::list_categories))
                    .route(
                        "/categories/{slug}",
                        web::get().to(http_handlers::get_category),
                    )
                    .route("/tags/popular", web::get().to(http_handlers::popular_tags))
                    // Comments - reads are public, writes check the bearer identity
                    .service(
                        web::resource("/comments")
                            .route(web::get().to(http_handlers::list_comments))
                            .route(web::post().to(http_handlers::create_comment))
                            .route(web::put().to(http_handlers::update_comment))
                            .route(web::delete().to(http_handlers::delete_comment)),
                    )
                    // Likes - anonymous callers pass their own pseudo-identity
                    .service(
                        web::resource("/likes")
                            .route(web::get().to(http_handlers::get_like_state))
                            .route(web::post().to(http_handlers::toggle_like)),
                    ),
            );
    }
}
