use actix_web::{test, App};
use blog_core::ContentStore;
use blog_server::domain::AuthenticatedUser;
use blog_server::infrastructure::jwt::JwtService;
use blog_server::infrastructure::storage::open_storage;
use blog_server::AppServices;
use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;

#[actix_web::test]
async fn comments_survive_a_restart_with_a_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let jwt_service = Arc::new(JwtService::new("restart-test-secret-long-enough-for-hs256").unwrap());
    let token = jwt_service
        .generate_token(&AuthenticatedUser::new("user_1"), Duration::hours(1))
        .unwrap();
    let post_id = ContentStore::seeded().unwrap().corpus()[0].id.clone();

    {
        let storage = open_storage(Some(dir.path())).unwrap();
        let services = AppServices::new(ContentStore::seeded().unwrap(), storage, jwt_service.clone());
        let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

        let req = test::TestRequest::post()
            .uri("/api/comments")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(json!({"postId": post_id, "content": "still here after restart"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
    }

    let storage = open_storage(Some(dir.path())).unwrap();
    let services = AppServices::new(ContentStore::seeded().unwrap(), storage, jwt_service);
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments?postId={}", post_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["comments"][0]["content"], "still here after restart");
}
