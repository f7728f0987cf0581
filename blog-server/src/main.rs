use anyhow::Context;
use blog_core::ContentStore;
use blog_server::infrastructure::{
    config::ServerConfig, jwt::JwtService, logging::{init_logging, DEFAULT_LOG_FILTER},
    storage::open_storage,
};
use blog_server::AppServices;
use dotenvy::dotenv;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    init_logging(DEFAULT_LOG_FILTER);

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    let http_addr = config.http_addr();

    tracing::info!("Starting blog server...");
    tracing::info!("HTTP server will listen on {}", http_addr);
    tracing::info!("CORS allowed origins: {:?}", config.cors_allowed_origins);

    // Content
    let content = match &config.content_path {
        Some(path) => {
            tracing::info!("Loading content from {}", path.display());
            ContentStore::load(path)
                .with_context(|| format!("Failed to load content from {}", path.display()))?
        }
        None => ContentStore::seeded().context("Bundled content is invalid")?,
    };

    // Storage for comments and likes
    let storage =
        open_storage(config.data_dir.as_deref()).context("Failed to open interaction storage")?;

    // Initialize services
    tracing::info!("Initializing services...");
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret)?);
    let services = AppServices::new(content, storage, jwt_service);
    tracing::info!("Services initialized successfully");

    run_http_server(http_addr, services, config.cors_allowed_origins).await
}

/// Configure CORS for the HTTP server with allowed origins from .env
fn configure_cors(allowed_origins: &[String]) -> actix_cors::Cors {
    use actix_cors::Cors;
    use actix_web::http::header;

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::AUTHORIZATION])
        .max_age(3600);

    // Добавляем каждый разрешенный домен
    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
        tracing::debug!("Added allowed CORS origin: {}", origin);
    }

    cors
}

async fn run_http_server(
    addr: String,
    services: AppServices,
    cors_allowed_origins: Vec<String>,
) -> anyhow::Result<()> {
    use actix_web::{middleware::Logger, App, HttpServer};

    tracing::info!("Configuring HTTP server...");

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(configure_cors(&cors_allowed_origins))
            .configure(|cfg| services.configure(cfg))
    })
    .bind(&addr)
    .with_context(|| format!("Failed to bind {}", addr))?
    .run();

    tracing::info!("HTTP server running on {}", addr);

    server.await?;

    tracing::info!("Shutting down...");
    Ok(())
}
