mod offline;
mod token;

use anyhow::{Context, Result};
use blog_client::error::BlogClientError;
use blog_client::models::{ListPostsParams, NewComment, PostListResponse};
use blog_client::BlogClient;
use blog_core::auth_error::{classify_and_log, ProviderErrorEntry};
use blog_core::{
    format_relative, get_or_create_user_id, highlight, retry_delay, AuthError, CategoryWithCount,
    Comment, FileStorage, KeyValueStorage, LikeState, Post, RawAuthError, RecentSearches,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use offline::LocalBlog;
use std::path::PathBuf;
use std::sync::Arc;
use token::TokenManager;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        global = true,
        env = "BLOG_SERVER",
        default_value = "http://localhost:3000"
    )]
    server: String,

    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    /// Where the anonymous identity, recent searches and offline state live
    #[arg(long, global = true, env = "BLOG_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Answer from the bundled posts and local state instead of the server
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List posts, newest first by default
    List {
        #[arg(short, long)]
        category: Option<String>,

        /// latest, oldest, popular or relevance
        #[arg(long)]
        sort: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = 10)]
        page_size: usize,
    },

    /// Search posts and remember the query
    Search {
        query: String,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        sort: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = 10)]
        page_size: usize,
    },

    /// Recent searches
    Recent {
        #[arg(long)]
        clear: bool,

        #[arg(long, conflicts_with = "clear")]
        remove: Option<String>,
    },

    Show {
        slug: String,
    },

    Related {
        slug: String,

        #[arg(short, long, default_value_t = 3)]
        limit: usize,

        /// Do not backfill with the latest posts
        #[arg(long)]
        no_fallback: bool,
    },

    Categories,

    Category {
        slug: String,
    },

    Tags {
        #[arg(short, long, default_value_t = 8)]
        limit: usize,
    },

    Comments {
        post_id: String,
    },

    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// Toggle the like on a post, or show it with --status
    Like {
        post_id: String,

        #[arg(long)]
        status: bool,
    },

    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Print the anonymous identity of this machine
    Whoami,

    /// Show how an authentication failure is presented to readers
    ExplainError {
        #[arg(long)]
        status: Option<u16>,

        /// Identity-provider error code, e.g. session_expired
        #[arg(long)]
        code: Option<String>,

        #[arg(long)]
        message: Option<String>,

        #[arg(long, default_value_t = 1)]
        attempt: u32,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum CommentAction {
    Add {
        post_id: String,
        content: String,

        #[arg(long)]
        name: Option<String>,
    },
    Edit {
        post_id: String,
        comment_id: String,
        content: String,
    },
    Delete {
        post_id: String,
        comment_id: String,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    Set { token: String },
    Clear,
    Status,
}

/// Where reads and writes go for this invocation.
enum Backend {
    Remote(BlogClient),
    Local(LocalBlog),
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => dirs::home_dir()
            .context("Failed to get home directory")?
            .join(".blog"),
    };
    let storage: Arc<dyn KeyValueStorage> = Arc::new(
        FileStorage::open(&data_dir)
            .with_context(|| format!("Failed to open state directory {:?}", data_dir))?,
    );
    let token_manager = TokenManager::new(
        cli.token_file
            .unwrap_or_else(|| data_dir.join("token")),
    );
    let user_id = get_or_create_user_id(storage.as_ref());

    match cli.command {
        Commands::Recent { clear, remove } => {
            return recent_searches(&RecentSearches::new(storage), clear, remove);
        }
        Commands::Token { action } => return token_command(&token_manager, action),
        Commands::Whoami => {
            println!("{}", user_id);
            return Ok(());
        }
        Commands::ExplainError {
            status,
            code,
            message,
            attempt,
            json,
        } => return explain_error(status, code, message, attempt, json),
        _ => {}
    }

    let backend = if cli.offline {
        Backend::Local(LocalBlog::new(storage.clone(), user_id.clone())?)
    } else {
        let client = BlogClient::new(cli.server);
        if let Some(token) = token_manager.load_token()? {
            client.set_token(token).await;
        }
        Backend::Remote(client)
    };

    match cli.command {
        Commands::List {
            category,
            sort,
            page,
            page_size,
        } => {
            let params = ListPostsParams {
                q: None,
                category,
                sort,
                page: Some(page),
                page_size: Some(page_size),
            };
            let response = match &backend {
                Backend::Remote(client) => client.list_posts(&params).await.unwrap_or_else(|e| fail(&e)),
                Backend::Local(local) => local.list_posts(&params)?,
            };
            print_post_list(&response, None);
        }

        Commands::Search {
            query,
            category,
            sort,
            page,
            page_size,
        } => {
            if let Err(e) = RecentSearches::new(storage).record(&query) {
                tracing::warn!("Search will not be remembered: {}", e);
            }

            println!("🔍 Searching for \"{}\"", query.trim());
            let params = ListPostsParams {
                q: Some(query.clone()),
                category,
                sort,
                page: Some(page),
                page_size: Some(page_size),
            };
            let response = match &backend {
                Backend::Remote(client) => client.list_posts(&params).await.unwrap_or_else(|e| fail(&e)),
                Backend::Local(local) => local.list_posts(&params)?,
            };
            print_post_list(&response, Some(query.trim()));
        }

        Commands::Show { slug } => {
            let post = match &backend {
                Backend::Remote(client) => client.get_post(&slug).await.unwrap_or_else(|e| fail(&e)),
                Backend::Local(local) => local.get_post(&slug)?,
            };
            print_post(&post);
        }

        Commands::Related {
            slug,
            limit,
            no_fallback,
        } => {
            let posts = match &backend {
                Backend::Remote(client) => client
                    .related_posts(&slug, limit, !no_fallback)
                    .await
                    .unwrap_or_else(|e| fail(&e)),
                Backend::Local(local) => local.related_posts(&slug, limit, !no_fallback)?,
            };

            if posts.is_empty() {
                println!("   No related posts");
            }
            for (i, post) in posts.iter().enumerate() {
                println!("   {}. [{}] {}", i + 1, post.id, post.title.bold());
                println!("      {}", post.slug);
            }
        }

        Commands::Categories => {
            let categories = match &backend {
                Backend::Remote(client) => client.categories().await.unwrap_or_else(|e| fail(&e)),
                Backend::Local(local) => local.categories(),
            };
            print_categories(&categories);
        }

        Commands::Category { slug } => {
            let response = match &backend {
                Backend::Remote(client) => client.category(&slug).await.unwrap_or_else(|e| fail(&e)),
                Backend::Local(local) => local.category(&slug)?,
            };

            println!("📂 {}", response.category.name.bold());
            if !response.category.description.is_empty() {
                println!("   {}", response.category.description);
            }
            println!();
            for post in &response.posts {
                print_post_summary(post, None);
            }
        }

        Commands::Tags { limit } => {
            let tags = match &backend {
                Backend::Remote(client) => client.popular_tags(limit).await.unwrap_or_else(|e| fail(&e)),
                Backend::Local(local) => local.popular_tags(limit),
            };
            println!("🏷  {}", tags.join(", "));
        }

        Commands::Comments { post_id } => {
            let comments = match &backend {
                Backend::Remote(client) => client.comments(&post_id).await.unwrap_or_else(|e| fail(&e)),
                Backend::Local(local) => local.comments(&post_id),
            };
            print_comments(&comments, &user_id);
        }

        Commands::Comment { action } => comment_command(&backend, action).await?,

        Commands::Like { post_id, status } => {
            let state = match (&backend, status) {
                (Backend::Remote(client), true) => client
                    .like_state(&post_id, &user_id)
                    .await
                    .unwrap_or_else(|e| fail(&e)),
                (Backend::Remote(client), false) => client
                    .toggle_like(&post_id, Some(&user_id))
                    .await
                    .unwrap_or_else(|e| fail(&e)),
                (Backend::Local(local), true) => local.like_state(&post_id)?,
                (Backend::Local(local), false) => local.toggle_like(&post_id)?,
            };
            print_like(&post_id, state);
        }

        Commands::Recent { .. }
        | Commands::Token { .. }
        | Commands::Whoami
        | Commands::ExplainError { .. } => {}
    }

    Ok(())
}

async fn comment_command(backend: &Backend, action: CommentAction) -> Result<()> {
    match action {
        CommentAction::Add {
            post_id,
            content,
            name,
        } => {
            let comment = match backend {
                Backend::Remote(client) => {
                    let request = NewComment {
                        post_id,
                        content,
                        author_name: name,
                        ..Default::default()
                    };
                    client
                        .create_comment(&request)
                        .await
                        .unwrap_or_else(|e| fail(&e))
                }
                Backend::Local(local) => local.add_comment(&post_id, &content, name)?,
            };
            println!("✅ Comment {} posted", comment.id);
        }

        CommentAction::Edit {
            post_id,
            comment_id,
            content,
        } => {
            let comment = match backend {
                Backend::Remote(client) => client
                    .update_comment(&post_id, &comment_id, &content)
                    .await
                    .unwrap_or_else(|e| fail(&e)),
                Backend::Local(local) => local.edit_comment(&post_id, &comment_id, &content)?,
            };
            println!("✅ Comment {} updated", comment.id);
        }

        CommentAction::Delete {
            post_id,
            comment_id,
        } => {
            match backend {
                Backend::Remote(client) => client
                    .delete_comment(&post_id, &comment_id)
                    .await
                    .unwrap_or_else(|e| fail(&e)),
                Backend::Local(local) => local.delete_comment(&post_id, &comment_id)?,
            }
            println!("✅ Comment {} deleted", comment_id);
        }
    }

    Ok(())
}

fn recent_searches(recent: &RecentSearches, clear: bool, remove: Option<String>) -> Result<()> {
    if clear {
        recent.clear()?;
        println!("✓ Recent searches cleared");
        return Ok(());
    }

    let searches = match remove {
        Some(query) => recent.remove(&query)?,
        None => recent.list(),
    };

    if searches.is_empty() {
        println!("   No recent searches");
    }
    for (i, query) in searches.iter().enumerate() {
        println!("   {}. {}", i + 1, query);
    }
    Ok(())
}

fn token_command(manager: &TokenManager, action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Set { token } => {
            manager.save_token(&token)?;
            println!("✓ Token saved to {:?}", manager.path());
        }
        TokenAction::Clear => {
            if manager.clear_token()? {
                println!("✓ Token file removed");
            } else {
                println!("   No token to remove");
            }
        }
        TokenAction::Status => match manager.load_token()? {
            Some(token) => {
                println!("🔑 Token file: {:?}", manager.path());
                println!("   Token: {}", token::preview(&token));
            }
            None => {
                println!("❌ No token found");
                println!("   Save one with: blog-cli token set <token>");
            }
        },
    }
    Ok(())
}

fn explain_error(
    status: Option<u16>,
    code: Option<String>,
    message: Option<String>,
    attempt: u32,
    json: bool,
) -> Result<()> {
    let raw = match (code, status, message) {
        (Some(code), _, _) => RawAuthError::Provider {
            code: None,
            errors: vec![ProviderErrorEntry {
                code,
                message: String::new(),
            }],
        },
        (None, Some(status), _) => RawAuthError::HttpStatus(status),
        (None, None, Some(message)) => RawAuthError::Exception { message },
        (None, None, None) => RawAuthError::Unknown,
    };
    let error = classify_and_log(&raw, Some("explain-error"));

    if json {
        println!("{}", serde_json::to_string_pretty(&error)?);
        return Ok(());
    }

    print_auth_error(&error);
    println!("   Type: {} ({})", error.kind, error.severity);
    if error.can_retry {
        println!(
            "   Retry #{} after {} ms",
            attempt.max(1),
            retry_delay(error.kind, attempt)
        );
    }
    Ok(())
}

/// Prints what a reader would see for a failed request and exits.
fn fail(err: &BlogClientError) -> ! {
    tracing::debug!("Request failed: {}", err);

    match err {
        BlogClientError::NotFound(message)
        | BlogClientError::InvalidRequest(message)
        | BlogClientError::Conflict(message) => {
            println!("❌ {}", message);
        }
        _ => print_auth_error(&err.to_auth_error()),
    }
    std::process::exit(1);
}

fn print_auth_error(error: &AuthError) {
    println!("❌ {}", error.title.bold());
    println!("   {}", error.message);
    if let Some(action) = error.action {
        match error.action_url {
            Some(url) => println!("   → {} ({})", action, url),
            None => println!("   → {}", action),
        }
    }
}

fn print_post_list(response: &PostListResponse, term: Option<&str>) {
    let pagination = &response.pagination;
    println!(
        "📋 Page {}/{} ({} posts)",
        pagination.current_page, pagination.total_pages, pagination.total_items
    );
    println!();

    if response.posts.is_empty() {
        println!("   No posts found");
        return;
    }

    for post in &response.posts {
        print_post_summary(post, term);
    }

    if pagination.total_pages > 1 {
        let pages: Vec<String> = response
            .page_numbers
            .iter()
            .map(|&n| {
                if n == pagination.current_page {
                    format!("[{}]", n)
                } else {
                    n.to_string()
                }
            })
            .collect();
        println!("   Pages: {}", pages.join(" "));
    }
}

fn print_post_summary(post: &Post, term: Option<&str>) {
    let title = match term {
        Some(term) => highlighted(&post.title, term),
        None => post.title.bold().to_string(),
    };

    println!("   [{}] {}", post.id, title);
    println!(
        "      {} · {} · {} min · 👁 {} · ♥ {}",
        post.category.name,
        post.published_at.format("%b %-d, %Y"),
        post.reading_time,
        post.view_count,
        post.like_count
    );
    if !post.excerpt.is_empty() {
        println!("      {}", truncate(&post.excerpt, 80));
    }
    println!();
}

fn highlighted(text: &str, term: &str) -> String {
    highlight(text, term)
        .into_iter()
        .map(|segment| {
            if segment.matched {
                segment.text.yellow().bold().to_string()
            } else {
                segment.text
            }
        })
        .collect()
}

fn print_post(post: &Post) {
    println!("{}", post.title.bold());
    println!(
        "by {} · {} · {} · {} min read",
        post.author.name,
        post.category.name,
        post.published_at.format("%B %-d, %Y"),
        post.reading_time
    );
    if !post.tags.is_empty() {
        println!("tags: {}", post.tags.join(", "));
    }
    println!("id: {} · 👁 {} · ♥ {}", post.id, post.view_count, post.like_count);
    println!();
    println!("{}", post.content);
}

fn print_categories(categories: &[CategoryWithCount]) {
    for entry in categories {
        println!(
            "   {} ({}) - {} posts",
            entry.category.name.bold(),
            entry.category.slug,
            entry.post_count
        );
    }
}

fn print_comments(comments: &[Comment], user_id: &str) {
    println!("💬 {} comments", comments.len());
    let now = chrono::Utc::now();

    for comment in comments {
        let mut header = format!(
            "{} · {}",
            comment.author_name.bold(),
            format_relative(comment.created_at, now)
        );
        if comment.is_edited {
            header.push_str(" · edited");
        }
        if comment.is_owned_by(user_id) {
            header.push_str(" · you");
        }

        println!();
        println!("   {}  [{}]", header, comment.id);
        println!("   {}", comment.content);
    }
}

fn print_like(post_id: &str, state: LikeState) {
    let mark = if state.liked { "♥" } else { "♡" };
    println!("{} {} likes on {}", mark, state.total_count, post_id);
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
