use blog_server::infrastructure::config::{ConfigError, ServerConfig};
use serial_test::serial;
use std::path::PathBuf;

const VARS: [&str; 6] = [
    "JWT_SECRET",
    "HTTP_HOST",
    "HTTP_PORT",
    "CORS_ALLOWED_ORIGINS",
    "DATA_DIR",
    "CONTENT_PATH",
];

fn clear_env() {
    for name in VARS {
        std::env::remove_var(name);
    }
}

#[test]
#[serial]
fn from_env_requires_a_secret() {
    clear_env();

    assert!(matches!(
        ServerConfig::from_env(),
        Err(ConfigError::Missing("JWT_SECRET"))
    ));
}

#[test]
#[serial]
fn from_env_reads_the_process_environment() {
    clear_env();
    std::env::set_var("JWT_SECRET", "env-secret");
    std::env::set_var("HTTP_PORT", "4100");
    std::env::set_var("DATA_DIR", "/tmp/blog-data");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.jwt_secret, "env-secret");
    assert_eq!(config.http_addr(), "0.0.0.0:4100");
    assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/blog-data")));
    assert_eq!(config.content_path, None);
}
