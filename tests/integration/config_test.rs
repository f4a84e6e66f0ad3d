//! Configuration tests against the real process environment
//!
//! Environment variables are process-wide; every test here is `#[serial]`.

use pbchat::shared::{AppConfig, AuthBackend, ConfigError, CorsOrigins};
use serial_test::serial;

const VARS: [&str; 7] = [
    "AUTH_BACKEND",
    "POCKETBASE_URL",
    "POCKETBASE_ADMIN_EMAIL",
    "POCKETBASE_ADMIN_PASSWORD",
    "API_PORT",
    "CORS_ORIGIN",
    "JWT_SECRET",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_memory_backend_from_env() {
    clear_env();
    std::env::set_var("AUTH_BACKEND", "memory");
    std::env::set_var("API_PORT", "4100");
    std::env::set_var("CORS_ORIGIN", "http://localhost:5173, http://127.0.0.1:5173");

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.backend, AuthBackend::Memory);
    assert_eq!(config.api_port, 4100);
    assert!(config.cors_origins.allows("http://127.0.0.1:5173"));
    assert!(!config.cors_origins.allows("http://evil.example"));
    assert!(!config.has_admin());
    clear_env();
}

#[test]
#[serial]
fn test_pocketbase_backend_requires_url() {
    clear_env();
    assert_eq!(
        AppConfig::from_env().unwrap_err(),
        ConfigError::MissingValue("POCKETBASE_URL")
    );

    std::env::set_var("POCKETBASE_URL", "http://127.0.0.1:8090");
    std::env::set_var("POCKETBASE_ADMIN_EMAIL", "root@example.com");
    std::env::set_var("POCKETBASE_ADMIN_PASSWORD", "rootpassword");
    let config = AppConfig::from_env().unwrap();
    assert!(config.has_admin());
    assert_eq!(config.cors_origins, CorsOrigins::Any);
    clear_env();
}

#[test]
#[serial]
fn test_unknown_backend() {
    clear_env();
    std::env::set_var("AUTH_BACKEND", "sqlite");
    assert_eq!(
        AppConfig::from_env().unwrap_err(),
        ConfigError::UnknownBackend("sqlite".to_string())
    );
    clear_env();
}
