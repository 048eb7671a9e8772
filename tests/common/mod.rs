#![allow(dead_code)]

use sqlx::SqlitePool;
use std::sync::Arc;
use url_shortener::application::services::DuplicatePolicy;
use url_shortener::config::Config;
use url_shortener::infrastructure::persistence::database;
use url_shortener::server::build_state;
use url_shortener::state::AppState;
use url_shortener::utils::id_codec::IdCodec;
use url_shortener::utils::password::hash_password;

pub const TEST_BASE_URL: &str = "https://s.test.com";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        base_url: Some(TEST_BASE_URL.to_string()),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        id_codec: IdCodec::default(),
        id_max_attempts: 100,
        duplicate_policy: DuplicatePolicy::ReuseExisting,
        session_secret: "test-signing-secret-0123456789".to_string(),
        edit_token_ttl_seconds: 3600,
        db_max_connections: 1,
        db_connect_timeout: 5,
    }
}

pub async fn test_pool() -> Arc<SqlitePool> {
    Arc::new(database::connect_in_memory().await.unwrap())
}

pub async fn create_test_state() -> (AppState, Arc<SqlitePool>) {
    create_test_state_with(test_config()).await
}

pub async fn create_test_state_with(config: Config) -> (AppState, Arc<SqlitePool>) {
    let pool = test_pool().await;
    let state = build_state(&config, pool.clone());
    (state, pool)
}

/// Inserts an entry directly, bypassing identifier generation.
pub async fn create_test_entry(pool: &SqlitePool, short_id: &str, url: &str, password: Option<&str>) {
    let digest = password.map(|p| hash_password(p).unwrap());

    sqlx::query(
        "INSERT INTO urls (short_id, url, created, password, can_be_modified) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(short_id)
    .bind(url)
    .bind(chrono::Utc::now().timestamp())
    .bind(&digest)
    .bind(digest.is_some())
    .execute(pool)
    .await
    .unwrap();
}
