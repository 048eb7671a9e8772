use std::sync::Arc;

use crate::application::services::UrlService;
use crate::infrastructure::persistence::SqliteUrlRepository;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService<SqliteUrlRepository>>,
    /// Configured public prefix; `None` falls back to the `Host` header.
    pub base_url: Option<String>,
}

impl AppState {
    pub fn new(
        url_service: Arc<UrlService<SqliteUrlRepository>>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            url_service,
            base_url,
        }
    }
}
