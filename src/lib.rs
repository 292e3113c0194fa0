pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{content_service::ContentService, session_service::SessionService};

#[derive(Clone)]
pub struct AppState {
    pub content_service: ContentService,
    pub session_service: SessionService,
}

impl AppState {
    pub fn new(content_service: ContentService) -> Self {
        let config = crate::config::get_config();
        let session_service = SessionService::new(
            config.session_ttl_minutes,
            config.default_passing_score,
        );

        Self {
            content_service,
            session_service,
        }
    }
}
