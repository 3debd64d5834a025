pub mod api_client;
pub mod config;
pub mod gallery;
pub mod images;
pub mod models;
pub mod ui;

use std::sync::Arc;

// Shared state для всего приложения
pub struct AppState {
    pub config: config::Config,
    pub api: api_client::CourtApiClient,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        let api = api_client::CourtApiClient::from_config(&config.api);
        Arc::new(Self { config, api })
    }
}
