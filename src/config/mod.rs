use serde::Deserialize;
use std::env;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub upload: UploadConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub rust_log: String,
}

// Настройки внешнего API квадр
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl ApiConfig {
    /// База без суффикса `/api` — адрес, с которого раздаётся статика.
    pub fn origin(&self) -> &str {
        crate::images::api_origin(&self.base_url)
    }
}

// Настройки загрузки изображений
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_size_mb: u64,
}

impl UploadConfig {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb * 1024 * 1024
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "futzer_client=debug".to_string()),
            },
            api: ApiConfig {
                base_url: env::var("API_URL")
                    .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
                timeout_seconds: env::var("API_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("API_TIMEOUT_SECONDS must be a valid number"),
            },
            upload: UploadConfig {
                max_size_mb: env::var("UPLOAD_MAX_SIZE_MB")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .expect("UPLOAD_MAX_SIZE_MB must be a valid number"),
            },
        }
    }
}
