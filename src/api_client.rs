//! api_client.rs
//!
//! Этот модуль реализует клиент внешнего API квадр. Вся бизнес-логика —
//! хранение, цены, доступность — живёт на стороне API; клиент только
//! ходит по HTTP и разбирает ответы.
//!
//! Ключевые моменты:
//! 1.  **CourtApiClient**: один экземпляр `reqwest::Client` с таймаутом
//!     из конфигурации, разделяемый всем приложением.
//! 2.  **ApiError**: таксономия ошибок — транспорт, «не найдено» и отказ
//!     API с человекочитаемым `detail` из тела ответа.
//! 3.  Никаких автоматических повторов: ошибка показывается пользователю,
//!     повтор — его явное действие.

use reqwest::multipart;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::ApiConfig;
use crate::images::normalize_image_url;
use crate::models::{Court, CourtDraft, CourtQuery};

/// Ошибки при работе с внешним API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Сетевая или транспортная ошибка (таймаут, DNS, обрыв соединения).
    #[error("falha de comunicação com a API: {0}")]
    Transport(#[from] reqwest::Error),
    /// Запрошенной квадры не существует.
    #[error("quadra não encontrada")]
    NotFound,
    /// API отверг запрос; `detail` — сообщение из тела ответа.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

// Тело ошибки API: {"detail": "..."}
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: Option<String>,
}

// Ответ на загрузку изображения.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Клиент внешнего API аренды квадр.
#[derive(Debug, Clone)]
pub struct CourtApiClient {
    /// Асинхронный HTTP-клиент.
    http_client: reqwest::Client,
    /// Базовый URL API (с суффиксом `/api`).
    base_url: String,
}

impl CourtApiClient {
    /// Создает и конфигурирует клиент на основе настроек приложения.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds)) // Таймаут для HTTP-запросов.
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Список квадр, опционально отфильтрованный по типу, городу,
    /// виду спорта и максимальной цене.
    pub async fn list_courts(&self, query: &CourtQuery) -> Result<Vec<Court>, ApiError> {
        let mut url = format!("{}/quadras/", self.base_url);
        if !query.is_empty() {
            let qs = serde_urlencoded::to_string(query).unwrap_or_default();
            url.push('?');
            url.push_str(&qs);
        }

        let response = self.http_client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    /// Одна квадра по идентификатору; 404 превращается в `NotFound`.
    pub async fn get_court(&self, id: &str) -> Result<Court, ApiError> {
        let url = format!("{}/quadras/{}", self.base_url, id);
        let response = self.http_client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    /// Создаёт квадру; черновик уже провалидирован на клиенте.
    pub async fn create_court(&self, draft: &CourtDraft) -> Result<Court, ApiError> {
        info!("Creating court: {}", draft.nome);
        let url = format!("{}/quadras/", self.base_url);
        let response = self.http_client.post(&url).json(draft).send().await?;
        Self::parse_response(response).await
    }

    /// Полностью перезаписывает существующую запись.
    pub async fn update_court(&self, id: &str, draft: &CourtDraft) -> Result<Court, ApiError> {
        info!("Updating court {}: {}", id, draft.nome);
        let url = format!("{}/quadras/{}", self.base_url, id);
        let response = self.http_client.put(&url).json(draft).send().await?;
        Self::parse_response(response).await
    }

    /// Удаляет квадру.
    pub async fn delete_court(&self, id: &str) -> Result<(), ApiError> {
        info!("Deleting court {}", id);
        let url = format!("{}/quadras/{}", self.base_url, id);
        let response = self.http_client.delete(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(())
    }

    /// Однократная загрузка изображения: без чанков, без докачки.
    ///
    /// Возвращаемый URL сразу прогоняется через нормализатор — API
    /// исторически отдаёт и относительные пути, и склеенные адреса.
    pub async fn upload_image(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        info!("Uploading image {} ({} bytes)", file_name, bytes.len());

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = multipart::Form::new().part("file", part);

        let url = format!("{}/upload", self.base_url);
        let response = self.http_client.post(&url).multipart(form).send().await?;

        let uploaded: UploadResponse = Self::parse_response(response).await?;
        Ok(normalize_image_url(&uploaded.url, &self.base_url))
    }

    // Общий разбор ответа: 404 -> NotFound, прочие неуспехи -> Rejected
    // с detail из тела, успех -> JSON нужного типа.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            return Err(Self::rejection(response).await);
        }

        Ok(response.json::<T>().await?)
    }

    async fn rejection(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let detail = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| "Erro inesperado na API".to_string());

        error!("API rejected request: status={}, detail={}", status, detail);
        ApiError::Rejected { status, detail }
    }
}
