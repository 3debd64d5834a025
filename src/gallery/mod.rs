//! Галерея квадры: подготовка набора изображений, раскладка плиток
//! и полноэкранный просмотр (лайтбокс).

pub mod layout;
pub mod lightbox;

use crate::images::{display_image_url, normalize_image_url};

/// Максимум плиток в раскладке; остальное уходит под бейдж «+N».
pub const MAX_TILES: usize = 5;

/// Упорядоченный набор изображений квадры после нормализации.
///
/// Обложка всегда первая; дубли обложки среди дополнительных снимков
/// отбрасываются. Показывается не больше [`MAX_TILES`] плиток, но полный
/// список сохраняется — по нему ходит лайтбокс и считается бейдж.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryImages {
    urls: Vec<String>,
}

impl GalleryImages {
    /// Собирает набор из обложки и дополнительных снимков.
    ///
    /// Пустая обложка заменяется картинкой по умолчанию, так что список
    /// никогда не бывает пустым.
    pub fn build(cover: &str, extras: Option<&[String]>, api_base: &str) -> Self {
        let cover = display_image_url(cover, api_base);

        let mut urls = vec![cover.clone()];
        if let Some(extras) = extras {
            for raw in extras {
                let url = normalize_image_url(raw, api_base);
                if url.is_empty() || url == cover {
                    continue;
                }
                urls.push(url);
            }
        }

        Self { urls }
    }

    /// Полный упорядоченный список — для лайтбокса.
    pub fn all(&self) -> &[String] {
        &self.urls
    }

    /// Отображаемое подмножество, не больше [`MAX_TILES`] элементов.
    pub fn displayed(&self) -> &[String] {
        &self.urls[..self.urls.len().min(MAX_TILES)]
    }

    pub fn total(&self) -> usize {
        self.urls.len()
    }

    /// Сколько снимков скрыто за бейджем «+N»; 0 — бейджа нет.
    pub fn overflow(&self) -> usize {
        self.urls.len().saturating_sub(MAX_TILES)
    }
}
