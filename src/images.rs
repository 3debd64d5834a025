//! images.rs
//!
//! Нормализация URL изображений, приходящих из внешнего API.
//!
//! API иногда отдаёт битые адреса: хост, склеенный с уже абсолютным URL
//! (`https://api.example.comhttps://cdn.example.com/x.jpg`), относительные
//! пути вида `/uploads/...` или `uploads/...` без схемы. Вся починка
//! изолирована в `normalize_image_url` — это совместимый костыль под
//! конкретный формат порчи, а не универсальный парсер URL; при замене
//! на нормальный разбор достаточно поменять одну функцию.

/// Картинка по умолчанию, когда у квадры нет пригодной обложки.
pub const FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1529900748604-07564a03e7a6?w=800&h=600&fit=crop";

/// База API без суффикса `/api` — то, что реально отдаёт статику.
pub fn api_origin(api_base: &str) -> &str {
    let trimmed = api_base.trim_end_matches('/');
    trimmed.strip_suffix("/api").unwrap_or(trimmed)
}

// Ищет второе вхождение протокола, начиная с байтового смещения `from`.
// `get` вместо индексации, чтобы не паниковать на границах UTF-8.
fn duplicated_protocol_at(url: &str, proto: &str, from: usize) -> Option<usize> {
    url.get(from..).and_then(|tail| tail.find(proto)).map(|i| from + i)
}

/// Приводит строку с URL изображения к каноническому виду.
///
/// Тотальная функция: никогда не паникует, пустой вход даёт пустой выход.
/// Порядок шагов важен — сперва починка задвоенного протокола, потом
/// уже проверка «и так абсолютный».
pub fn normalize_image_url(raw: &str, api_base: &str) -> String {
    let url = raw.trim();
    if url.is_empty() {
        return String::new();
    }

    // 1. Задвоенный протокол: второй `https://` не раньше смещения 8,
    //    второй `http://` не раньше 7. Всё до него — мусорный префикс.
    //    Единственное вхождение в начале строки сюда не попадает.
    if let Some(i) = duplicated_protocol_at(url, "https://", 8)
        .or_else(|| duplicated_protocol_at(url, "http://", 7))
    {
        return url[i..].to_string();
    }

    // 2. Уже абсолютный URL — отдаём как есть.
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }

    // 3. Пути загрузок относительно API.
    if url.starts_with("/uploads/") {
        return format!("{}{}", api_origin(api_base), url);
    }
    if url.starts_with("uploads/") {
        return format!("{}/{}", api_base.trim_end_matches('/'), url);
    }

    // 4. Всё остальное считаем валидным в контексте вызывающего.
    url.to_string()
}

/// Можно ли вообще показывать такой URL: непустой, со схемой http(s)
/// и не тестовая заглушка.
pub fn is_displayable_image_url(url: &str) -> bool {
    !url.is_empty()
        && url.starts_with("http")
        && !url.contains("example.com")
        && !url.contains("placeholder.com")
}

/// Нормализует и подставляет картинку по умолчанию, если показывать нечего.
pub fn display_image_url(raw: &str, api_base: &str) -> String {
    let normalized = normalize_image_url(raw, api_base);
    if is_displayable_image_url(&normalized) {
        normalized
    } else {
        FALLBACK_IMAGE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BASE: &str = "http://localhost:8000/api";

    #[test]
    fn empty_and_whitespace_input() {
        assert_eq!(normalize_image_url("", BASE), "");
        assert_eq!(normalize_image_url("   ", BASE), "");
    }

    #[test]
    fn repairs_duplicated_https_protocol() {
        let corrupted = "https://host.example.comhttps://cdn.example.com/a.jpg";
        assert_eq!(
            normalize_image_url(corrupted, BASE),
            "https://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn repairs_duplicated_http_protocol() {
        let corrupted = "http://localhost:8000http://cdn.futzer.app/quadra.png";
        assert_eq!(
            normalize_image_url(corrupted, BASE),
            "http://cdn.futzer.app/quadra.png"
        );
    }

    #[test]
    fn repairs_mixed_protocols() {
        let corrupted = "https://api.futzer.apphttp://cdn.futzer.app/q.webp";
        assert_eq!(
            normalize_image_url(corrupted, BASE),
            "http://cdn.futzer.app/q.webp"
        );
    }

    #[test]
    fn single_protocol_passes_through() {
        let url = "https://images.unsplash.com/photo-1529900748604?w=800";
        assert_eq!(normalize_image_url(url, BASE), url);

        let url = "http://localhost:8000/static/campo.jpg";
        assert_eq!(normalize_image_url(url, BASE), url);
    }

    #[test]
    fn prefixes_absolute_uploads_path_with_origin() {
        assert_eq!(
            normalize_image_url("/uploads/x.png", BASE),
            "http://localhost:8000/uploads/x.png"
        );
    }

    #[test]
    fn prefixes_relative_uploads_path_with_api_base() {
        assert_eq!(
            normalize_image_url("uploads/x.png", BASE),
            "http://localhost:8000/api/uploads/x.png"
        );
    }

    #[test]
    fn unknown_relative_path_is_untouched() {
        assert_eq!(normalize_image_url("static/logo.svg", BASE), "static/logo.svg");
    }

    #[test]
    fn survives_multibyte_input() {
        // Смещения 7/8 могут попасть внутрь многобайтового символа.
        assert_eq!(normalize_image_url("квадра-№1.jpg", BASE), "квадра-№1.jpg");
    }

    #[test]
    fn api_origin_strips_api_suffix() {
        assert_eq!(api_origin("http://localhost:8000/api"), "http://localhost:8000");
        assert_eq!(api_origin("http://localhost:8000/api/"), "http://localhost:8000");
        assert_eq!(api_origin("http://localhost:8000"), "http://localhost:8000");
    }

    #[test]
    fn displayable_filters_test_hosts() {
        assert!(is_displayable_image_url("https://cdn.futzer.app/a.jpg"));
        assert!(!is_displayable_image_url(""));
        assert!(!is_displayable_image_url("/uploads/a.jpg"));
        assert!(!is_displayable_image_url("https://example.com/a.jpg"));
        assert!(!is_displayable_image_url("https://via.placeholder.com/150"));
    }

    #[test]
    fn display_falls_back_to_default_picture() {
        assert_eq!(display_image_url("", BASE), FALLBACK_IMAGE);
        assert_eq!(display_image_url("https://example.com/x.jpg", BASE), FALLBACK_IMAGE);
        assert_eq!(
            display_image_url("/uploads/x.png", BASE),
            "http://localhost:8000/uploads/x.png"
        );
    }

    proptest! {
        // Любой корректный абсолютный URL с единственным протоколом
        // обязан пройти без изменений.
        #[test]
        fn wellformed_absolute_urls_pass_through(path in "[a-gik-z0-9./_-]{0,40}") {
            prop_assume!(!path.contains("http"));

            let https = format!("https://cdn.futzer.app/{path}");
            prop_assert_eq!(normalize_image_url(&https, BASE), https.clone());

            let http = format!("http://cdn.futzer.app/{path}");
            prop_assert_eq!(normalize_image_url(&http, BASE), http.clone());
        }

        // Нормализация тотальна: не паникует ни на каком входе.
        #[test]
        fn never_panics(raw in "\\PC{0,64}") {
            let _ = normalize_image_url(&raw, BASE);
        }
    }
}
