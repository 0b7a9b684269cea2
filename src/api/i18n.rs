//! Request language detection
//!
//! Order: explicit `lang` query parameter, then `Accept-Language` by q-weight,
//! then the configured default.

use axum::http::{header, HeaderMap};

use crate::models::Language;

/// Resolve the language a response should be rendered in
pub fn resolve_language(lang: Option<&str>, headers: &HeaderMap, default: Language) -> Language {
    if let Some(language) = lang.and_then(Language::from_code) {
        return language;
    }

    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(detect_from_accept_language)
        .unwrap_or(default)
}

/// Highest-weighted supported language in an `Accept-Language` value.
///
/// Ties keep header order; ranges with `q=0` are skipped.
pub fn detect_from_accept_language(value: &str) -> Option<Language> {
    let mut ranges: Vec<(Language, f32)> = value
        .split(',')
        .filter_map(|range| {
            let mut parts = range.split(';');
            let tag = parts.next()?.trim();
            let quality = parts
                .filter_map(|param| param.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            let language = Language::from_code(tag)?;
            (quality > 0.0).then_some((language, quality))
        })
        .collect();

    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranges.first().map(|(language, _)| *language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(accept_language: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_str(accept_language).unwrap(),
        );
        headers
    }

    #[test]
    fn test_query_parameter_wins() {
        let lang = resolve_language(Some("bg"), &headers("en-US,en;q=0.9"), Language::En);
        assert_eq!(lang, Language::Bg);
    }

    #[test]
    fn test_unknown_query_parameter_falls_through() {
        let lang = resolve_language(Some("de"), &headers("bg-BG"), Language::En);
        assert_eq!(lang, Language::Bg);
    }

    #[test]
    fn test_default_without_hints() {
        assert_eq!(resolve_language(None, &HeaderMap::new(), Language::Bg), Language::Bg);
        assert_eq!(resolve_language(None, &headers("fr, de"), Language::En), Language::En);
    }

    #[test]
    fn test_accept_language_weights() {
        assert_eq!(detect_from_accept_language("en;q=0.4, bg;q=0.8"), Some(Language::Bg));
        assert_eq!(detect_from_accept_language("de, bg;q=0.5, en;q=0.7"), Some(Language::En));
        assert_eq!(detect_from_accept_language("bg, en"), Some(Language::Bg));
        assert_eq!(detect_from_accept_language("bg;q=0, en;q=0.1"), Some(Language::En));
        assert_eq!(detect_from_accept_language("*"), None);
        assert_eq!(detect_from_accept_language(""), None);
    }
}
