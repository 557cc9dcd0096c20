//! Bearer credential extraction
//!
//! Credentials travel as `<prefix><token>` in a named header, e.g.
//! `Authorization: Bearer eyJ...`.

use axum::http::{HeaderMap, HeaderName};

/// Extract the token following `prefix` in header `name`
///
/// Returns `None` when the header is absent, not visible ASCII, lacks the
/// prefix, or carries an empty token. The prefix match ignores ASCII case.
pub fn extract_bearer(headers: &HeaderMap, name: &HeaderName, prefix: &str) -> Option<String> {
    let value = headers.get(name)?.to_str().ok()?;

    let head = value.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }

    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Like [`extract_bearer`], but also accepts a bare token with no prefix
///
/// A bare value must be a single word, so `Basic abc` is still rejected.
pub fn extract_bearer_or_bare(
    headers: &HeaderMap,
    name: &HeaderName,
    prefix: &str,
) -> Option<String> {
    if let Some(token) = extract_bearer(headers, name, prefix) {
        return Some(token);
    }

    let value = headers.get(name)?.to_str().ok()?.trim();
    if value.is_empty() || value.contains(char::is_whitespace) {
        return None;
    }
    Some(value.to_string())
}

/// Normalize a configured prefix so it ends with exactly one space
///
/// `"Bearer"` and `"Bearer   "` both become `"Bearer "`.
pub fn normalize_prefix(prefix: &str) -> String {
    format!("{} ", prefix.trim_end())
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, header};

    use super::*;

    fn headers(name: &HeaderName, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name.clone(), HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extract_bearer() {
        let h = headers(&header::AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(
            extract_bearer(&h, &header::AUTHORIZATION, "Bearer "),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_bearer_custom_header() {
        let name = HeaderName::from_static("x-refresh-token");
        let h = headers(&name, "bearer r1");
        assert_eq!(extract_bearer(&h, &name, "Bearer "), Some("r1".to_string()));
    }

    #[test]
    fn test_extract_bearer_rejects() {
        let name = header::AUTHORIZATION;
        assert_eq!(extract_bearer(&HeaderMap::new(), &name, "Bearer "), None);
        assert_eq!(extract_bearer(&headers(&name, "Basic abc"), &name, "Bearer "), None);
        assert_eq!(extract_bearer(&headers(&name, "Bearer "), &name, "Bearer "), None);
        assert_eq!(extract_bearer(&headers(&name, "Bear"), &name, "Bearer "), None);
        assert_eq!(extract_bearer(&headers(&name, "abc.def.ghi"), &name, "Bearer "), None);
    }

    #[test]
    fn test_extract_bearer_or_bare() {
        let name = HeaderName::from_static("x-refresh-token");
        assert_eq!(
            extract_bearer_or_bare(&headers(&name, "Bearer r1"), &name, "Bearer "),
            Some("r1".to_string())
        );
        assert_eq!(
            extract_bearer_or_bare(&headers(&name, "abc.def.ghi"), &name, "Bearer "),
            Some("abc.def.ghi".to_string())
        );
        assert_eq!(extract_bearer_or_bare(&HeaderMap::new(), &name, "Bearer "), None);
        assert_eq!(extract_bearer_or_bare(&headers(&name, "Bearer "), &name, "Bearer "), None);
        assert_eq!(extract_bearer_or_bare(&headers(&name, "Basic abc"), &name, "Bearer "), None);
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("Bearer"), "Bearer ");
        assert_eq!(normalize_prefix("Bearer "), "Bearer ");
        assert_eq!(normalize_prefix("Token   "), "Token ");
    }
}
