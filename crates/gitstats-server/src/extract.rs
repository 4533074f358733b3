// Query string and auth header helpers shared by the handlers
use axum::http::{header, HeaderMap};
use url::form_urlencoded;

/// Decoded query pairs, in order. Empty values are treated as absent.
#[derive(Debug, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// First non-empty value for `name`
    pub fn first(&self, name: &str) -> Option<&str> {
        self.all(name).into_iter().next()
    }

    /// Every non-empty value for `name`, in query order
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, v)| k == name && !v.is_empty())
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// 1-based page number; junk, zero and negatives all mean page 1
    pub fn page(&self) -> u32 {
        self.first("page")
            .and_then(|p| p.parse::<u32>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }
}

/// Token from `Authorization`, with any `Bearer ` prefix removed
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_first_skips_empty_values() {
        let params = QueryParams::parse(Some("repo=&repo=https%3A%2F%2Fgithub.com%2Fa%2Fb&repo=x"));
        assert_eq!(params.first("repo"), Some("https://github.com/a/b"));
        assert_eq!(params.all("repo").len(), 2);
        assert_eq!(params.first("org"), None);
    }

    #[test]
    fn test_no_query_at_all() {
        let params = QueryParams::parse(None);
        assert!(params.all("repo").is_empty());
        assert_eq!(params.page(), 1);
    }

    #[test]
    fn test_page_defaults() {
        assert_eq!(QueryParams::parse(Some("page=3")).page(), 3);
        assert_eq!(QueryParams::parse(Some("page=0")).page(), 1);
        assert_eq!(QueryParams::parse(Some("page=-2")).page(), 1);
        assert_eq!(QueryParams::parse(Some("page=lots")).page(), 1);
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer ghp_abc"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("ghp_abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("ghp_raw"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("ghp_raw"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
