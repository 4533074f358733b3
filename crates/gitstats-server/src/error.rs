use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// What a handler can fail with, rendered as a plain-text body
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Core(#[from] gitstats_core::Error),
}

impl ApiError {
    /// Missing or unusable query parameter
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Core(gitstats_core::Error::Validation(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Core(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body text, without the trailing newline
    pub fn message(&self) -> String {
        match self {
            ApiError::Core(e @ gitstats_core::Error::InvalidUrl) => {
                format!("Invalid repository URL: {}", e)
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", message);
        } else {
            tracing::debug!(status = status.as_u16(), "{}", message);
        }

        let mut response = (status, format!("{}\n", message)).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitstats_api::GitHubError;

    #[test]
    fn test_invalid_url_is_prefixed() {
        let err = ApiError::from(gitstats_core::Error::InvalidUrl);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message(),
            "Invalid repository URL: invalid GitHub repository URL"
        );
    }

    #[test]
    fn test_upstream_errors_are_500_verbatim() {
        let err = ApiError::from(gitstats_core::Error::from(GitHubError::Upstream {
            status: 404,
            body: "{\"message\":\"Not Found\"}".into(),
        }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.message(),
            "GitHub API returned status: 404, body: {\"message\":\"Not Found\"}"
        );
    }

    #[test]
    fn test_missing_parameter_is_a_validation_error() {
        let err = ApiError::bad_request("Organization name is required");
        assert!(matches!(err, ApiError::Core(gitstats_core::Error::Validation(_))));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Organization name is required");
    }

    #[test]
    fn test_response_is_plain_text() {
        let response = ApiError::bad_request("Organization name is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }
}
