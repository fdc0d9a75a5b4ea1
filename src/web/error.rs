//! HTTP rendering of [`AuthError`].
//!
//! | Error | Status |
//! |---|---|
//! | `InvalidCredentials`, `StaleSession` | 401 |
//! | `InvalidRequest` | 400 |
//! | `DuplicateAccount` | 409 |
//! | `StoreUnavailable` | 503 + `Retry-After` |
//! | `Provider` | 502 |
//! | `Internal` | 500 |
//!
//! Credential failures share one message so a client cannot probe which
//! ids exist. Detail of server-side failures goes to the log only.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::AuthError;

/// Seconds a client should wait before retrying a transient failure.
pub const RETRY_AFTER_SECS: u32 = 1;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl AuthError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::InvalidCredentials(_) => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AuthError::StaleSession => (StatusCode::UNAUTHORIZED, "stale_session"),
            AuthError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AuthError::DuplicateAccount(_) => (StatusCode::CONFLICT, "duplicate_account"),
            AuthError::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
            AuthError::Provider(_) => (StatusCode::BAD_GATEWAY, "provider_error"),
            AuthError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }

    fn public_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(_) => "invalid id or password".to_string(),
            AuthError::StaleSession => "session is no longer valid".to_string(),
            AuthError::InvalidRequest(_) | AuthError::DuplicateAccount(_) => self.to_string(),
            AuthError::StoreUnavailable(_) => {
                "service temporarily unavailable, try again".to_string()
            }
            AuthError::Provider(_) => "identity provider failed".to_string(),
            AuthError::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = ErrorBody {
            error: code,
            message: self.public_message(),
        };
        let mut res = (status, Json(body)).into_response();
        if self.is_transient() {
            res.headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECS));
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn credential_failures_share_one_message() {
        let unknown = AuthError::InvalidCredentials("no account with id x@local".into()).into_response();
        let wrong = AuthError::InvalidCredentials("incorrect password".into()).into_response();

        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(unknown).await, body_json(wrong).await);
    }

    #[tokio::test]
    async fn store_unavailable_is_retryable_503() {
        let res = AuthError::StoreUnavailable("timed out".into()).into_response();

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(res.headers()[header::RETRY_AFTER], "1");
        let body = body_json(res).await;
        assert_eq!(body["error"], "store_unavailable");
        assert!(!body["message"].as_str().unwrap().contains("timed out"));
    }

    #[test]
    fn statuses_follow_the_error_kind() {
        let cases = [
            (AuthError::DuplicateAccount("a@local".into()), StatusCode::CONFLICT),
            (AuthError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::Provider("x".into()), StatusCode::BAD_GATEWAY),
            (AuthError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AuthError::StaleSession, StatusCode::UNAUTHORIZED),
        ];
        for (err, status) in cases {
            let res = err.into_response();
            assert_eq!(res.status(), status);
            assert!(res.headers().get(header::RETRY_AFTER).is_none());
        }
    }
}
