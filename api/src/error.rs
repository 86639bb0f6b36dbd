use axum::{http::StatusCode, response::IntoResponse};
use certbox_common::views::CertResponse;
use certbox_db::storage::StoreError;
use thiserror::Error;

use crate::{auth::AuthError, json::PrettyJson};

const UNEXPECTED_ERROR: &str = "unexpected error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    InternalAnyhow(#[from] anyhow::Error),
}

impl ApiError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalAnyhow(anyhow::anyhow!(msg.into()))
    }

    /// Status code and `status` tag reported for this error.
    pub fn outcome(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Auth(ae) => ae.outcome(),
            Self::Storage(_) | Self::InternalAnyhow(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            // Authentication failures are routine; they are logged where
            // they are detected.
            Self::Auth(_) => {}
            _ => tracing::error!("Error returned by handler: {self}"),
        }

        let (status_code, tag) = self.outcome();
        PrettyJson(status_code, CertResponse::failure(tag)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_unexpected() {
        let err = ApiError::from(StoreError::Internal("disk on fire".into()));
        assert_eq!(
            err.outcome(),
            (StatusCode::INTERNAL_SERVER_ERROR, "unexpected error")
        );
    }

    #[test]
    fn auth_errors_keep_their_outcome() {
        let err = ApiError::from(AuthError::InvalidParameters);
        assert_eq!(err.outcome(), (StatusCode::BAD_REQUEST, "invalid parameters"));
    }

    #[test]
    fn response_is_json_with_status_tag() {
        let response = ApiError::from(AuthError::InvalidCredentials).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );
    }
}
