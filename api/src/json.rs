use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use certbox_common::JSON_CONTENT_TYPE;
use serde::Serialize;

/// A JSON response rendered with two-space indentation.
#[derive(Debug, Clone)]
pub struct PrettyJson<T>(pub StatusCode, pub T);

impl<T> PrettyJson<T> {
    pub fn ok(body: T) -> Self {
        Self(StatusCode::OK, body)
    }
}

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        let content_type = [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        )];

        match serde_json::to_vec_pretty(&self.1) {
            Ok(body) => (self.0, content_type, body).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response body: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    content_type,
                    "{\n  \"status\": \"unexpected error\"\n}",
                )
                    .into_response()
            }
        }
    }
}
