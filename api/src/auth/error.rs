use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Malformed credential parameters")]
    InvalidParameters,

    #[error("Invalid authentication request: {0}")]
    InvalidRequest(String),

    #[error("Authentication service failure: {0}")]
    ServiceFailure(String),
}

impl AuthError {
    /// Status code and response tag reported to the client for this failure.
    pub fn outcome(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingCredentials | Self::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid token")
            }
            Self::InvalidParameters => (StatusCode::BAD_REQUEST, "invalid parameters"),
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "bad request"),
            Self::ServiceFailure(_) => (StatusCode::INTERNAL_SERVER_ERROR, "unexpected error"),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature
            | ErrorKind::ExpiredSignature
            | ErrorKind::ImmatureSignature
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::MissingAlgorithm => Self::InvalidCredentials,

            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::InvalidParameters,

            ErrorKind::MissingRequiredClaim(claim) => {
                Self::InvalidRequest(format!("token is missing the `{claim}` claim"))
            }

            _ => Self::ServiceFailure(err.to_string()),
        }
    }
}
