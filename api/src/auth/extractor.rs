use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use certbox_common::caller::Caller;
use tracing::info;

use crate::{auth::AuthError, context::ApiContext, error::ApiError};

/// Extractor that resolves the caller of a request.
///
/// A request without an `Authorization` header yields
/// [`Caller::Anonymous`]. Any other authentication failure rejects the
/// request before the handler runs, so no storage work happens for it.
///
/// # Examples
///
/// ```rust,ignore
/// use certbox_api::auth::Auth;
///
/// pub async fn whoami(Auth(caller): Auth) -> String {
///     caller.account_id().unwrap_or("anonymous").to_string()
/// }
/// ```
pub struct Auth(pub Caller);

impl FromRequestParts<ApiContext> for Auth {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &ApiContext,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let authenticator = Arc::clone(&state.authenticator);
        async move {
            let identified = match bearer_credential(&parts.headers) {
                Ok(credential) => authenticator.identify(credential).await,
                Err(e) => Err(e),
            };

            match identified {
                Ok(account) => Ok(Auth(Caller::account(account))),
                Err(AuthError::MissingCredentials) => Ok(Auth(Caller::Anonymous)),
                Err(e) => {
                    let scheme = authenticator.scheme();
                    info!(scheme, error = %e, "request validation failure");
                    Err(ApiError::Auth(e))
                }
            }
        }
    }
}

/// Pull the bearer credential out of the `Authorization` header.
///
/// Returns `Ok(None)` when the header is absent. The scheme name is matched
/// case-insensitively.
pub fn bearer_credential(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidRequest("Authorization header is not valid text".into()))?;

    match value.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(Some(token.trim())),
        _ => Err(AuthError::InvalidCredentials),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &'static [u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(value).unwrap(),
        );
        headers
    }

    #[test]
    fn absent_header_is_no_credential() {
        assert_eq!(bearer_credential(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn bearer_token_extracted() {
        let headers = headers(b"Bearer abc.def.ghi");
        assert_eq!(bearer_credential(&headers).unwrap(), Some("abc.def.ghi"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let headers = headers(b"bearer token");
        assert_eq!(bearer_credential(&headers).unwrap(), Some("token"));
    }

    #[test]
    fn other_schemes_are_invalid() {
        let headers = headers(b"Basic dXNlcjpwYXNz");
        assert!(matches!(
            bearer_credential(&headers),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn scheme_without_token_is_invalid() {
        let headers = headers(b"Bearer");
        assert!(matches!(
            bearer_credential(&headers),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn opaque_bytes_are_bad_request() {
        let headers = headers(b"Bearer \xfftoken");
        assert!(matches!(
            bearer_credential(&headers),
            Err(AuthError::InvalidRequest(_))
        ));
    }
}
