//! Bearer JWT authentication provider.
//!
//! Verifies `Authorization: Bearer <jwt>` credentials against either a shared
//! HS256 secret or an Ed25519 public key, and resolves the token's claims to
//! an account identifier (see [`AccountClaims::account_id`]).
//!
//! Tokens must carry an `exp` claim. When an issuer is configured the `iss`
//! claim must match it; `aud` is only checked when an audience is
//! configured.

use async_trait::async_trait;
use certbox_common::token::AccountClaims;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::{debug, instrument};

use crate::auth::{error::AuthError, provider::Authenticator};

pub struct JwtAuthenticator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    /// Accept HS256 tokens signed with `secret`.
    pub fn from_secret(secret: &[u8], issuer: Option<&str>, audience: Option<&str>) -> Self {
        Self {
            key: DecodingKey::from_secret(secret),
            validation: Self::validation(Algorithm::HS256, issuer, audience),
        }
    }

    /// Accept EdDSA tokens verifiable with a PEM-encoded Ed25519 public key.
    pub fn from_ed_pem(
        pem: &[u8],
        issuer: Option<&str>,
        audience: Option<&str>,
    ) -> Result<Self, AuthError> {
        let key = DecodingKey::from_ed_pem(pem)
            .map_err(|e| AuthError::ServiceFailure(format!("invalid verification key: {e}")))?;

        Ok(Self {
            key,
            validation: Self::validation(Algorithm::EdDSA, issuer, audience),
        })
    }

    fn validation(alg: Algorithm, issuer: Option<&str>, audience: Option<&str>) -> Validation {
        let mut validation = Validation::new(alg);
        validation.set_required_spec_claims(&["exp"]);

        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        validation
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    #[instrument(skip_all, fields(scheme = "jwt"))]
    async fn identify(&self, credential: Option<&str>) -> Result<String, AuthError> {
        let token = credential.ok_or(AuthError::MissingCredentials)?;
        if token.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let data = decode::<AccountClaims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(error = %e, "Token rejected");
            AuthError::from(e)
        })?;

        data.claims
            .account_id()
            .ok_or_else(|| AuthError::InvalidRequest("token does not name an account".into()))
    }

    fn scheme(&self) -> &'static str {
        "jwt"
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    const SECRET: &[u8] = b"test-secret";
    const ISSUER: &str = "http://localhost:4000";

    fn claims(email: Option<&str>) -> AccountClaims {
        AccountClaims {
            sub: Some("user-1".into()),
            email: email.map(str::to_string),
            iss: Some(ISSUER.into()),
            exp: Some((Utc::now() + Duration::hours(1)).timestamp()),
            ..Default::default()
        }
    }

    fn sign(claims: &AccountClaims, secret: &[u8]) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn authenticator() -> JwtAuthenticator {
        JwtAuthenticator::from_secret(SECRET, Some(ISSUER), None)
    }

    #[tokio::test]
    async fn valid_token_yields_email() {
        let token = sign(&claims(Some("alice@example.com")), SECRET);
        let id = authenticator().identify(Some(&token)).await.unwrap();
        assert_eq!(id, "alice@example.com");
    }

    #[tokio::test]
    async fn no_credential_is_missing() {
        let err = authenticator().identify(None).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[tokio::test]
    async fn empty_credential_is_invalid() {
        let err = authenticator().identify(Some("")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let token = sign(&claims(Some("alice@example.com")), b"another-secret");
        let err = authenticator().identify(Some(&token)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn expired_token_is_invalid() {
        let mut expired = claims(Some("alice@example.com"));
        expired.exp = Some((Utc::now() - Duration::hours(1)).timestamp());

        let err = authenticator()
            .identify(Some(&sign(&expired, SECRET)))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn foreign_issuer_is_invalid() {
        let mut foreign = claims(Some("alice@example.com"));
        foreign.iss = Some("https://elsewhere.example.com".into());

        let err = authenticator()
            .identify(Some(&sign(&foreign, SECRET)))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid_parameters() {
        let err = authenticator()
            .identify(Some("not-a-jwt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidParameters));
    }

    #[tokio::test]
    async fn missing_expiry_is_bad_request() {
        let mut no_exp = claims(Some("alice@example.com"));
        no_exp.exp = None;

        let err = authenticator()
            .identify(Some(&sign(&no_exp, SECRET)))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn token_without_account_is_bad_request() {
        let token = sign(&claims(None), SECRET);
        let err = authenticator().identify(Some(&token)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn audience_checked_when_configured() {
        let auth = JwtAuthenticator::from_secret(SECRET, Some(ISSUER), Some("certbox"));

        let mut wrong_aud = claims(Some("alice@example.com"));
        wrong_aud.aud = Some("other".into());
        let err = auth.identify(Some(&sign(&wrong_aud, SECRET))).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let mut right_aud = claims(Some("alice@example.com"));
        right_aud.aud = Some("certbox".into());
        let id = auth.identify(Some(&sign(&right_aud, SECRET))).await.unwrap();
        assert_eq!(id, "alice@example.com");
    }

    #[test]
    fn rejects_non_pem_verification_key() {
        let result = JwtAuthenticator::from_ed_pem(b"not a pem", None, None);
        assert!(matches!(result, Err(AuthError::ServiceFailure(_))));
    }
}
