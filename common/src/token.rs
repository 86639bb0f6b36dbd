//! Claims carried by certbox bearer tokens.

use serde::{Deserialize, Serialize};

/// Claims the API reads from a bearer JWT.
///
/// Every field is optional at the type level so that a token missing a
/// claim is reported as a bad request instead of a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Canonical email of the account, preferred over `sub`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl AccountClaims {
    /// The account identifier named by these claims.
    ///
    /// Uses `email` when present, otherwise `sub` if it looks like an
    /// address. Surrounding whitespace is dropped; blank values count as
    /// missing.
    pub fn account_id(&self) -> Option<String> {
        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());

        let subject = self
            .sub
            .as_deref()
            .map(str::trim)
            .filter(|s| s.contains('@'));

        email.or(subject).map(str::to_string)
    }
}
