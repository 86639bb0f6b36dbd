use async_trait::async_trait;

use super::error::AuthError;

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolve a bearer credential to an account identifier.
    ///
    /// `None` means the request carried no credential and must yield
    /// [`AuthError::MissingCredentials`].
    async fn identify(&self, credential: Option<&str>) -> Result<String, AuthError>;

    /// Name of this auth scheme (for debugging/logging)
    fn scheme(&self) -> &'static str;
}
