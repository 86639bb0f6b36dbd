pub mod error;
pub mod extractor;
pub mod provider;
pub mod providers;

pub use error::AuthError;
pub use extractor::{Auth, bearer_credential};
pub use provider::Authenticator;
pub use providers::jwt::JwtAuthenticator;
