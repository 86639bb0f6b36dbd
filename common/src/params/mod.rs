//! Input parameters for the certbox API.

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Query parameters accepted by the certificate endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CertQuery {
    /// Account whose latest certificate should be returned. Defaults to the
    /// authenticated caller when omitted or empty.
    pub email: Option<String>,
}

impl CertQuery {
    /// Build from raw query pairs, keeping the first `email` value only.
    ///
    /// An empty first value is treated as absent; later values are never
    /// consulted.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let email = pairs
            .into_iter()
            .find(|(key, _)| key.as_ref() == "email")
            .map(|(_, value)| value.into())
            .filter(|value: &String| !value.is_empty());

        Self { email }
    }
}
