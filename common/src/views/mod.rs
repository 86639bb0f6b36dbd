//! Output views for the certbox API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every response from the certificate endpoint.
///
/// Both fields are omitted from the serialized object when unset, so a
/// successful upload or an empty lookup renders as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CertResponse {
    /// Latest certificate stored for the requested account, in PEM format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,

    /// Short failure tag, present only when the request was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CertResponse {
    pub fn with_cert(cert: impl Into<String>) -> Self {
        Self {
            cert: Some(cert.into()),
            status: None,
        }
    }

    pub fn failure(status: impl Into<String>) -> Self {
        Self {
            cert: None,
            status: Some(status.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response_serializes_to_empty_object() {
        let json = serde_json::to_string(&CertResponse::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn found_cert_only_carries_cert() {
        let json = serde_json::to_value(CertResponse::with_cert("PEM")).unwrap();
        assert_eq!(json, serde_json::json!({ "cert": "PEM" }));
    }

    #[test]
    fn failure_only_carries_status() {
        let json = serde_json::to_value(CertResponse::failure("invalid token")).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "invalid token" }));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let parsed: CertResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, CertResponse::default());
    }
}
