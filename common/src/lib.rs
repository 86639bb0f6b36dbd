//! Types shared between the certbox API server and its clients.

pub mod caller;
pub mod params;
pub mod token;
pub mod views;

/// Path of the certificate endpoint.
pub const CERT_PATH: &str = "/v1/cert";

/// Media type that marks a request body as a certificate upload.
pub const PEM_CONTENT_TYPE: &str = "application/x-pem-file";

/// Media type of every response body produced by the API.
pub const JSON_CONTENT_TYPE: &str = "application/json";
