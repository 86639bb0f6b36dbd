use clap::{Parser, ValueEnum};
use std::{net::SocketAddr, path::PathBuf};

use crate::auth::JwtAuthenticator;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    /// Persist certificates in MongoDB.
    Mongodb,
    /// Keep certificates in process memory (development only).
    Memory,
}

#[derive(Clone, Debug, Parser)]
#[command(name = "certbox-api", version, about = "Per-account certificate store")]
pub struct CertboxApiConfig {
    #[clap(
        short,
        long,
        env = "CERTBOX_API_BIND_ADDR",
        default_value = "0.0.0.0:4000"
    )]
    pub bind_addr: SocketAddr,

    #[clap(
        long,
        env = "CERTBOX_API_PUBLIC_URL",
        default_value = "http://localhost:4000"
    )]
    pub public_url: String,

    #[clap(long, default_value_t = false)]
    pub dump_openapi: bool,

    #[clap(
        long,
        value_enum,
        env = "CERTBOX_API_STORAGE",
        default_value_t = StorageBackend::Mongodb
    )]
    pub storage: StorageBackend,

    #[clap(
        long,
        env = "CERTBOX_API_MONGODB_URI",
        default_value = "mongodb://localhost:27017/certbox"
    )]
    pub mongodb_uri: String,

    /// Shared secret for HS256 bearer tokens.
    ///
    /// Takes precedence over `jwt_public_key` and `jwt_public_key_file`.
    #[clap(long, env = "CERTBOX_API_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Ed25519 public key (PEM) for verifying EdDSA bearer tokens.
    ///
    /// Example PEM format:
    /// ```text
    /// -----BEGIN PUBLIC KEY-----
    /// MCowBQYDK2VwAyEA...
    /// -----END PUBLIC KEY-----
    /// ```
    #[clap(long, env = "CERTBOX_API_JWT_PUBLIC_KEY")]
    pub jwt_public_key: Option<String>,

    /// Path to an Ed25519 public key file (PEM format).
    #[clap(long, env = "CERTBOX_API_JWT_PUBLIC_KEY_FILE")]
    pub jwt_public_key_file: Option<PathBuf>,

    /// Required `iss` claim. Defaults to `public_url`.
    #[clap(long, env = "CERTBOX_API_JWT_ISSUER")]
    pub jwt_issuer: Option<String>,

    /// Required `aud` claim. Audience is not checked when unset.
    #[clap(long, env = "CERTBOX_API_JWT_AUDIENCE")]
    pub jwt_audience: Option<String>,
}

impl CertboxApiConfig {
    /// Issuer that bearer tokens must name.
    pub fn issuer(&self) -> &str {
        self.jwt_issuer.as_deref().unwrap_or(&self.public_url)
    }

    /// Get the token verification key PEM from either inline config or file.
    ///
    /// # Errors
    ///
    /// Returns an error if neither is configured, or if the file can't be
    /// read.
    pub fn get_public_key_pem(&self) -> anyhow::Result<String> {
        if let Some(ref key) = self.jwt_public_key {
            return Ok(key.clone());
        }

        if let Some(ref path) = self.jwt_public_key_file {
            return std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("failed to read JWT public key file: {}", e));
        }

        Err(anyhow::anyhow!(
            "no token verification key configured (set CERTBOX_API_JWT_SECRET, \
             CERTBOX_API_JWT_PUBLIC_KEY or CERTBOX_API_JWT_PUBLIC_KEY_FILE)"
        ))
    }

    /// Build the bearer token authenticator described by this config.
    pub fn authenticator(&self) -> anyhow::Result<JwtAuthenticator> {
        let issuer = Some(self.issuer());
        let audience = self.jwt_audience.as_deref();

        if let Some(ref secret) = self.jwt_secret {
            return Ok(JwtAuthenticator::from_secret(secret.as_bytes(), issuer, audience));
        }

        let pem = self.get_public_key_pem()?;
        JwtAuthenticator::from_ed_pem(pem.as_bytes(), issuer, audience)
            .map_err(|e| anyhow::anyhow!("{e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CertboxApiConfig {
        CertboxApiConfig::try_parse_from(std::iter::once("certbox-api").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn issuer_defaults_to_public_url() {
        let cfg = parse(&["--public-url", "https://certs.example.com"]);
        assert_eq!(cfg.issuer(), "https://certs.example.com");

        let cfg = parse(&["--jwt-issuer", "https://idp.example.com"]);
        assert_eq!(cfg.issuer(), "https://idp.example.com");
    }

    #[test]
    fn storage_backend_parses() {
        let cfg = parse(&["--storage", "memory"]);
        assert_eq!(cfg.storage, StorageBackend::Memory);
    }

    #[test]
    fn secret_builds_authenticator() {
        let cfg = parse(&["--jwt-secret", "s3cret"]);
        assert!(cfg.authenticator().is_ok());
    }

    #[test]
    fn missing_key_material_is_an_error() {
        let mut cfg = parse(&[]);
        cfg.jwt_secret = None;
        cfg.jwt_public_key = None;
        cfg.jwt_public_key_file = None;
        assert!(cfg.authenticator().is_err());
    }
}
