//! certbox API service.
//!
//! Stores PEM certificates per account and hands out the most recent one
//! for any account identifier.
//!
//! # Configuration
//!
//! Bearer tokens are verified with either an HS256 secret or an Ed25519
//! public key. See [`config::CertboxApiConfig`] for configuration options.
//!
//! # Authentication
//!
//! Uploads require a bearer JWT naming the uploading account; lookups do
//! not. See [`auth::JwtAuthenticator`].

pub mod auth;
pub mod config;
pub mod server;

pub mod context;
pub(crate) mod error;
pub(crate) mod handlers;
pub(crate) mod json;

pub use error::ApiError;
