use anyhow::Context;
use certbox_common::token::AccountClaims;
use chrono::{Duration, Utc};
use clap::Parser;
use jsonwebtoken::{EncodingKey, Header, encode};

#[derive(Clone, Parser)]
pub struct MintTokenParams {
    #[clap(short, long)]
    pub email: String,

    /// Shared secret the API verifies tokens with
    #[clap(short, long, env = "CERTBOX_API_JWT_SECRET", hide_env_values = true)]
    pub secret: String,

    #[clap(long, default_value = "http://localhost:4000")]
    pub issuer: String,

    #[clap(long, default_value_t = 24)]
    pub ttl_hours: i64,
}

pub fn mint_token(
    MintTokenParams {
        email,
        secret,
        issuer,
        ttl_hours,
    }: MintTokenParams,
) -> anyhow::Result<String> {
    let now = Utc::now();
    let claims = AccountClaims {
        sub: Some(email.clone()),
        email: Some(email),
        iss: Some(issuer),
        aud: None,
        iat: Some(now.timestamp()),
        exp: Some((now + Duration::hours(ttl_hours)).timestamp()),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("failed to sign token")
}
