//! The certificate endpoint.
//!
//! A single method-polymorphic route. An authenticated `POST` whose
//! content type is exactly `application/x-pem-file` stores the request body
//! as the caller's newest certificate. Every other request looks up the
//! latest certificate for the `email` query parameter, or for the caller
//! when the parameter is absent.

use axum::{
    body::{Body, to_bytes},
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, Method, header},
};
use certbox_common::{PEM_CONTENT_TYPE, caller::Caller, params::CertQuery, views::CertResponse};
use certbox_db::storage::{CertStore, RECENT_CERT_LIMIT};
use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::{auth::Auth, context::ApiContext, error::ApiError, json::PrettyJson};


/// Method that, together with the PEM content type, marks an upload.
const WRITE_METHOD: Method = Method::POST;

/// What a request asks the endpoint to do.
#[derive(Debug, PartialEq, Eq)]
enum Intent<'a> {
    Store { owner: &'a str },
    Fetch { target: Option<String> },
}

impl<'a> Intent<'a> {
    fn of(caller: &'a Caller, method: &Method, headers: &HeaderMap, query: CertQuery) -> Self {
        let is_pem = headers
            .get(header::CONTENT_TYPE)
            .is_some_and(|ct| ct.as_bytes() == PEM_CONTENT_TYPE.as_bytes());

        match caller.account_id() {
            Some(owner) if method == WRITE_METHOD && is_pem => Intent::Store { owner },
            account => Intent::Fetch {
                target: query.email.or_else(|| account.map(str::to_string)),
            },
        }
    }
}

/// Upload or fetch a certificate.
#[utoipa::path(
    method(get, post),
    path = "/v1/cert",
    tags = ["certs"],
    params(CertQuery),
    request_body(
        content = String,
        content_type = "application/x-pem-file",
        description = "PEM certificate to store for the authenticated caller"
    ),
    responses(
        (status = 200, description = "Stored, or latest certificate", body = CertResponse),
        (status = 400, description = "Malformed credential", body = CertResponse),
        (status = 401, description = "Invalid bearer token", body = CertResponse),
        (status = 500, description = "Unexpected error", body = CertResponse),
    ),
    security((), ("bearer" = []))
)]
#[instrument(skip_all, fields(method = %method))]
pub async fn cert(
    State(ctx): State<ApiContext>,
    Auth(caller): Auth,
    method: Method,
    headers: HeaderMap,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    body: Body,
) -> Result<PrettyJson<CertResponse>, ApiError> {
    let query = match query {
        Ok(Query(pairs)) => CertQuery::from_pairs(pairs),
        Err(e) => {
            debug!(error = %e, "Ignoring unparseable query string");
            CertQuery::default()
        }
    };

    let output = match Intent::of(&caller, &method, &headers, query) {
        Intent::Store { owner } => {
            let bytes = to_bytes(body, usize::MAX)
                .await
                .map_err(|e| ApiError::internal(format!("Failed to read request body: {e}")))?;
            let content = String::from_utf8_lossy(&bytes).into_owned();

            let id = CertStore::append(&*ctx.db, owner, content, Utc::now()).await?;
            debug!(%id, "Certificate stored");

            CertResponse::default()
        }
        Intent::Fetch { target: Some(target) } => {
            let certs = CertStore::most_recent(&*ctx.db, &target, RECENT_CERT_LIMIT).await?;
            debug!(%target, found = certs.len(), "Looked up certificates");

            certs
                .into_iter()
                .next()
                .map(|latest| CertResponse::with_cert(latest.content))
                .unwrap_or_default()
        }
        Intent::Fetch { target: None } => {
            debug!("No account to look up");
            CertResponse::default()
        }
    };

    if let Some(account) = caller.account_id() {
        info!(caller = %account, "valid request on behalf of caller");
    }

    Ok(PrettyJson::ok(output))
}
