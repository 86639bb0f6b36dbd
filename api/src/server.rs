use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Method, Request, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::any,
};
use certbox_common::{CERT_PATH, views::CertResponse};
use certbox_db::storage::{Storage, memory::MemoryStorage, mongodb::MongoDBStorage};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, info_span};
use utoipa::{
    OpenApi as _, ToSchema,
    openapi::{
        Info, License, OpenApi, RefOr,
        path::Operation,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    config::{CertboxApiConfig, StorageBackend},
    context::ApiContext,
    handlers,
    json::PrettyJson,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Unversioned path kept for clients written against the original service.
const CERT_ALIAS_PATH: &str = "/cert";

#[derive(utoipa::OpenApi)]
#[openapi(
    paths(handlers::cert::cert),
    components(schemas(CertResponse))
)]
struct CertApiDoc;

/// Connect the configured backends and build the HTTP router.
pub async fn make(cfg: CertboxApiConfig) -> anyhow::Result<(Router, OpenApi)> {
    let db: Arc<dyn Storage> = match cfg.storage {
        StorageBackend::Mongodb => {
            let storage = MongoDBStorage::new(&cfg.mongodb_uri)
                .await
                .context("failed to create MongoDB client")?;
            storage
                .ensure_indexes()
                .await
                .context("failed to prepare MongoDB indexes")?;
            Arc::new(storage)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; certificates will not survive a restart");
            Arc::new(MemoryStorage::new())
        }
    };

    let authenticator = Arc::new(cfg.authenticator()?);
    let cors_origin = cfg
        .public_url
        .parse::<HeaderValue>()
        .context("public URL is not a valid origin header")?;

    Ok(build(ApiContext::new(db, authenticator), cors_origin))
}

/// Build the router around an already-assembled context.
pub fn build(context: ApiContext, cors_origin: HeaderValue) -> (Router, OpenApi) {
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    // Log the request ID as generated
                    let request_id = req.headers().get(REQUEST_ID_HEADER);
                    let span = info_span!(
                        "http_request",
                        method = req.method().to_string(),
                        request_id = Option::<&str>::None,
                        path = Option::<&str>::None,
                    );

                    if let Some(request_id) = request_id.and_then(|id| id.to_str().ok()) {
                        span.record("request_id", request_id);
                    };

                    if let Some(path) = req.extensions().get::<MatchedPath>() {
                        span.record("path", path.as_str())
                    } else {
                        span.record("path", req.uri().path())
                    };

                    span
                }),
        )
        .layer(middleware::from_fn(json_preflight))
        .layer(CorsLayer::new().allow_credentials(true).allow_origin(cors_origin))
        .layer(PropagateRequestIdLayer::new(x_request_id));

    let (router, _) = routes()
        .layer(middleware)
        .with_state(context)
        .split_for_parts();

    (router, openapi())
}

/// Give CORS preflight replies the same empty JSON object every other
/// request gets, keeping the headers the CORS layer set.
async fn json_preflight(req: Request<Body>, next: Next) -> Response {
    let preflight = req.method() == Method::OPTIONS
        && req.headers().contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);

    let res = next.run(req).await;
    if !preflight {
        return res;
    }

    let (mut parts, _) = res.into_parts();
    let (json_parts, body) = PrettyJson::ok(CertResponse::default())
        .into_response()
        .into_parts();

    parts.headers.remove(header::CONTENT_LENGTH);
    if let Some(content_type) = json_parts.headers.get(header::CONTENT_TYPE) {
        parts.headers.insert(header::CONTENT_TYPE, content_type.clone());
    }
    Response::from_parts(parts, body)
}

/// The OpenAPI document describing every route.
pub fn openapi() -> OpenApi {
    let mut api = routes().into_openapi();
    api.merge(CertApiDoc::openapi());

    api.components
        .get_or_insert_with(Default::default)
        .add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );

    api.paths.paths.iter_mut().for_each(|(_path, item)| {
        apply_default_errors(&mut item.get);
        apply_default_errors(&mut item.post);
        apply_default_errors(&mut item.patch);
        apply_default_errors(&mut item.put);
        apply_default_errors(&mut item.delete);
        apply_default_errors(&mut item.trace);
        apply_default_errors(&mut item.head);
        apply_default_errors(&mut item.options);
    });

    api
}

fn routes() -> OpenApiRouter<ApiContext> {
    let info = Info::builder()
        .title("certbox API Reference")
        .version(env!("CARGO_PKG_VERSION"))
        .license(Some(
            License::builder()
                .name("Apache 2.0 License")
                .identifier(Some(env!("CARGO_PKG_LICENSE")))
                .build(),
        ))
        .build();

    OpenApiRouter::with_openapi(OpenApi::builder().info(info).build())
        .routes(routes!(handlers::health_check))
        .route(CERT_PATH, any(handlers::cert::cert))
        .route(CERT_ALIAS_PATH, any(handlers::cert::cert))
}

fn apply_default_errors(item: &mut Option<Operation>) {
    if let Some(item) = item {
        item.responses
            .responses
            .entry("500".into())
            .or_insert_with(|| {
                RefOr::Ref(
                    utoipa::openapi::Ref::builder()
                        .summary("Internal server error")
                        .ref_location_from_schema_name(CertResponse::name())
                        .build(),
                )
            });
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use certbox_db::storage::memory::MemoryStorage;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::JwtAuthenticator;

    const ORIGIN: &str = "http://localhost:4000";

    fn router() -> Router {
        let context = ApiContext::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(JwtAuthenticator::from_secret(b"secret", Some(ORIGIN), None)),
        );
        build(context, HeaderValue::from_static(ORIGIN)).0
    }

    #[tokio::test]
    async fn preflight_replies_with_json() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri(CERT_PATH)
            .header(header::ORIGIN, ORIGIN)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let res = router().oneshot(req).await.unwrap();
        assert!(res.status().is_success());
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);

        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"{}");
    }

    #[tokio::test]
    async fn plain_options_request_is_a_fetch() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri(CERT_PATH)
            .body(Body::empty())
            .unwrap();

        let res = router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), axum::http::StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn openapi_documents_every_route() {
        let api = openapi();
        assert!(api.paths.paths.contains_key("/v1/health"));

        let cert = &api.paths.paths["/v1/cert"];
        assert!(cert.get.is_some());
        assert!(cert.post.is_some());
    }

    #[test]
    fn openapi_declares_bearer_scheme() {
        let api = openapi();
        let components = api.components.expect("components present");
        assert!(components.security_schemes.contains_key("bearer"));
        assert!(components.schemas.contains_key("CertResponse"));
    }
}
