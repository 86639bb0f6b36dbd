use axum::extract::State;

use crate::{context::ApiContext, error::ApiError};

pub mod cert;

#[utoipa::path(
    get,
    path = "/v1/health",
    tags = ["health"],
    responses((status = 200, description = "Storage is reachable", body = String))
)]
pub async fn health_check(State(ctx): State<ApiContext>) -> Result<&'static str, ApiError> {
    ctx.db.ping().await?;
    Ok("Healthy")
}
