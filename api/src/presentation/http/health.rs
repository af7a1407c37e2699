use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::bootstrap::app_context::AppContext;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResp {
    pub status: &'static str,
    pub database: bool,
    pub graph: bool,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    security(()),
    responses((status = 200, body = HealthResp))
)]
pub async fn health(State(ctx): State<AppContext>) -> Json<HealthResp> {
    let database = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&ctx.pool())
        .await
        .is_ok();
    let graph = match ctx.graph_store().ping().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = ?err, "graph_ping_failed");
            false
        }
    };
    let status = if database && graph { "ok" } else { "degraded" };
    Json(HealthResp {
        status,
        database,
        graph,
    })
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new().route("/health", get(health)).with_state(ctx)
}
