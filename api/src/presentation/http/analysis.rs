use axum::{
    Router,
    extract::{Multipart, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::use_cases::knowledge::auto_construct::AutoConstruct;
use crate::application::use_cases::knowledge::connection_analysis::ConnectionAnalysis;
use crate::application::use_cases::knowledge::learning_difficulty::LearningDifficulty;
use crate::application::use_cases::knowledge::path_recommend::{PathRecommend, PathRequest};
use crate::bootstrap::app_context::AppContext;
use crate::domain::accounts::account::UserType;
use crate::domain::knowledge::analysis::{
    ConnectionScore, DifficultyReport, PathRelationship, PathResult,
};
use crate::domain::knowledge::import::ImportSummary;
use crate::presentation::http::auth::{Bearer, authorize};
use crate::presentation::http::envelope::{ApiError, ApiResult, ok};
use crate::presentation::http::knowledge::NodeItem;
use crate::presentation::http::params::JsonOrQuery;

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct AutoConstructMultipart {
    /// JSON document with `nodes` and `relations`
    #[schema(value_type = String, format = Binary)]
    file: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportSummaryResponse {
    pub nodes_created: u64,
    pub nodes_existing: u64,
    pub relations_created: u64,
    pub relations_existing: u64,
    pub relations_unresolved: u64,
}

impl From<ImportSummary> for ImportSummaryResponse {
    fn from(s: ImportSummary) -> Self {
        ImportSummaryResponse {
            nodes_created: s.nodes_created,
            nodes_existing: s.nodes_existing,
            relations_created: s.relations_created,
            relations_existing: s.relations_existing,
            relations_unresolved: s.relations_unresolved,
        }
    }
}

/// Path endpoints, as a JSON body or as query parameters.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PathBody {
    #[serde(default, alias = "start_point_name")]
    pub start_name: String,
    #[serde(default, alias = "start_point_type")]
    pub start_type: String,
    #[serde(default, alias = "end_point_name")]
    pub end_name: String,
    #[serde(default, alias = "end_point_type")]
    pub end_type: String,
}

impl From<PathBody> for PathRequest {
    fn from(b: PathBody) -> Self {
        PathRequest {
            start_name: b.start_name,
            start_type: b.start_type,
            end_name: b.end_name,
            end_type: b.end_type,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PathRelationshipItem {
    pub source: i64,
    pub target: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<PathRelationship> for PathRelationshipItem {
    fn from(r: PathRelationship) -> Self {
        PathRelationshipItem {
            source: r.source,
            target: r.target,
            kind: r.kind,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PathResponse {
    pub nodes: Vec<NodeItem>,
    pub relationships: Vec<PathRelationshipItem>,
    pub description: Vec<String>,
}

impl From<PathResult> for PathResponse {
    fn from(p: PathResult) -> Self {
        PathResponse {
            nodes: p.nodes.into_iter().map(Into::into).collect(),
            relationships: p.relationships.into_iter().map(Into::into).collect(),
            description: p.description,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DifficultyQuery {
    pub point_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DifficultyResponse {
    pub point_id: i64,
    pub prereq_count: i64,
    pub max_depth: i64,
    pub difficulty_score: f64,
}

impl From<DifficultyReport> for DifficultyResponse {
    fn from(r: DifficultyReport) -> Self {
        DifficultyResponse {
            point_id: r.point_id,
            prereq_count: r.prereq_count,
            max_depth: r.max_depth,
            difficulty_score: r.score,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConnectionsQuery {
    /// Return only the best-connected `limit` nodes
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub score: f64,
}

impl From<ConnectionScore> for ConnectionItem {
    fn from(c: ConnectionScore) -> Self {
        ConnectionItem {
            name: c.name,
            kind: c.kind.label().to_string(),
            score: c.score,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/knowledge/autoConstruct", post(auto_construct))
        .route(
            "/knowledge/pathRecommend",
            post(path_recommend).get(path_recommend),
        )
        .route("/knowledge/learningDifficulty", get(learning_difficulty))
        .route("/knowledge/analyze/connections", get(connections))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/knowledge/autoConstruct", tag = "Analysis",
    request_body(content = AutoConstructMultipart, content_type = "multipart/form-data"),
    responses((status = 200, body = ImportSummaryResponse)))]
pub async fn auto_construct(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    mut multipart: Multipart,
) -> ApiResult<ImportSummaryResponse> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Teacher)?;
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read file: {e}")))?;
        upload = Some((filename, data.to_vec()));
    }
    let (filename, bytes) = upload.ok_or_else(|| ApiError::missing("file"))?;

    let graph = ctx.graph_store();
    let summary = AutoConstruct {
        graph: graph.as_ref(),
    }
    .execute(&caller, filename.as_deref(), &bytes)
    .await?;
    ok(summary.into())
}

#[utoipa::path(post, path = "/api/knowledge/pathRecommend", tag = "Analysis",
    params(PathBody),
    request_body(content = PathBody, description = "Optional when the query string carries the path ends"),
    security(()),
    responses((status = 200, body = PathResponse)))]
pub async fn path_recommend(
    State(ctx): State<AppContext>,
    JsonOrQuery(body): JsonOrQuery<PathBody>,
) -> ApiResult<PathResponse> {
    let graph = ctx.graph_store();
    let path = PathRecommend {
        graph: graph.as_ref(),
    }
    .execute(&body.into())
    .await?;
    ok(path.into())
}

#[utoipa::path(get, path = "/api/knowledge/learningDifficulty", tag = "Analysis",
    params(DifficultyQuery), security(()), responses((status = 200, body = DifficultyResponse)))]
pub async fn learning_difficulty(
    State(ctx): State<AppContext>,
    Query(q): Query<DifficultyQuery>,
) -> ApiResult<DifficultyResponse> {
    let graph = ctx.graph_store();
    let report = LearningDifficulty {
        graph: graph.as_ref(),
    }
    .execute(q.point_id)
    .await?;
    ok(report.into())
}

#[utoipa::path(get, path = "/api/knowledge/analyze/connections", tag = "Analysis",
    params(ConnectionsQuery), security(()), responses((status = 200, body = [ConnectionItem])))]
pub async fn connections(
    State(ctx): State<AppContext>,
    Query(q): Query<ConnectionsQuery>,
) -> ApiResult<Vec<ConnectionItem>> {
    let graph = ctx.graph_store();
    let scores = ConnectionAnalysis {
        graph: graph.as_ref(),
    }
    .execute(q.limit)
    .await?;
    ok(scores.into_iter().map(Into::into).collect())
}
