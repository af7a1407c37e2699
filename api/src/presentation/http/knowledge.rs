use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::use_cases::knowledge::add_link::{AddLink, LinkRequest};
use crate::application::use_cases::knowledge::add_node::{AddNode, AddNodeRequest};
use crate::application::use_cases::knowledge::delete_link::DeleteLink;
use crate::application::use_cases::knowledge::delete_node::DeleteNode;
use crate::application::use_cases::knowledge::graph_views::GraphViews;
use crate::application::use_cases::knowledge::relations_between::RelationsBetween;
use crate::application::use_cases::knowledge::search_nodes::SearchNodes;
use crate::application::use_cases::knowledge::update_link::UpdateLink;
use crate::application::use_cases::knowledge::update_node::{UpdateNode, UpdateNodeRequest};
use crate::bootstrap::app_context::AppContext;
use crate::domain::accounts::account::UserType;
use crate::domain::knowledge::graph::{Graph, GraphLink, RelationRow};
use crate::domain::knowledge::node::{GraphNode, NodeKind};
use crate::domain::knowledge::relation::RelationRef;
use crate::presentation::http::auth::{Bearer, authorize};
use crate::presentation::http::envelope::{ApiResult, done, ok, ok_with_msg};
use crate::presentation::http::params::JsonOrQuery;

#[derive(Debug, Serialize, ToSchema)]
pub struct NodeItem {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl From<GraphNode> for NodeItem {
    fn from(n: GraphNode) -> Self {
        NodeItem {
            id: n.id,
            name: n.name,
            kind: n.kind.label().to_string(),
            description: n.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkItem {
    pub source: i64,
    pub target: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<GraphLink> for LinkItem {
    fn from(l: GraphLink) -> Self {
        LinkItem {
            source: l.source,
            target: l.target,
            kind: l.kind,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GraphResponse {
    pub nodes: Vec<NodeItem>,
    pub links: Vec<LinkItem>,
}

impl From<Graph> for GraphResponse {
    fn from(g: Graph) -> Self {
        GraphResponse {
            nodes: g.nodes.into_iter().map(Into::into).collect(),
            links: g.links.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddNodeBody {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddNodeResponse {
    pub node: NodeItem,
    pub created: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNodeBody {
    pub name: String,
    #[serde(rename = "type", alias = "node_type")]
    pub kind: String,
    pub property_name: String,
    #[serde(default, alias = "new_value")]
    pub value: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteNodeBody {
    pub name: String,
    #[serde(rename = "type", alias = "node_type")]
    pub kind: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KeywordQuery {
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LinkBody {
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub target_name: String,
    #[serde(default)]
    pub target_type: String,
    #[serde(default, alias = "old_relation_type")]
    pub relation_type: String,
}

impl From<LinkBody> for LinkRequest {
    fn from(b: LinkBody) -> Self {
        LinkRequest {
            source_name: b.source_name,
            source_type: b.source_type,
            target_name: b.target_name,
            target_type: b.target_type,
            relation_type: b.relation_type,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLinkBody {
    #[serde(flatten)]
    pub link: LinkBody,
    #[serde(default)]
    pub new_relation_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkResponse {
    pub source_name: String,
    pub source_type: String,
    pub target_name: String,
    pub target_type: String,
    pub relation_type: String,
}

impl From<RelationRef> for LinkResponse {
    fn from(r: RelationRef) -> Self {
        LinkResponse {
            source_name: r.source,
            source_type: r.source_kind.label().to_string(),
            target_name: r.target,
            target_type: r.target_kind.label().to_string(),
            relation_type: r.kind.as_str().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RelationQuery {
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub target_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RelationItem {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<RelationRow> for RelationItem {
    fn from(r: RelationRow) -> Self {
        RelationItem {
            source: r.source,
            target: r.target,
            kind: r.kind,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    pub id: i64,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/knowledge/addNode", post(add_node))
        .route("/knowledge/updateNode", post(update_node))
        .route("/knowledge/deleteNode", post(delete_node))
        .route("/knowledge/searchByKeyword", get(search_by_keyword))
        .route("/knowledge/addLink", post(add_link))
        .route("/knowledge/updateLink", post(update_link))
        .route("/knowledge/deleteLink", post(delete_link))
        .route("/knowledge/relation", get(relations))
        .route("/knowledge/chapter", get(chapter_graph))
        .route("/knowledge/section", get(section_graph))
        .route("/knowledge/point", get(point_graph))
        .route("/knowledge/sectionByID", get(sections_of_chapter))
        .route("/knowledge/pointByID", get(points_of_section))
        .route("/knowledge/point/:id", get(point_detail))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/knowledge/addNode", tag = "Knowledge",
    request_body = AddNodeBody, responses((status = 200, body = AddNodeResponse)))]
pub async fn add_node(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    JsonOrQuery(body): JsonOrQuery<AddNodeBody>,
) -> ApiResult<AddNodeResponse> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Teacher)?;
    let graph = ctx.graph_store();
    let added = AddNode {
        graph: graph.as_ref(),
    }
    .execute(
        &caller,
        &AddNodeRequest {
            name: body.name,
            kind: body.kind,
            description: body.description,
        },
    )
    .await?;
    let msg = if added.created {
        "ok"
    } else {
        "node already exists"
    };
    ok_with_msg(
        msg,
        AddNodeResponse {
            node: added.node.into(),
            created: added.created,
        },
    )
}

#[utoipa::path(post, path = "/api/knowledge/updateNode", tag = "Knowledge",
    request_body = UpdateNodeBody, responses((status = 200)))]
pub async fn update_node(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    JsonOrQuery(body): JsonOrQuery<UpdateNodeBody>,
) -> ApiResult<()> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Teacher)?;
    let graph = ctx.graph_store();
    UpdateNode {
        graph: graph.as_ref(),
    }
    .execute(
        &caller,
        &UpdateNodeRequest {
            name: body.name,
            kind: body.kind,
            property: body.property_name,
            value: body.value,
        },
    )
    .await?;
    done()
}

#[utoipa::path(post, path = "/api/knowledge/deleteNode", tag = "Knowledge",
    request_body = DeleteNodeBody, responses((status = 200, body = DeletedResponse)))]
pub async fn delete_node(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    JsonOrQuery(body): JsonOrQuery<DeleteNodeBody>,
) -> ApiResult<DeletedResponse> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Teacher)?;
    let graph = ctx.graph_store();
    let deleted = DeleteNode {
        graph: graph.as_ref(),
    }
    .execute(&caller, &body.name, &body.kind)
    .await?;
    ok(DeletedResponse { deleted })
}

#[utoipa::path(get, path = "/api/knowledge/searchByKeyword", tag = "Knowledge",
    params(KeywordQuery), security(()), responses((status = 200, body = [NodeItem])))]
pub async fn search_by_keyword(
    State(ctx): State<AppContext>,
    Query(q): Query<KeywordQuery>,
) -> ApiResult<Vec<NodeItem>> {
    let graph = ctx.graph_store();
    let nodes = SearchNodes {
        graph: graph.as_ref(),
    }
    .execute(&q.keyword)
    .await?;
    ok(nodes.into_iter().map(Into::into).collect())
}

#[utoipa::path(post, path = "/api/knowledge/addLink", tag = "Knowledge",
    request_body = LinkBody, responses((status = 200, body = LinkResponse)))]
pub async fn add_link(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    JsonOrQuery(body): JsonOrQuery<LinkBody>,
) -> ApiResult<LinkResponse> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Teacher)?;
    let graph = ctx.graph_store();
    let rel = AddLink {
        graph: graph.as_ref(),
    }
    .execute(&caller, &body.into())
    .await?;
    ok(rel.into())
}

#[utoipa::path(post, path = "/api/knowledge/updateLink", tag = "Knowledge",
    request_body = UpdateLinkBody, responses((status = 200, body = LinkResponse)))]
pub async fn update_link(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    JsonOrQuery(body): JsonOrQuery<UpdateLinkBody>,
) -> ApiResult<LinkResponse> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Teacher)?;
    let graph = ctx.graph_store();
    let rel = UpdateLink {
        graph: graph.as_ref(),
    }
    .execute(&caller, &body.link.into(), &body.new_relation_type)
    .await?;
    ok(rel.into())
}

#[utoipa::path(post, path = "/api/knowledge/deleteLink", tag = "Knowledge",
    request_body = LinkBody, responses((status = 200, body = DeletedResponse)))]
pub async fn delete_link(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    JsonOrQuery(body): JsonOrQuery<LinkBody>,
) -> ApiResult<DeletedResponse> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Teacher)?;
    let graph = ctx.graph_store();
    let deleted = DeleteLink {
        graph: graph.as_ref(),
    }
    .execute(&caller, &body.into())
    .await?;
    ok(DeletedResponse { deleted })
}

#[utoipa::path(get, path = "/api/knowledge/relation", tag = "Knowledge",
    params(RelationQuery), security(()), responses((status = 200, body = [RelationItem])))]
pub async fn relations(
    State(ctx): State<AppContext>,
    Query(q): Query<RelationQuery>,
) -> ApiResult<Vec<RelationItem>> {
    let graph = ctx.graph_store();
    let rows = RelationsBetween {
        graph: graph.as_ref(),
    }
    .execute(&q.source_type, &q.target_type)
    .await?;
    ok(rows.into_iter().map(Into::into).collect())
}

async fn level_graph(ctx: &AppContext, kind: NodeKind) -> ApiResult<GraphResponse> {
    let graph = ctx.graph_store();
    let g = GraphViews {
        graph: graph.as_ref(),
    }
    .level(kind)
    .await?;
    ok(g.into())
}

#[utoipa::path(get, path = "/api/knowledge/chapter", tag = "Knowledge",
    security(()), responses((status = 200, body = GraphResponse)))]
pub async fn chapter_graph(State(ctx): State<AppContext>) -> ApiResult<GraphResponse> {
    level_graph(&ctx, NodeKind::Chapter).await
}

#[utoipa::path(get, path = "/api/knowledge/section", tag = "Knowledge",
    security(()), responses((status = 200, body = GraphResponse)))]
pub async fn section_graph(State(ctx): State<AppContext>) -> ApiResult<GraphResponse> {
    level_graph(&ctx, NodeKind::Section).await
}

#[utoipa::path(get, path = "/api/knowledge/point", tag = "Knowledge",
    security(()), responses((status = 200, body = GraphResponse)))]
pub async fn point_graph(State(ctx): State<AppContext>) -> ApiResult<GraphResponse> {
    level_graph(&ctx, NodeKind::Point).await
}

#[utoipa::path(get, path = "/api/knowledge/sectionByID", tag = "Knowledge",
    params(IdQuery), security(()), responses((status = 200, body = GraphResponse)))]
pub async fn sections_of_chapter(
    State(ctx): State<AppContext>,
    Query(q): Query<IdQuery>,
) -> ApiResult<GraphResponse> {
    let graph = ctx.graph_store();
    let g = GraphViews {
        graph: graph.as_ref(),
    }
    .children(NodeKind::Chapter, q.id)
    .await?;
    ok(g.into())
}

#[utoipa::path(get, path = "/api/knowledge/pointByID", tag = "Knowledge",
    params(IdQuery), security(()), responses((status = 200, body = GraphResponse)))]
pub async fn points_of_section(
    State(ctx): State<AppContext>,
    Query(q): Query<IdQuery>,
) -> ApiResult<GraphResponse> {
    let graph = ctx.graph_store();
    let g = GraphViews {
        graph: graph.as_ref(),
    }
    .children(NodeKind::Section, q.id)
    .await?;
    ok(g.into())
}

#[utoipa::path(get, path = "/api/knowledge/point/{id}", tag = "Knowledge",
    params(("id" = i64, Path, description = "Point id")),
    security(()), responses((status = 200, body = NodeItem)))]
pub async fn point_detail(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> ApiResult<NodeItem> {
    let graph = ctx.graph_store();
    let node = GraphViews {
        graph: graph.as_ref(),
    }
    .point(id)
    .await?;
    ok(node.into())
}
