use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::use_cases::groups::add_members::AddMembers;
use crate::application::use_cases::groups::all_groups::AllGroups;
use crate::application::use_cases::groups::create_group::CreateGroup;
use crate::application::use_cases::groups::delete_group::DeleteGroup;
use crate::application::use_cases::groups::group_detail::GetGroupDetail;
use crate::application::use_cases::groups::list_groups::ListGroups;
use crate::application::use_cases::groups::remove_members::RemoveMembers;
use crate::application::use_cases::groups::rename_group::RenameGroup;
use crate::bootstrap::app_context::AppContext;
use crate::domain::accounts::account::UserType;
use crate::domain::groups::group::{Group, GroupDetail, GroupMember};
use crate::presentation::http::auth::{Bearer, authorize};
use crate::presentation::http::envelope::{ApiResult, done, ok};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedGroup {
    pub group_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GroupMembersRequest {
    pub group_id: i64,
    #[serde(default)]
    pub users: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GroupIdRequest {
    pub group_id: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GroupIdQuery {
    pub group_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameGroupRequest {
    pub group_id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AffectedResponse {
    pub affected: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupItem {
    pub group_id: i64,
    pub owner: String,
    pub name: String,
}

impl From<Group> for GroupItem {
    fn from(g: Group) -> Self {
        GroupItem {
            group_id: g.group_id,
            owner: g.owner,
            name: g.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberItem {
    pub user_id: String,
    pub nickname: String,
}

impl From<GroupMember> for MemberItem {
    fn from(m: GroupMember) -> Self {
        MemberItem {
            user_id: m.user_id,
            nickname: m.nickname,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupDetailResponse {
    pub group_id: i64,
    pub name: String,
    pub owner: MemberItem,
    pub users: Vec<MemberItem>,
}

impl From<GroupDetail> for GroupDetailResponse {
    fn from(d: GroupDetail) -> Self {
        GroupDetailResponse {
            group_id: d.group_id,
            name: d.name,
            owner: d.owner.into(),
            users: d.users.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupOverviewResponse {
    pub owned: Vec<GroupItem>,
    pub joined: Vec<GroupItem>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/user-group/create", post(create_group))
        .route("/user-group/add-user", post(add_members))
        .route("/user-group/delete-user", post(remove_members))
        .route("/user-group/get-user", get(group_detail))
        .route("/user-group/delete-group", post(delete_group))
        .route("/user-group/get-groups", get(list_groups))
        .route("/user-group/all-groups", get(all_groups))
        .route("/user-group/edit-name", post(rename_group))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/user-group/create", tag = "Groups",
    request_body = CreateGroupRequest, responses((status = 200, body = CreatedGroup)))]
pub async fn create_group(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<CreateGroupRequest>,
) -> ApiResult<CreatedGroup> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Teacher)?;
    let repo = ctx.group_repo();
    let group_id = CreateGroup {
        repo: repo.as_ref(),
    }
    .execute(&caller, &req.name)
    .await?;
    ok(CreatedGroup { group_id })
}

#[utoipa::path(post, path = "/api/user-group/add-user", tag = "Groups",
    request_body = GroupMembersRequest, responses((status = 200, body = AffectedResponse)))]
pub async fn add_members(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<GroupMembersRequest>,
) -> ApiResult<AffectedResponse> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Student)?;
    let repo = ctx.group_repo();
    let affected = AddMembers {
        repo: repo.as_ref(),
    }
    .execute(&caller, req.group_id, &req.users)
    .await?;
    ok(AffectedResponse { affected })
}

#[utoipa::path(post, path = "/api/user-group/delete-user", tag = "Groups",
    request_body = GroupMembersRequest, responses((status = 200, body = AffectedResponse)))]
pub async fn remove_members(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<GroupMembersRequest>,
) -> ApiResult<AffectedResponse> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Student)?;
    let repo = ctx.group_repo();
    let affected = RemoveMembers {
        repo: repo.as_ref(),
    }
    .execute(&caller, req.group_id, &req.users)
    .await?;
    ok(AffectedResponse { affected })
}

#[utoipa::path(get, path = "/api/user-group/get-user", tag = "Groups",
    params(GroupIdQuery), responses((status = 200, body = GroupDetailResponse)))]
pub async fn group_detail(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Query(q): Query<GroupIdQuery>,
) -> ApiResult<GroupDetailResponse> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Student)?;
    let repo = ctx.group_repo();
    let detail = GetGroupDetail {
        repo: repo.as_ref(),
    }
    .execute(&caller, q.group_id)
    .await?;
    ok(detail.into())
}

#[utoipa::path(post, path = "/api/user-group/delete-group", tag = "Groups",
    request_body = GroupIdRequest, responses((status = 200)))]
pub async fn delete_group(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<GroupIdRequest>,
) -> ApiResult<()> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Student)?;
    let repo = ctx.group_repo();
    DeleteGroup {
        repo: repo.as_ref(),
    }
    .execute(&caller, req.group_id)
    .await?;
    done()
}

#[utoipa::path(get, path = "/api/user-group/get-groups", tag = "Groups",
    responses((status = 200, body = GroupOverviewResponse)))]
pub async fn list_groups(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> ApiResult<GroupOverviewResponse> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Student)?;
    let repo = ctx.group_repo();
    let overview = ListGroups {
        repo: repo.as_ref(),
    }
    .execute(&caller)
    .await?;
    ok(GroupOverviewResponse {
        owned: overview.owned.into_iter().map(Into::into).collect(),
        joined: overview.joined.into_iter().map(Into::into).collect(),
    })
}

#[utoipa::path(get, path = "/api/user-group/all-groups", tag = "Groups",
    responses((status = 200, body = [GroupItem])))]
pub async fn all_groups(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> ApiResult<Vec<GroupItem>> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Admin)?;
    let repo = ctx.group_repo();
    let groups = AllGroups {
        repo: repo.as_ref(),
    }
    .execute(&caller)
    .await?;
    ok(groups.into_iter().map(Into::into).collect())
}

#[utoipa::path(post, path = "/api/user-group/edit-name", tag = "Groups",
    request_body = RenameGroupRequest, responses((status = 200)))]
pub async fn rename_group(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<RenameGroupRequest>,
) -> ApiResult<()> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Student)?;
    let repo = ctx.group_repo();
    RenameGroup {
        repo: repo.as_ref(),
    }
    .execute(&caller, req.group_id, &req.name)
    .await?;
    done()
}
