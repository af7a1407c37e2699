use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::use_cases::resources::delete_resource::DeleteResource;
use crate::application::use_cases::resources::list_resources::ListResources;
use crate::application::use_cases::resources::upload_resource::{
    UploadResource, UploadResourceRequest, UploadedFile,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::accounts::account::UserType;
use crate::domain::resources::resource::{Courseware, Exercise, ResourceKind, Video};
use crate::presentation::http::auth::{Bearer, authorize};
use crate::presentation::http::envelope::{ApiError, ApiResult, done, ok, ret};

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadResourceMultipart {
    title: String,
    description: Option<String>,
    /// easy, medium or hard; exercises only
    difficulty: Option<String>,
    /// video, courseware or exercise
    resource_type: String,
    point_name: String,
    /// External http(s) URL; wins over `data` when both are sent
    resource_link: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    data: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResourceResponse {
    pub id: i64,
    pub resource_type: String,
    pub point_id: i64,
    pub url: String,
    pub cover_url: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PointIdQuery {
    #[serde(alias = "pointId")]
    pub point_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteResourceRequest {
    pub id: i64,
    pub point_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoItem {
    pub id: i64,
    pub title: String,
    pub play_url: String,
    pub cover_url: String,
    pub description: String,
    pub point_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Video> for VideoItem {
    fn from(v: Video) -> Self {
        VideoItem {
            id: v.id,
            title: v.title,
            play_url: v.play_url,
            cover_url: v.cover_url,
            description: v.description,
            point_id: v.point_id,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CoursewareItem {
    pub id: i64,
    pub title: String,
    pub courseware_url: String,
    pub description: String,
    pub point_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Courseware> for CoursewareItem {
    fn from(c: Courseware) -> Self {
        CoursewareItem {
            id: c.id,
            title: c.title,
            courseware_url: c.courseware_url,
            description: c.description,
            point_id: c.point_id,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExerciseItem {
    pub id: i64,
    pub title: String,
    pub exercise_url: String,
    pub description: String,
    pub difficulty: String,
    pub point_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Exercise> for ExerciseItem {
    fn from(e: Exercise) -> Self {
        ExerciseItem {
            id: e.id,
            title: e.title,
            exercise_url: e.exercise_url,
            description: e.description,
            difficulty: e.difficulty.as_str().to_string(),
            point_id: e.point_id,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/knowledge/uploadResource", post(upload_resource))
        .route("/knowledge/videosByPointId", get(videos_by_point))
        .route("/knowledge/coursewaresByPointId", get(coursewares_by_point))
        .route("/knowledge/exercisesByPointId", get(exercises_by_point))
        .route("/knowledge/deleteVideo", post(delete_video))
        .route("/knowledge/deleteCourseware", post(delete_courseware))
        .route("/knowledge/deleteExercise", post(delete_exercise))
        .with_state(ctx)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

async fn read_upload_form(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<UploadResourceRequest, ApiError> {
    let mut req = UploadResourceRequest::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        if matches!(name.as_deref(), Some("data") | Some("file")) {
            let filename = field
                .file_name()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(|s| s.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read file: {e}")))?;
            if data.len() > max_bytes {
                return Err(ApiError::new(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    ret::WRONG_PARAM,
                    "file too large",
                ));
            }
            // Browsers send an empty part when no file was picked.
            if filename.is_some() || !data.is_empty() {
                req.file = Some(UploadedFile {
                    filename,
                    bytes: data.to_vec(),
                });
            }
            continue;
        }
        let text = field
            .text()
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read field: {e}")))?;
        match name.as_deref() {
            Some("title") => req.title = text,
            Some("description") => req.description = non_empty(text),
            Some("difficulty") => req.difficulty = non_empty(text),
            Some("resource_type") => req.resource_type = text,
            Some("point_name") => req.point_name = text,
            Some("resource_link") => req.resource_link = non_empty(text),
            _ => {}
        }
    }
    Ok(req)
}

#[utoipa::path(post, path = "/api/knowledge/uploadResource", tag = "Resources",
    request_body(content = UploadResourceMultipart, content_type = "multipart/form-data"),
    responses((status = 200, body = UploadResourceResponse)))]
pub async fn upload_resource(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    mut multipart: Multipart,
) -> ApiResult<UploadResourceResponse> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Teacher)?;
    let req = read_upload_form(&mut multipart, ctx.cfg.upload_max_bytes).await?;

    let graph = ctx.graph_store();
    let repo = ctx.resource_repo();
    let objects = ctx.object_store();
    let covers = ctx.cover_extractor();
    let tmp_dir = ctx.upload_tmp_dir();
    let uploaded = UploadResource {
        graph: graph.as_ref(),
        repo: repo.as_ref(),
        objects: objects.as_ref(),
        covers: covers.as_ref(),
        tmp_dir: &tmp_dir,
        default_cover_url: &ctx.cfg.default_cover_url,
    }
    .execute(&caller, req)
    .await?;
    ok(UploadResourceResponse {
        id: uploaded.id,
        resource_type: uploaded.kind.as_str().to_string(),
        point_id: uploaded.point_id,
        url: uploaded.url,
        cover_url: uploaded.cover_url,
    })
}

#[utoipa::path(get, path = "/api/knowledge/videosByPointId", tag = "Resources",
    params(PointIdQuery), security(()), responses((status = 200, body = [VideoItem])))]
pub async fn videos_by_point(
    State(ctx): State<AppContext>,
    Query(q): Query<PointIdQuery>,
) -> ApiResult<Vec<VideoItem>> {
    let repo = ctx.resource_repo();
    let rows = ListResources {
        repo: repo.as_ref(),
    }
    .videos(q.point_id)
    .await?;
    ok(rows.into_iter().map(Into::into).collect())
}

#[utoipa::path(get, path = "/api/knowledge/coursewaresByPointId", tag = "Resources",
    params(PointIdQuery), security(()), responses((status = 200, body = [CoursewareItem])))]
pub async fn coursewares_by_point(
    State(ctx): State<AppContext>,
    Query(q): Query<PointIdQuery>,
) -> ApiResult<Vec<CoursewareItem>> {
    let repo = ctx.resource_repo();
    let rows = ListResources {
        repo: repo.as_ref(),
    }
    .coursewares(q.point_id)
    .await?;
    ok(rows.into_iter().map(Into::into).collect())
}

#[utoipa::path(get, path = "/api/knowledge/exercisesByPointId", tag = "Resources",
    params(PointIdQuery), security(()), responses((status = 200, body = [ExerciseItem])))]
pub async fn exercises_by_point(
    State(ctx): State<AppContext>,
    Query(q): Query<PointIdQuery>,
) -> ApiResult<Vec<ExerciseItem>> {
    let repo = ctx.resource_repo();
    let rows = ListResources {
        repo: repo.as_ref(),
    }
    .exercises(q.point_id)
    .await?;
    ok(rows.into_iter().map(Into::into).collect())
}

async fn delete_of_kind(
    ctx: &AppContext,
    bearer: Bearer,
    kind: ResourceKind,
    req: DeleteResourceRequest,
) -> ApiResult<()> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Teacher)?;
    let repo = ctx.resource_repo();
    DeleteResource {
        repo: repo.as_ref(),
    }
    .execute(&caller, kind, req.id, req.point_id)
    .await?;
    done()
}

#[utoipa::path(post, path = "/api/knowledge/deleteVideo", tag = "Resources",
    request_body = DeleteResourceRequest, responses((status = 200)))]
pub async fn delete_video(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<DeleteResourceRequest>,
) -> ApiResult<()> {
    delete_of_kind(&ctx, bearer, ResourceKind::Video, req).await
}

#[utoipa::path(post, path = "/api/knowledge/deleteCourseware", tag = "Resources",
    request_body = DeleteResourceRequest, responses((status = 200)))]
pub async fn delete_courseware(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<DeleteResourceRequest>,
) -> ApiResult<()> {
    delete_of_kind(&ctx, bearer, ResourceKind::Courseware, req).await
}

#[utoipa::path(post, path = "/api/knowledge/deleteExercise", tag = "Resources",
    request_body = DeleteResourceRequest, responses((status = 200)))]
pub async fn delete_exercise(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<DeleteResourceRequest>,
) -> ApiResult<()> {
    delete_of_kind(&ctx, bearer, ResourceKind::Exercise, req).await
}
