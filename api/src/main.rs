use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use lms_api::bootstrap::app_context::{AppContext, AppServices};
use lms_api::bootstrap::config::Config;
use lms_api::infrastructure::db::repositories::group_repository_sqlx::SqlxGroupRepository;
use lms_api::infrastructure::db::repositories::resource_repository_sqlx::SqlxResourceRepository;
use lms_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use lms_api::infrastructure::graph::knowledge_store_neo4j::Neo4jKnowledgeStore;
use lms_api::infrastructure::media::ffmpeg_cover::FfmpegCoverExtractor;
use lms_api::infrastructure::storage::s3_object_store::S3ObjectStore;
use lms_api::presentation::http::{analysis, auth, groups, health, knowledge, resources};

#[derive(OpenApi)]
#[openapi(
        paths(
            lms_api::presentation::http::auth::login,
            lms_api::presentation::http::auth::register,
            lms_api::presentation::http::auth::check_token,
            lms_api::presentation::http::auth::change_password,
            lms_api::presentation::http::auth::add_user,
            lms_api::presentation::http::auth::list_users,
            lms_api::presentation::http::auth::update_user,
            lms_api::presentation::http::auth::delete_user,
            lms_api::presentation::http::groups::create_group,
            lms_api::presentation::http::groups::add_members,
            lms_api::presentation::http::groups::remove_members,
            lms_api::presentation::http::groups::group_detail,
            lms_api::presentation::http::groups::delete_group,
            lms_api::presentation::http::groups::list_groups,
            lms_api::presentation::http::groups::all_groups,
            lms_api::presentation::http::groups::rename_group,
            lms_api::presentation::http::knowledge::add_node,
            lms_api::presentation::http::knowledge::update_node,
            lms_api::presentation::http::knowledge::delete_node,
            lms_api::presentation::http::knowledge::search_by_keyword,
            lms_api::presentation::http::knowledge::add_link,
            lms_api::presentation::http::knowledge::update_link,
            lms_api::presentation::http::knowledge::delete_link,
            lms_api::presentation::http::knowledge::relations,
            lms_api::presentation::http::knowledge::chapter_graph,
            lms_api::presentation::http::knowledge::section_graph,
            lms_api::presentation::http::knowledge::point_graph,
            lms_api::presentation::http::knowledge::sections_of_chapter,
            lms_api::presentation::http::knowledge::points_of_section,
            lms_api::presentation::http::knowledge::point_detail,
            lms_api::presentation::http::resources::upload_resource,
            lms_api::presentation::http::resources::videos_by_point,
            lms_api::presentation::http::resources::coursewares_by_point,
            lms_api::presentation::http::resources::exercises_by_point,
            lms_api::presentation::http::resources::delete_video,
            lms_api::presentation::http::resources::delete_courseware,
            lms_api::presentation::http::resources::delete_exercise,
            lms_api::presentation::http::analysis::auto_construct,
            lms_api::presentation::http::analysis::path_recommend,
            lms_api::presentation::http::analysis::learning_difficulty,
            lms_api::presentation::http::analysis::connections,
            lms_api::presentation::http::health::health,
        ),
        components(schemas(
            lms_api::presentation::http::auth::LoginForm,
            lms_api::presentation::http::auth::RegisterForm,
            lms_api::presentation::http::auth::UserResponse,
            lms_api::presentation::http::auth::LoginResponse,
            lms_api::presentation::http::auth::ChangePasswordRequest,
            lms_api::presentation::http::auth::AddUserRequest,
            lms_api::presentation::http::auth::UpdateUserRequest,
            lms_api::presentation::http::auth::DeleteUserRequest,
            lms_api::presentation::http::groups::CreateGroupRequest,
            lms_api::presentation::http::groups::CreatedGroup,
            lms_api::presentation::http::groups::GroupMembersRequest,
            lms_api::presentation::http::groups::GroupIdRequest,
            lms_api::presentation::http::groups::RenameGroupRequest,
            lms_api::presentation::http::groups::AffectedResponse,
            lms_api::presentation::http::groups::GroupItem,
            lms_api::presentation::http::groups::MemberItem,
            lms_api::presentation::http::groups::GroupDetailResponse,
            lms_api::presentation::http::groups::GroupOverviewResponse,
            lms_api::presentation::http::knowledge::NodeItem,
            lms_api::presentation::http::knowledge::LinkItem,
            lms_api::presentation::http::knowledge::GraphResponse,
            lms_api::presentation::http::knowledge::AddNodeBody,
            lms_api::presentation::http::knowledge::AddNodeResponse,
            lms_api::presentation::http::knowledge::UpdateNodeBody,
            lms_api::presentation::http::knowledge::DeleteNodeBody,
            lms_api::presentation::http::knowledge::DeletedResponse,
            lms_api::presentation::http::knowledge::LinkBody,
            lms_api::presentation::http::knowledge::UpdateLinkBody,
            lms_api::presentation::http::knowledge::LinkResponse,
            lms_api::presentation::http::knowledge::RelationItem,
            lms_api::presentation::http::resources::UploadResourceMultipart,
            lms_api::presentation::http::resources::UploadResourceResponse,
            lms_api::presentation::http::resources::DeleteResourceRequest,
            lms_api::presentation::http::resources::VideoItem,
            lms_api::presentation::http::resources::CoursewareItem,
            lms_api::presentation::http::resources::ExerciseItem,
            lms_api::presentation::http::analysis::AutoConstructMultipart,
            lms_api::presentation::http::analysis::ImportSummaryResponse,
            lms_api::presentation::http::analysis::PathBody,
            lms_api::presentation::http::analysis::PathRelationshipItem,
            lms_api::presentation::http::analysis::PathResponse,
            lms_api::presentation::http::analysis::DifficultyResponse,
            lms_api::presentation::http::analysis::ConnectionItem,
            lms_api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "User", description = "Accounts and authentication"),
            (name = "Groups", description = "User groups"),
            (name = "Knowledge", description = "Knowledge graph nodes and relations"),
            (name = "Resources", description = "Videos, coursewares and exercises"),
            (name = "Analysis", description = "Graph import and learning analytics"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn cors_layer(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        _ if cfg.is_production => base.allow_origin(AllowOrigin::exact(
            HeaderValue::from_static("http://invalid"),
        )),
        _ => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "lms_api=debug,tower_http=info,sqlx=warn,neo4rs=warn".into()
        }))
        .init();

    let cfg = Config::from_env()?;
    info!(port = cfg.api_port, production = cfg.is_production, "starting_lms_api");

    // Relational store
    let pool = lms_api::infrastructure::db::connect_pool(&cfg.database_url).await?;
    lms_api::infrastructure::db::migrate(&pool).await?;
    let user_repo = Arc::new(SqlxUserRepository::new(pool.clone()));
    let group_repo = Arc::new(SqlxGroupRepository::new(pool.clone()));
    let resource_repo = Arc::new(SqlxResourceRepository::new(pool.clone()));

    if let (Some(admin_id), Some(admin_password)) = (&cfg.admin_id, &cfg.admin_password) {
        if let Err(e) =
            lms_api::infrastructure::db::seed_admin(user_repo.as_ref(), admin_id, admin_password)
                .await
        {
            error!(error = ?e, "admin_seed_failed");
        }
    }

    // Knowledge graph
    let graph = lms_api::infrastructure::graph::connect_graph(
        &cfg.neo4j_uri,
        &cfg.neo4j_user,
        &cfg.neo4j_password,
    )
    .await?;
    lms_api::infrastructure::graph::ensure_constraints(&graph).await?;
    let graph_store = Arc::new(Neo4jKnowledgeStore::new(graph));

    // Object storage and media
    let object_store = Arc::new(S3ObjectStore::new(&cfg.s3).await?);
    let cover_extractor = Arc::new(FfmpegCoverExtractor::new(cfg.ffmpeg_bin.clone()));
    if let Err(e) = tokio::fs::create_dir_all(&cfg.upload_tmp_dir).await {
        tracing::warn!(error = ?e, dir = %cfg.upload_tmp_dir, "upload_tmp_dir_create_failed");
    }

    let services = AppServices::new(
        pool,
        user_repo,
        group_repo,
        graph_store,
        resource_repo,
        object_store,
        cover_extractor,
    );
    let ctx = AppContext::new(cfg.clone(), services);

    let app = Router::new()
        .nest("/api", health::routes(ctx.clone()))
        .nest("/api", auth::routes(ctx.clone()))
        .nest("/api", groups::routes(ctx.clone()))
        .nest("/api", knowledge::routes(ctx.clone()))
        .nest("/api", resources::routes(ctx.clone()))
        .nest("/api", analysis::routes(ctx.clone()))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(&cfg))
        // Multipart uploads carry whole videos
        .layer(DefaultBodyLimit::max(cfg.upload_max_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    if let Err(e) = axum::serve(listener, app).await {
        error!(?e, "API server failed");
        return Err(e.into());
    }
    Ok(())
}
