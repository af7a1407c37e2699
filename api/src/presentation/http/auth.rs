use std::collections::HashMap;

use axum::{
    Form, Json, Router,
    extract::{FromRequestParts, Query, State},
    http::{HeaderMap, HeaderValue, header, request::Parts},
    routing::{get, post},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::access::Caller;
use crate::application::use_cases::auth::change_password::ChangePassword;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::application::use_cases::users::add_user::{AddUser, AddUserRequest as AddUserDto};
use crate::application::use_cases::users::delete_user::DeleteUser;
use crate::application::use_cases::users::list_users::ListUsers;
use crate::application::use_cases::users::update_user::{
    UpdateUser, UpdateUserRequest as UpdateUserDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::accounts::account::{Account, UserType};
use crate::presentation::http::envelope::{ApiError, ApiResponse, ApiResult, done, ok};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    #[serde(rename = "id")]
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterForm {
    #[serde(rename = "id")]
    pub user_id: String,
    pub nickname: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user_id: String,
    pub nickname: String,
    #[schema(value_type = String)]
    pub user_type: UserType,
}

impl From<Account> for UserResponse {
    fn from(a: Account) -> Self {
        UserResponse {
            user_id: a.user_id,
            nickname: a.nickname,
            user_type: a.user_type,
        }
    }
}

/// Flat login payload: `{id, nickname, usertype, token}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub id: String,
    pub nickname: String,
    pub usertype: String,
    pub token: String,
}

impl LoginResponse {
    fn new(account: Account, token: String) -> Self {
        LoginResponse {
            id: account.user_id,
            nickname: account.nickname,
            usertype: account.user_type.as_str().to_string(),
            token,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddUserRequest {
    pub user_id: String,
    pub nickname: String,
    pub password: String,
    pub user_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub user_id: String,
    pub nickname: String,
    pub user_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteUserRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub nickname: String,
    pub usertype: String,
    pub iss: String,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn caller(&self) -> Result<Caller, ApiError> {
        let user_type = self
            .usertype
            .parse::<UserType>()
            .map_err(|_| ApiError::unauthorized("token carries an unknown user type"))?;
        Ok(Caller::new(self.sub.clone(), user_type))
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/user/login", post(login))
        .route("/user/register", post(register))
        .route("/user/checktoken", get(check_token))
        .route("/user/change-password", post(change_password))
        .route("/user/add-user", post(add_user))
        .route("/user/list", get(list_users))
        .route("/user/update", post(update_user))
        .route("/user/delete", post(delete_user))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/user/login", tag = "User",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    security(()), responses((status = 200, body = LoginResponse)))]
pub async fn login(
    State(ctx): State<AppContext>,
    Form(form): Form<LoginForm>,
) -> Result<(HeaderMap, Json<ApiResponse<LoginResponse>>), ApiError> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let account = uc
        .execute(&LoginDto {
            user_id: form.user_id,
            password: form.password,
        })
        .await?;
    let token = issue_token(
        &ctx.cfg.jwt_secret,
        &ctx.cfg.jwt_issuer,
        ctx.cfg.jwt_expires_secs,
        &account,
    )?;

    let mut headers = HeaderMap::new();
    let secure = ctx
        .cfg
        .frontend_url
        .as_deref()
        .map(|u| u.starts_with("https://"))
        .unwrap_or(false);
    let cookie = build_access_cookie(&token, ctx.cfg.jwt_expires_secs, secure);
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.insert(header::SET_COOKIE, value);
    }
    tracing::info!(user_id = %account.user_id, "login_succeeded");
    let body = ok(LoginResponse::new(account, token))?;
    Ok((headers, body))
}

#[utoipa::path(post, path = "/api/user/register", tag = "User",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    security(()), responses((status = 200, body = UserResponse)))]
pub async fn register(
    State(ctx): State<AppContext>,
    Form(form): Form<RegisterForm>,
) -> ApiResult<UserResponse> {
    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
    };
    let account = uc
        .execute(&RegisterDto {
            user_id: form.user_id,
            nickname: form.nickname,
            password: form.password,
        })
        .await?;
    ok(account.into())
}

#[utoipa::path(get, path = "/api/user/checktoken", tag = "User",
    responses((status = 200, body = UserResponse)))]
pub async fn check_token(State(ctx): State<AppContext>, bearer: Bearer) -> ApiResult<UserResponse> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Student)?;
    let repo = ctx.user_repo();
    let uc = GetMe {
        repo: repo.as_ref(),
    };
    let account = uc.execute(&caller.user_id).await?;
    ok(account.into())
}

#[utoipa::path(post, path = "/api/user/change-password", tag = "User",
    request_body = ChangePasswordRequest, responses((status = 200)))]
pub async fn change_password(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<()> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Student)?;
    let repo = ctx.user_repo();
    ChangePassword {
        repo: repo.as_ref(),
    }
    .execute(&caller, &req.password)
    .await?;
    done()
}

#[utoipa::path(post, path = "/api/user/add-user", tag = "User",
    request_body = AddUserRequest, responses((status = 200, body = UserResponse)))]
pub async fn add_user(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<AddUserRequest>,
) -> ApiResult<UserResponse> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Teacher)?;
    let repo = ctx.user_repo();
    let account = AddUser {
        repo: repo.as_ref(),
    }
    .execute(
        &caller,
        &AddUserDto {
            user_id: req.user_id,
            nickname: req.nickname,
            password: req.password,
            user_type: req.user_type,
        },
    )
    .await?;
    ok(account.into())
}

#[utoipa::path(get, path = "/api/user/list", tag = "User",
    responses((status = 200, body = [UserResponse])))]
pub async fn list_users(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> ApiResult<Vec<UserResponse>> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Admin)?;
    let repo = ctx.user_repo();
    let accounts = ListUsers {
        repo: repo.as_ref(),
    }
    .execute(&caller)
    .await?;
    ok(accounts.into_iter().map(Into::into).collect())
}

#[utoipa::path(post, path = "/api/user/update", tag = "User",
    request_body = UpdateUserRequest, responses((status = 200)))]
pub async fn update_user(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<()> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Admin)?;
    let repo = ctx.user_repo();
    UpdateUser {
        repo: repo.as_ref(),
    }
    .execute(
        &caller,
        &UpdateUserDto {
            user_id: req.user_id,
            nickname: req.nickname,
            user_type: req.user_type,
        },
    )
    .await?;
    done()
}

#[utoipa::path(post, path = "/api/user/delete", tag = "User",
    request_body = DeleteUserRequest, responses((status = 200)))]
pub async fn delete_user(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<DeleteUserRequest>,
) -> ApiResult<()> {
    let caller = authorize(&ctx.cfg, bearer, UserType::Admin)?;
    let repo = ctx.user_repo();
    DeleteUser {
        repo: repo.as_ref(),
    }
    .execute(&caller, &req.user_id)
    .await?;
    done()
}

// --- Bearer extractor & JWT utils ---

#[derive(Debug)]
pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // 1) Authorization header
        if let Some(auth) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(t) = auth.strip_prefix("Bearer ") {
                return Ok(Bearer(t.trim().to_string()));
            }
        }

        // 2) `token` query parameter, used by media players that cannot set headers
        if let Ok(Query(params)) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri) {
            if let Some(t) = params.get("token").filter(|t| !t.is_empty()) {
                return Ok(Bearer(t.clone()));
            }
        }

        // 3) HttpOnly cookie `access_token`
        if let Some(cookie_hdr) = parts
            .headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(token) = get_cookie(cookie_hdr, "access_token") {
                return Ok(Bearer(token));
            }
        }

        Err(ApiError::unauthorized("missing token"))
    }
}

pub fn issue_token(
    secret: &str,
    issuer: &str,
    ttl_secs: i64,
    account: &Account,
) -> Result<String, ApiError> {
    let now = chrono::Utc::now().timestamp().max(0) as usize;
    let claims = Claims {
        sub: account.user_id.clone(),
        nickname: account.nickname.clone(),
        usertype: account.user_type.as_str().to_string(),
        iss: issuer.to_string(),
        iat: now,
        exp: now + ttl_secs.max(0) as usize,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!(error = ?e, "token_encode_failed");
        ApiError::unauthorized("could not issue token")
    })
}

pub fn decode_token(secret: &str, issuer: &str, token: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[issuer]);
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "token_rejected");
        ApiError::unauthorized("invalid or expired token")
    })?;
    Ok(data.claims)
}

pub fn validate_bearer(cfg: &Config, bearer: Bearer) -> Result<Claims, ApiError> {
    decode_token(&cfg.jwt_secret, &cfg.jwt_issuer, &bearer.0)
}

/// Verifies the token and that its role reaches `min`.
pub fn authorize(cfg: &Config, bearer: Bearer, min: UserType) -> Result<Caller, ApiError> {
    let caller = validate_bearer(cfg, bearer)?.caller()?;
    caller.require(min)?;
    Ok(caller)
}

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

fn build_access_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "access_token={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        token,
        secure_attr,
        max_age_secs.max(0)
    )
}
