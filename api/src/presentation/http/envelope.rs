use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::error::ServiceError;

pub mod ret {
    pub const OK: i32 = 0;
    pub const DB_ERROR: i32 = 1001;
    pub const NO_ROWS: i32 = 1002;
    pub const DUPLICATE: i32 = 1062;
    pub const MISSING_PARAM: i32 = 2001;
    pub const WRONG_PASSWORD: i32 = 2002;
    pub const JWT_ERROR: i32 = 2003;
    pub const AUTH_ERROR: i32 = 2004;
    pub const WRONG_PARAM: i32 = 2005;
}

/// Body shape shared by every endpoint: `{ "ret": 0, "msg": "ok", "data": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ret: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse {
        ret: ret::OK,
        msg: "ok".into(),
        data: Some(data),
    }))
}

pub fn ok_with_msg<T: Serialize>(msg: impl Into<String>, data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse {
        ret: ret::OK,
        msg: msg.into(),
        data: Some(data),
    }))
}

pub fn done() -> ApiResult<()> {
    Ok(Json(ApiResponse {
        ret: ret::OK,
        msg: "ok".into(),
        data: None,
    }))
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub ret: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, ret: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            ret,
            msg: msg.into(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ret::JWT_ERROR, msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ret::WRONG_PARAM, msg)
    }

    pub fn missing(field: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ret::MISSING_PARAM,
            format!("missing parameter: {field}"),
        )
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let msg = err.to_string();
        match err {
            ServiceError::MissingParam(_) => {
                ApiError::new(StatusCode::BAD_REQUEST, ret::MISSING_PARAM, msg)
            }
            ServiceError::InvalidInput(_) => {
                ApiError::new(StatusCode::BAD_REQUEST, ret::WRONG_PARAM, msg)
            }
            ServiceError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, ret::NO_ROWS, msg),
            ServiceError::Duplicate(_) => ApiError::new(StatusCode::CONFLICT, ret::DUPLICATE, msg),
            ServiceError::Forbidden(_) => ApiError::new(StatusCode::FORBIDDEN, ret::AUTH_ERROR, msg),
            ServiceError::Unauthorized(_) => {
                ApiError::new(StatusCode::UNAUTHORIZED, ret::JWT_ERROR, msg)
            }
            ServiceError::WrongPassword => {
                ApiError::new(StatusCode::UNAUTHORIZED, ret::WRONG_PASSWORD, msg)
            }
            ServiceError::Internal(e) => {
                tracing::error!(error = ?e, "request_failed");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ret::DB_ERROR,
                    "internal server error",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body: ApiResponse<()> = ApiResponse {
            ret: self.ret,
            msg: self.msg,
            data: None,
        };
        (self.status, Json(body)).into_response()
    }
}
