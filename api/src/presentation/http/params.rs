use axum::{
    Json,
    extract::{FromRequest, Query, Request},
    http::header,
};
use serde::de::DeserializeOwned;

use crate::presentation::http::envelope::ApiError;

/// Reads `T` from a JSON body, or from the query string when the request has no JSON body.
/// Older clients post graph edits as query parameters with an empty body.
#[derive(Debug)]
pub struct JsonOrQuery<T>(pub T);

fn has_json_body(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim_start().starts_with("application/json"))
        .unwrap_or(false)
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonOrQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if has_json_body(&req) {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            return Ok(JsonOrQuery(value));
        }
        let Query(value) = Query::<T>::try_from_uri(req.uri())
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Ok(JsonOrQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Edit {
        name: String,
        #[serde(default)]
        value: String,
    }

    async fn extract(req: Request) -> Result<Edit, ApiError> {
        JsonOrQuery::<Edit>::from_request(req, &()).await.map(|JsonOrQuery(e)| e)
    }

    #[tokio::test]
    async fn reads_json_body() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/edit?name=ignored")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"Limits","value":"v1"}"#))
            .unwrap();
        let edit = extract(req).await.unwrap();
        assert_eq!(edit.name, "Limits");
        assert_eq!(edit.value, "v1");
    }

    #[tokio::test]
    async fn falls_back_to_query_string() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/edit?name=Chain%20rule")
            .body(Body::empty())
            .unwrap();
        let edit = extract(req).await.unwrap();
        assert_eq!(edit.name, "Chain rule");
        assert_eq!(edit.value, "");
    }

    #[tokio::test]
    async fn missing_fields_are_a_bad_request() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/edit")
            .body(Body::empty())
            .unwrap();
        let err = extract(req).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
