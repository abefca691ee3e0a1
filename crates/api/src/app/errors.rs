use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use msstudy_infra::RepositoryError;

use crate::app::headers;

/// Everything a handler can fail with, mapped to a status code in one place.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client broke an identifier rule (or sent an unusable query). Carries
    /// what the `X-<app>-error` alert headers need.
    #[error("{title}")]
    BadRequestAlert {
        app_name: String,
        entity_name: &'static str,
        title: String,
        error_key: &'static str,
    },

    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error(transparent)]
    Store(#[from] RepositoryError),
}

impl ApiError {
    pub fn bad_request_alert(
        app_name: &str,
        entity_name: &'static str,
        title: impl Into<String>,
        error_key: &'static str,
    ) -> Self {
        Self::BadRequestAlert {
            app_name: app_name.to_string(),
            entity_name,
            title: title.into(),
            error_key,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::BadRequestAlert {
                app_name,
                entity_name,
                title,
                error_key,
            } => {
                let headers: HeaderMap = headers::failure_alert(&app_name, entity_name, error_key);
                let body = json!({
                    "title": title,
                    "status": StatusCode::BAD_REQUEST.as_u16(),
                    "entityName": entity_name,
                    "errorKey": error_key,
                    "message": format!("error.{error_key}"),
                    "params": entity_name,
                });
                (StatusCode::BAD_REQUEST, headers, axum::Json(body)).into_response()
            }
            ApiError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
            ApiError::Store(RepositoryError::NotFound(id)) => {
                json_error(StatusCode::NOT_FOUND, "not_found", format!("demo {id} not found"))
            }
            ApiError::Store(e) => {
                tracing::error!("store failure: {e}");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
            }
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
