//! REST resource for `Demo` rows.
//!
//! | Method | Path | Success | Failure |
//! |--------|------|---------|---------|
//! | POST | `/demos` | 201 + `Location` | 400 `idexists` |
//! | PUT | `/demos` | 200 | 400 `idnull`, 404 unknown id |
//! | GET | `/demos` | 200 array | 400 `badsort` |
//! | GET | `/demos/:id` | 200 | 404 |
//! | DELETE | `/demos/:id` | 204 | — |

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use msstudy_core::{Demo, DemoId};

use crate::app::errors::{self, ApiError};
use crate::app::services::AppServices;
use crate::app::{dto, headers};

/// Entity name reported in alert headers and bad-request bodies.
pub const ENTITY_NAME: &str = "msstudyDemo";

pub fn router() -> Router {
    Router::new()
        .route("/demos", post(create_demo).put(update_demo).get(get_all_demos))
        .route("/demos/:id", get(get_demo).delete(delete_demo))
}

pub async fn create_demo(
    Extension(services): Extension<Arc<AppServices>>,
    Json(demo): Json<Demo>,
) -> Result<axum::response::Response, ApiError> {
    tracing::debug!("REST request to save Demo : {demo}");
    if demo.id().is_some() {
        return Err(ApiError::bad_request_alert(
            &services.app_name,
            ENTITY_NAME,
            "A new demo cannot already have an ID",
            "idexists",
        ));
    }

    let result = services.demos.save(demo).await?;
    let id = result
        .id()
        .map(|id| id.to_string())
        .unwrap_or_default();

    let mut response_headers = headers::entity_creation_alert(&services.app_name, ENTITY_NAME, &id);
    match format!("/api/demos/{id}").parse() {
        Ok(location) => {
            response_headers.insert(header::LOCATION, location);
        }
        Err(_) => tracing::warn!("unencodable Location for demo {id}"),
    }

    Ok((StatusCode::CREATED, response_headers, Json(result)).into_response())
}

pub async fn update_demo(
    Extension(services): Extension<Arc<AppServices>>,
    Json(demo): Json<Demo>,
) -> Result<axum::response::Response, ApiError> {
    tracing::debug!("REST request to update Demo : {demo}");
    let Some(id) = demo.id() else {
        return Err(ApiError::bad_request_alert(
            &services.app_name,
            ENTITY_NAME,
            "Invalid id",
            "idnull",
        ));
    };

    let result = services.demos.save(demo).await?;
    let response_headers = headers::entity_update_alert(&services.app_name, ENTITY_NAME, &id.to_string());

    Ok((StatusCode::OK, response_headers, Json(result)).into_response())
}

pub async fn get_all_demos(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListDemosQuery>,
) -> Result<axum::response::Response, ApiError> {
    tracing::debug!("REST request to get all Demos");
    let sort = match query.parsed_sort() {
        None => None,
        Some(Ok(sort)) => Some(sort),
        Some(Err(e)) => {
            return Err(ApiError::bad_request_alert(
                &services.app_name,
                ENTITY_NAME,
                e.to_string(),
                "badsort",
            ));
        }
    };

    let demos = services.demos.find_all(sort).await?;
    Ok((StatusCode::OK, Json(demos)).into_response())
}

pub async fn get_demo(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id = parse_id(&id)?;
    tracing::debug!("REST request to get Demo : {id}");

    match services.demos.find_one(id).await? {
        Some(demo) => Ok((StatusCode::OK, Json(demo)).into_response()),
        None => Ok(errors::json_error(StatusCode::NOT_FOUND, "not_found", "demo not found")),
    }
}

pub async fn delete_demo(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id = parse_id(&id)?;
    tracing::debug!("REST request to delete Demo : {id}");

    services.demos.delete(id).await?;
    let response_headers = headers::entity_deletion_alert(&services.app_name, ENTITY_NAME, &id.to_string());

    Ok((StatusCode::NO_CONTENT, response_headers).into_response())
}

fn parse_id(raw: &str) -> Result<DemoId, ApiError> {
    raw.parse::<DemoId>()
        .map_err(|_| ApiError::InvalidId(format!("invalid demo id '{raw}'")))
}
