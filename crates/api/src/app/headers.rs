//! `X-<app>-alert` / `X-<app>-error` / `X-<app>-params` response headers.
//!
//! Clients use these to show a notification after a write without parsing
//! the body.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

pub fn entity_creation_alert(app_name: &str, entity_name: &str, param: &str) -> HeaderMap {
    alert(
        app_name,
        &format!("A new {entity_name} is created with identifier {param}"),
        param,
    )
}

pub fn entity_update_alert(app_name: &str, entity_name: &str, param: &str) -> HeaderMap {
    alert(
        app_name,
        &format!("A {entity_name} is updated with identifier {param}"),
        param,
    )
}

pub fn entity_deletion_alert(app_name: &str, entity_name: &str, param: &str) -> HeaderMap {
    alert(
        app_name,
        &format!("A {entity_name} is deleted with identifier {param}"),
        param,
    )
}

pub fn failure_alert(app_name: &str, entity_name: &str, error_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, format!("x-{app_name}-error"), &format!("error.{error_key}"));
    insert(&mut headers, format!("x-{app_name}-params"), entity_name);
    headers
}

fn alert(app_name: &str, message: &str, param: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, format!("x-{app_name}-alert"), message);
    insert(&mut headers, format!("x-{app_name}-params"), param);
    headers
}

fn insert(headers: &mut HeaderMap, name: String, value: &str) {
    match (HeaderName::try_from(name), HeaderValue::from_str(value)) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => tracing::warn!("dropping alert header with unencodable name or value"),
    }
}
