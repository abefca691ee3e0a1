//! HTTP API: router, demo resource handlers, and request/response mapping.

pub mod app;
pub mod middleware;
