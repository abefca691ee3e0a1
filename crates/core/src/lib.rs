//! `msstudy-core` — domain building blocks for the demo resource.
//!
//! This crate contains **pure domain** types (no infrastructure concerns).

pub mod demo;
pub mod entity;
pub mod error;
pub mod id;

pub use demo::Demo;
pub use entity::Entity;
pub use error::DomainError;
pub use id::DemoId;
