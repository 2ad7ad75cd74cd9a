//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, validated JSON extractor
//! - `middleware`: JWT authentication middleware
//! - `modules`: per-resource handlers and DTOs
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use router::create_api_router;
