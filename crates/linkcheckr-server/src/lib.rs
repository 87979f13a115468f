//! HTTP wrapper around the link-check pipeline: routes, DTOs, configuration,
//! and OpenAPI documentation.

pub mod config;
pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;
