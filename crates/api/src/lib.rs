//! HTTP API for the invoice dashboard: mutation pipeline, routing, and
//! request/response mapping.

pub mod actions;
pub mod app;
pub mod middleware;
