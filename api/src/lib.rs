//! Host process for the verification provider
//!
//! Wires the core services to their infrastructure and exposes them through a
//! queue worker, a cleanup scheduler and an HTTP validation endpoint.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod telemetry;
pub mod worker;
