//! HTTP API: routing, auth, request/response mapping and realtime push.

pub mod app;
pub mod authz;
pub mod context;
pub mod middleware;
