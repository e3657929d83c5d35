//! HTTP handlers, one module per API area.

pub mod auth;
pub mod dashboard;
pub mod jobs;
pub mod team;
