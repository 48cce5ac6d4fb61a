//! Portal Core - authorization backend for the volunteer teaching portal
//!
//! Resolves each caller to a role and a set of class assignments, evaluates
//! per-table row policies against that context, and serves the portal's
//! tables and derived views over a REST API.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod policy;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
