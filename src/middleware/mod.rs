//! HTTP middleware for the portal core
//!
//! - `Caller` extractor: bearer token to resolved caller context
//! - Observability layer: request IDs and HTTP metrics

pub mod auth;
pub mod metrics;

pub use auth::Caller;
pub use metrics::ObservabilityLayer;
