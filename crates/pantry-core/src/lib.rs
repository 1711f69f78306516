//! Cross-service plumbing for Pantry services: errors, health checks,
//! request-id middleware, tracing setup and sea-orm helpers.

pub mod error;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod tracing;
