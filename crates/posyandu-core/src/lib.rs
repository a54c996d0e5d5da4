//! Cross-cutting service plumbing: health checks, request ids, tracing setup,
//! serde helpers and bounded remote calls.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod timeout;
pub mod tracing;
