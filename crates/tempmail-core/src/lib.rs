//! Service plumbing shared by TempMail binaries.
//!
//! Health probes, request-id and CORS layers, tracing bootstrap and serde helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
