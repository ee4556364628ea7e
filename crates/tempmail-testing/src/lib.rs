//! Test utilities for TempMail services.
//!
//! Token minting and `Authorization` header helpers.
//! Import from `[dev-dependencies]` only.

pub mod auth;
