//! Auth types shared across TempMail crates.
//!
//! Provides the two bearer-token namespaces (user session / admin), JWT
//! issue + validation, and `Authorization: Bearer` parsing.

pub mod bearer;
pub mod token;
