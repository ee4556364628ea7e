//! Domain types shared across TempMail crates.
//!
//! Pure types and rules with no framework dependencies.

pub mod access_code;
pub mod address;
pub mod id;
