use rand::RngExt;

pub mod admin;
pub mod code;
pub mod mailbox;
pub mod message;
pub mod session;
pub mod stats;
pub mod token;

/// Draw `len` characters uniformly from `charset`.
pub(crate) fn random_string(charset: &[u8], len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| charset[rng.random_range(0..charset.len())] as char)
        .collect()
}
