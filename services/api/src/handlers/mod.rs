pub mod admin;
pub mod extract;
pub mod mailbox;
pub mod message;
pub mod session;
