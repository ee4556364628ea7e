//! sea-orm entities for the TempMail API database.

pub mod access_codes;
pub mod email_messages;
pub mod session_ips;
pub mod sessions;
pub mod temp_addresses;
