pub mod admin;
pub mod db;
