pub mod auth;
pub mod config;
pub mod license;
pub mod users;
