pub mod announcement;
pub mod auth;
pub mod chat;
pub mod client_config;
pub mod dashboard;
pub mod drive;
pub mod member;
pub mod status_preset;
