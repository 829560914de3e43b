pub mod auth;
pub mod cloud_storage;
pub mod dao;
pub mod dashboard;
pub mod feed;
pub mod presence;
pub mod projection;
pub mod validation;

pub use auth::AuthService;
pub use cloud_storage::google_drive::GoogleDriveService;
pub use dao::*;
pub use dashboard::DashboardService;
pub use feed::{Feed, FeedHub};
pub use presence::PresenceRegistry;
