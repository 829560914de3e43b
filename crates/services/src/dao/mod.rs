pub mod announcement;
pub mod base;
pub mod chat_message;
pub mod member;

pub use base::BaseDao;
