pub mod announcement;
pub mod chat_message;
pub mod member;
pub mod status_preset;

pub use announcement::*;
pub use chat_message::*;
pub use member::*;
pub use status_preset::*;
