//! Presence: who is Online, Offline or In Call.
//!
//! [`machine::PresenceMachine`] turns client lifecycle events into merge
//! writes and timer effects without doing any IO. [`session`] drives one
//! machine per live listener set on a tokio task, and [`registry`] keeps
//! exactly one such session per `(uid, session id)`.

pub mod machine;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod registry;
pub mod session;
pub mod store;

pub use machine::{DEFAULT_OFFLINE_GRACE, Effect, PresenceEvent, PresenceMachine, detached_patch};
pub use registry::{AttachmentId, PresenceRegistry};
pub use session::{PresenceHandle, spawn_session};
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryPresenceStore;
pub use store::{MongoPresenceStore, PresenceStore};
