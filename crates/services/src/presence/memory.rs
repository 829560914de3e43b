use async_trait::async_trait;
use dashmap::DashMap;
use huddle_db::models::{PresencePatch, TeamMember};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::store::PresenceStore;
use crate::dao::base::{DaoError, DaoResult};

/// In-process store that records every write in order.
#[derive(Default)]
pub struct MemoryPresenceStore {
    members: DashMap<String, TeamMember>,
    writes: Mutex<Vec<(String, PresencePatch)>>,
    failing: AtomicBool,
}

impl MemoryPresenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn member(&self, uid: &str) -> Option<TeamMember> {
        self.members.get(uid).map(|m| m.clone())
    }

    pub async fn writes(&self) -> Vec<(String, PresencePatch)> {
        self.writes.lock().await.clone()
    }
}

#[async_trait]
impl PresenceStore for MemoryPresenceStore {
    async fn merge(&self, uid: &str, patch: &PresencePatch) -> DaoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DaoError::Unavailable("memory store switched off".to_string()));
        }
        patch.apply(
            &mut self
                .members
                .entry(uid.to_string())
                .or_insert_with(|| TeamMember::blank(uid)),
        );
        self.writes.lock().await.push((uid.to_string(), patch.clone()));
        Ok(())
    }
}
