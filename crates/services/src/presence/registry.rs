use chrono::Utc;
use dashmap::DashMap;
use huddle_db::models::{PresencePatch, Profile, UserStatus};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use super::machine::{PresenceEvent, detached_patch};
use super::session::{PresenceHandle, spawn_session};
use super::store::PresenceStore;
use crate::dao::base::DaoResult;

type SessionKey = (String, String);

/// Identifies one `attach` call. A reconnect under the same session id gets
/// a new one, so a late close of the old socket cannot end the new session.
pub type AttachmentId = u64;

struct Attached {
    id: AttachmentId,
    handle: PresenceHandle,
}

/// Live presence sessions, one per `(uid, session id)`.
pub struct PresenceRegistry {
    sessions: DashMap<SessionKey, Attached>,
    next_attachment: AtomicU64,
    store: Arc<dyn PresenceStore>,
    grace: Duration,
}

impl PresenceRegistry {
    pub fn new(store: Arc<dyn PresenceStore>, grace: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            next_attachment: AtomicU64::new(1),
            store,
            grace,
        }
    }

    /// Starts a session and signs it in. A session already registered under
    /// the same key is replaced; its task stops without writing.
    pub fn attach(&self, uid: &str, session_id: &str, profile: Profile) -> AttachmentId {
        let handle = spawn_session(
            uid.to_string(),
            session_id.to_string(),
            self.store.clone(),
            self.grace,
        );
        handle.send(PresenceEvent::SignedIn(profile));

        let id = self.next_attachment.fetch_add(1, Ordering::Relaxed);
        if self
            .sessions
            .insert(key(uid, session_id), Attached { id, handle })
            .is_some()
        {
            debug!(%uid, %session_id, "Replaced presence session");
        }
        id
    }

    /// Routes an event to one attachment. Returns false when it is no longer
    /// live, including after it was replaced by a reconnect.
    pub fn dispatch(
        &self,
        uid: &str,
        session_id: &str,
        attachment: AttachmentId,
        event: PresenceEvent,
    ) -> bool {
        let key = key(uid, session_id);
        let delivered = self
            .sessions
            .get(&key)
            .filter(|entry| entry.id == attachment)
            .map(|entry| entry.handle.send(event))
            .unwrap_or(false);
        if !delivered {
            self.sessions
                .remove_if(&key, |_, entry| entry.id == attachment && entry.handle.is_closed());
        }
        delivered
    }

    /// Routes an event to every live session of `uid`. With none, the write
    /// the event stands for is applied directly.
    pub async fn apply(&self, uid: &str, event: PresenceEvent) -> DaoResult<()> {
        let mut delivered = 0;
        let mut stale = Vec::new();
        for entry in self.sessions.iter().filter(|e| e.key().0 == uid) {
            if entry.value().handle.send(event.clone()) {
                delivered += 1;
            } else {
                stale.push((entry.key().clone(), entry.value().id));
            }
        }
        for (key, id) in stale {
            self.sessions.remove_if(&key, |_, entry| entry.id == id);
        }

        if delivered > 0 {
            debug!(%uid, sessions = delivered, ?event, "Presence event dispatched");
            return Ok(());
        }
        match detached_patch(&event, now_ms()) {
            Some(patch) => self.store.merge(uid, &patch).await,
            None => Ok(()),
        }
    }

    /// Records a sign-in: profile refresh plus Online.
    pub async fn sign_in(&self, uid: &str, profile: Profile) -> DaoResult<()> {
        self.store
            .merge(uid, &PresencePatch::sign_in(profile, now_ms()))
            .await
    }

    /// Unmounts one attachment. The timer is dropped and nothing is written.
    /// Returns false when that attachment is no longer registered.
    pub fn detach(&self, uid: &str, session_id: &str, attachment: AttachmentId) -> bool {
        self.take(uid, session_id, attachment).is_some()
    }

    /// Ends one attachment as a page unload; Offline is written before this
    /// returns. A session that has since been replaced is left alone.
    pub async fn unload(&self, uid: &str, session_id: &str, attachment: AttachmentId) {
        match self.take(uid, session_id, attachment) {
            Some(handle) => {
                handle.send(PresenceEvent::Unload);
                handle.closed().await;
            }
            None => debug!(%uid, %session_id, "Unload for a replaced session ignored"),
        }
    }

    fn take(
        &self,
        uid: &str,
        session_id: &str,
        attachment: AttachmentId,
    ) -> Option<PresenceHandle> {
        self.sessions
            .remove_if(&key(uid, session_id), |_, entry| entry.id == attachment)
            .map(|(_, entry)| entry.handle)
    }

    /// Signs the user out everywhere. Offline is written before this returns.
    pub async fn sign_out(&self, uid: &str) -> DaoResult<()> {
        let keys: Vec<SessionKey> = self
            .sessions
            .iter()
            .filter(|e| e.key().0 == uid)
            .map(|e| e.key().clone())
            .collect();

        let mut ended = 0;
        for key in keys {
            if let Some((_, Attached { handle, .. })) = self.sessions.remove(&key) {
                if handle.send(PresenceEvent::SignOut) {
                    ended += 1;
                }
                handle.closed().await;
            }
        }

        info!(%uid, sessions = ended, "Signed out");
        if ended == 0 {
            self.store
                .merge(uid, &PresencePatch::status(UserStatus::Offline, now_ms()))
                .await?;
        }
        Ok(())
    }

    pub fn session_count(&self, uid: &str) -> usize {
        self.sessions
            .iter()
            .filter(|e| e.key().0 == uid && !e.value().handle.is_closed())
            .count()
    }
}

fn key(uid: &str, session_id: &str) -> SessionKey {
    (uid.to_string(), session_id.to_string())
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
