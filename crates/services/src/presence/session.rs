use chrono::Utc;
use huddle_db::models::PresencePatch;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use super::machine::{Effect, PresenceEvent, PresenceMachine};
use super::store::PresenceStore;

/// Owner's end of a running presence session.
///
/// Dropping the handle closes the event channel; the task then stops
/// without writing anything.
pub struct PresenceHandle {
    events: mpsc::UnboundedSender<PresenceEvent>,
    task: JoinHandle<()>,
}

impl PresenceHandle {
    /// Returns false once the session has torn down.
    pub fn send(&self, event: PresenceEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.events.is_closed() || self.task.is_finished()
    }

    /// Waits for the session task to finish, after its last write.
    pub async fn closed(self) {
        let Self { events, task } = self;
        // keep the sender alive so a pending teardown is not cut short
        if let Err(e) = task.await {
            warn!(error = %e, "Presence session task failed");
        }
        drop(events);
    }
}

/// Starts the presence session for one `(uid, session id)` pair.
pub fn spawn_session(
    uid: String,
    session_id: String,
    store: Arc<dyn PresenceStore>,
    grace: Duration,
) -> PresenceHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(uid, session_id, PresenceMachine::new(grace), rx, store));

    PresenceHandle { events: tx, task }
}

async fn run(
    uid: String,
    session_id: String,
    mut machine: PresenceMachine,
    mut events: mpsc::UnboundedReceiver<PresenceEvent>,
    store: Arc<dyn PresenceStore>,
) {
    info!(%uid, %session_id, "Presence session started");
    // At most one Offline timer is armed per session.
    let mut timer: Option<(u64, Instant)> = None;

    loop {
        let effects = tokio::select! {
            biased;
            event = events.recv() => match event {
                Some(event) => {
                    debug!(%uid, %session_id, ?event, "Presence event");
                    machine.handle(event, now_ms())
                }
                None => break,
            },
            generation = wait_for(timer) => {
                timer = None;
                machine.offline_timer_fired(generation, now_ms())
            }
        };

        let mut teardown = false;
        for effect in effects {
            match effect {
                Effect::Write(patch) => write(&*store, &uid, &patch).await,
                Effect::ScheduleOffline { generation, after } => {
                    timer = Some((generation, Instant::now() + after));
                }
                Effect::CancelOffline => timer = None,
                Effect::Teardown => teardown = true,
            }
        }
        if teardown {
            break;
        }
    }

    info!(
        %uid,
        %session_id,
        status = ?machine.status(),
        was_in_call = machine.was_in_call(),
        torn_down = machine.is_closed(),
        "Presence session ended"
    );
}

async fn wait_for(timer: Option<(u64, Instant)>) -> u64 {
    match timer {
        Some((generation, deadline)) => {
            sleep_until(deadline).await;
            generation
        }
        None => std::future::pending().await,
    }
}

/// Store failures are logged and swallowed; the machine keeps going.
async fn write(store: &dyn PresenceStore, uid: &str, patch: &PresencePatch) {
    if let Err(e) = store.merge(uid, patch).await {
        warn!(%uid, error = %e, "Presence write failed");
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
