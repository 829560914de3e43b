use huddle_db::models::{PresencePatch, Profile, UserStatus};
use std::time::Duration;

/// Grace period between a tab going hidden and the user being marked Offline.
pub const DEFAULT_OFFLINE_GRACE: Duration = Duration::from_secs(30);

/// Client lifecycle signals and explicit user actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceEvent {
    SignedIn(Profile),
    JoinMeeting,
    SetStatus(UserStatus),
    Visibility { visible: bool },
    FocusGained,
    Unload,
    /// Empty text clears the custom status.
    SaveCustomStatus(String),
    SignOut,
}

/// What the driver must do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Write(PresencePatch),
    /// Arm the Offline timer, replacing any armed one.
    ScheduleOffline { generation: u64, after: Duration },
    CancelOffline,
    /// The listener set is done; stop the session.
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingSignIn,
    Active,
    Closed,
}

/// Presence heuristic for one listener set.
///
/// Three states live in the store; `was_in_call` is the machine's own memory
/// that the user left for a meeting, so the first return to the tab brings
/// them back Online.
#[derive(Debug)]
pub struct PresenceMachine {
    phase: Phase,
    status: Option<UserStatus>,
    was_in_call: bool,
    pending_offline: Option<u64>,
    next_generation: u64,
    grace: Duration,
}

impl PresenceMachine {
    pub fn new(grace: Duration) -> Self {
        Self {
            phase: Phase::AwaitingSignIn,
            status: None,
            was_in_call: false,
            pending_offline: None,
            next_generation: 0,
            grace,
        }
    }

    /// Last status this machine wrote.
    pub fn status(&self) -> Option<UserStatus> {
        self.status
    }

    pub fn was_in_call(&self) -> bool {
        self.was_in_call
    }

    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }

    pub fn handle(&mut self, event: PresenceEvent, now_ms: i64) -> Vec<Effect> {
        match self.phase {
            Phase::Closed => return Vec::new(),
            Phase::AwaitingSignIn => {
                // Nothing is written for a session without a signed-in user.
                return match event {
                    PresenceEvent::SignedIn(profile) => {
                        self.phase = Phase::Active;
                        self.status = Some(UserStatus::Online);
                        vec![Effect::Write(PresencePatch::sign_in(profile, now_ms))]
                    }
                    _ => Vec::new(),
                };
            }
            Phase::Active => {}
        }

        match event {
            // init runs once per session
            PresenceEvent::SignedIn(_) => Vec::new(),
            PresenceEvent::JoinMeeting | PresenceEvent::SetStatus(UserStatus::InCall) => {
                self.was_in_call = true;
                vec![self.write_status(UserStatus::InCall, now_ms)]
            }
            PresenceEvent::SetStatus(status) => vec![self.write_status(status, now_ms)],
            PresenceEvent::Visibility { visible: true } => {
                let mut effects = self.cancel_offline();
                self.was_in_call = false;
                effects.push(self.write_status(UserStatus::Online, now_ms));
                effects
            }
            PresenceEvent::Visibility { visible: false } => {
                self.next_generation += 1;
                self.pending_offline = Some(self.next_generation);
                vec![Effect::ScheduleOffline {
                    generation: self.next_generation,
                    after: self.grace,
                }]
            }
            PresenceEvent::FocusGained => {
                if !self.was_in_call {
                    return Vec::new();
                }
                self.was_in_call = false;
                vec![self.write_status(UserStatus::Online, now_ms)]
            }
            PresenceEvent::SaveCustomStatus(text) => {
                vec![Effect::Write(PresencePatch::custom_status(text))]
            }
            PresenceEvent::Unload | PresenceEvent::SignOut => {
                let mut effects = self.cancel_offline();
                effects.push(self.write_status(UserStatus::Offline, now_ms));
                effects.push(Effect::Teardown);
                self.phase = Phase::Closed;
                effects
            }
        }
    }

    /// The Offline timer armed with `generation` ran out. Stale or cancelled
    /// timers are ignored, so each hide produces at most one Offline write.
    pub fn offline_timer_fired(&mut self, generation: u64, now_ms: i64) -> Vec<Effect> {
        if self.phase != Phase::Active || self.pending_offline != Some(generation) {
            return Vec::new();
        }
        self.pending_offline = None;
        vec![self.write_status(UserStatus::Offline, now_ms)]
    }

    fn cancel_offline(&mut self) -> Vec<Effect> {
        match self.pending_offline.take() {
            Some(_) => vec![Effect::CancelOffline],
            None => Vec::new(),
        }
    }

    fn write_status(&mut self, status: UserStatus, now_ms: i64) -> Effect {
        self.status = Some(status);
        Effect::Write(PresencePatch::status(status, now_ms))
    }
}

/// The single merge-write an event stands for when no live session exists
/// to run it through a machine.
pub fn detached_patch(event: &PresenceEvent, now_ms: i64) -> Option<PresencePatch> {
    match event {
        PresenceEvent::SignedIn(profile) => Some(PresencePatch::sign_in(profile.clone(), now_ms)),
        PresenceEvent::JoinMeeting => Some(PresencePatch::status(UserStatus::InCall, now_ms)),
        PresenceEvent::SetStatus(status) => Some(PresencePatch::status(*status, now_ms)),
        PresenceEvent::Visibility { visible: true } => {
            Some(PresencePatch::status(UserStatus::Online, now_ms))
        }
        PresenceEvent::Unload | PresenceEvent::SignOut => {
            Some(PresencePatch::status(UserStatus::Offline, now_ms))
        }
        PresenceEvent::SaveCustomStatus(text) => Some(PresencePatch::custom_status(text.clone())),
        PresenceEvent::Visibility { visible: false } | PresenceEvent::FocusGained => None,
    }
}
