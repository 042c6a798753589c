//! NotificationCenter: transient banners with independent timers.
//!
//! ```text
//! Visible ──(ttl expiry | close)──▶ Dismissing ──(exit)──▶ Removed
//! ```
//!
//! Each notification owns at most one pending timer: a spawned task that
//! sleeps and then posts `FormEvent::NotificationTimer` back into the
//! session queue. Closing early aborts the expiry timer. A timer event that
//! arrives for a notification in the wrong phase is ignored, so nothing is
//! ever removed twice.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::form::event::FormEvent;

/// Default time a notification stays visible.
pub const DEFAULT_TTL: Duration = Duration::from_millis(5000);

/// Default length of the exit phase.
pub const DEFAULT_EXIT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    Dismissing,
}

/// Which transition a timer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStage {
    /// Visible → Dismissing.
    Expire,
    /// Dismissing → Removed.
    Remove,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Instant,
    pub phase: Phase,
}

/// Returned by `show`; identifies the notification for `close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationHandle {
    pub id: NotificationId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTiming {
    pub ttl: Duration,
    pub exit: Duration,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            exit: DEFAULT_EXIT,
        }
    }
}

pub struct NotificationCenter {
    next_id: u64,
    /// Creation order.
    entries: Vec<Notification>,
    timers: HashMap<NotificationId, AbortHandle>,
    timing: NotificationTiming,
    events: UnboundedSender<FormEvent>,
}

impl NotificationCenter {
    /// Timers post back through `events`. Must be used inside a tokio runtime.
    pub fn new(timing: NotificationTiming, events: UnboundedSender<FormEvent>) -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
            timers: HashMap::new(),
            timing,
            events,
        }
    }

    pub fn timing(&self) -> NotificationTiming {
        self.timing
    }

    /// Display a notification and schedule its expiry.
    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind) -> NotificationHandle {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        let message = message.into();
        info!(%id, ?kind, message = %message, "notification shown");

        self.entries.push(Notification {
            id,
            message,
            kind,
            created_at: Instant::now(),
            phase: Phase::Visible,
        });
        self.schedule(id, TimerStage::Expire, self.timing.ttl);
        NotificationHandle { id }
    }

    /// Manual close. Returns false if the notification is gone or already
    /// leaving.
    pub fn close(&mut self, id: NotificationId) -> bool {
        match self.get(id).map(|n| n.phase) {
            Some(Phase::Visible) => {
                self.cancel_timer(id);
                self.begin_dismiss(id);
                true
            }
            _ => {
                debug!(%id, "close ignored");
                false
            }
        }
    }

    /// Apply a fired timer. Returns false when the timer is stale.
    pub fn on_timer(&mut self, id: NotificationId, stage: TimerStage) -> bool {
        let phase = self.get(id).map(|n| n.phase);
        match (stage, phase) {
            (TimerStage::Expire, Some(Phase::Visible)) => {
                self.timers.remove(&id);
                self.begin_dismiss(id);
                true
            }
            (TimerStage::Remove, Some(Phase::Dismissing)) => {
                self.timers.remove(&id);
                self.entries.retain(|n| n.id != id);
                debug!(%id, "notification removed");
                true
            }
            _ => {
                debug!(%id, ?stage, "stale notification timer");
                false
            }
        }
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    /// Every live notification (visible or leaving), oldest first.
    pub fn all(&self) -> &[Notification] {
        &self.entries
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().filter(|n| n.phase == Phase::Visible)
    }

    pub fn newest_visible(&self) -> Option<NotificationId> {
        self.visible().last().map(|n| n.id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn begin_dismiss(&mut self, id: NotificationId) {
        if let Some(n) = self.entries.iter_mut().find(|n| n.id == id) {
            n.phase = Phase::Dismissing;
        }
        self.schedule(id, TimerStage::Remove, self.timing.exit);
    }

    fn schedule(&mut self, id: NotificationId, stage: TimerStage, delay: Duration) {
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the session ended.
            let _ = events.send(FormEvent::NotificationTimer { id, stage });
        });
        if let Some(previous) = self.timers.insert(id, task.abort_handle()) {
            previous.abort();
        }
    }

    fn cancel_timer(&mut self, id: NotificationId) {
        if let Some(timer) = self.timers.remove(&id) {
            timer.abort();
        }
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        for timer in self.timers.values() {
            timer.abort();
        }
    }
}
