use std::time::{Duration, Instant};

/// How long a notification stays visible
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Single-slot notification with an expiry deadline.
///
/// Showing a new notification replaces the current one and restarts the
/// window, so at most one is ever visible.
#[derive(Debug, Default)]
pub struct Toast {
    slot: Option<(Notification, Instant)>,
}

impl Toast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.show_at(message, kind, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) {
        let notification = Notification {
            message: message.into(),
            kind,
        };
        self.slot = Some((notification, now + NOTIFICATION_TTL));
    }

    pub fn current(&self) -> Option<&Notification> {
        self.visible_at(Instant::now())
    }

    pub fn visible_at(&self, now: Instant) -> Option<&Notification> {
        match &self.slot {
            Some((notification, deadline)) if now < *deadline => Some(notification),
            _ => None,
        }
    }

    /// Drop the notification once its deadline has passed. Returns true if one was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = matches!(&self.slot, Some((_, deadline)) if now >= *deadline);
        if expired {
            self.slot = None;
        }
        expired
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
