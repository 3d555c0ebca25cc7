//! Transient toast notifications
//!
//! Non-blocking, dismissible messages. Request failures and lifecycle hints
//! end up here instead of interrupting the board.

use std::time::Duration;
use uuid::Uuid;
use web_time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
    pub timeout: Duration,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.timeout
    }
}

/// Active notifications, oldest first
#[derive(Debug, Clone)]
pub struct Notifier {
    default_timeout: Duration,
    active: Vec<Notification>,
}

impl Notifier {
    pub fn new(default_timeout: Duration) -> Self {
        Self {
            default_timeout,
            active: Vec::new(),
        }
    }

    /// Show an info message and return its id.
    ///
    /// Reusing an id replaces the notification that carries it, so repeated
    /// events (e.g. "starting new game") never stack.
    pub fn notify(
        &mut self,
        message: impl Into<String>,
        id: Option<&str>,
        timeout: Option<Duration>,
    ) -> String {
        self.push(NotificationLevel::Info, message.into(), id, timeout)
    }

    pub fn warn(&mut self, message: impl Into<String>, id: Option<&str>) -> String {
        self.push(NotificationLevel::Warning, message.into(), id, None)
    }

    pub fn error(&mut self, message: impl Into<String>, id: Option<&str>) -> String {
        self.push(NotificationLevel::Error, message.into(), id, None)
    }

    fn push(
        &mut self,
        level: NotificationLevel,
        message: String,
        id: Option<&str>,
        timeout: Option<Duration>,
    ) -> String {
        let id = id
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        self.active.retain(|n| n.id != id);
        self.active.push(Notification {
            id: id.clone(),
            message,
            level,
            created_at: Instant::now(),
            timeout: timeout.unwrap_or(self.default_timeout),
        });
        id
    }

    /// Returns `true` if a notification was removed
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.id != id);
        self.active.len() != before
    }

    /// Drop every notification whose timeout has elapsed at `now`.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.active.len();
        self.active.retain(|n| !n.is_expired(now));
        before - self.active.len()
    }

    pub fn active(&self) -> &[Notification] {
        &self.active
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::from_millis(
            crate::core::resources::DEFAULT_NOTIFICATION_TIMEOUT_MS,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let mut notifier = Notifier::default();
        let a = notifier.notify("first", None, None);
        let b = notifier.notify("second", None, None);
        assert_ne!(a, b);
        assert_eq!(notifier.active().len(), 2);
    }

    #[test]
    fn test_same_id_replaces() {
        let mut notifier = Notifier::default();
        notifier.notify("starting new game", Some("new_game"), None);
        let id = notifier.notify("starting new game", Some("new_game"), None);
        assert_eq!(id, "new_game");
        assert_eq!(notifier.active().len(), 1);
    }

    #[test]
    fn test_dismiss() {
        let mut notifier = Notifier::default();
        let id = notifier.error("engine unreachable", None);
        assert!(notifier.dismiss(&id));
        assert!(!notifier.dismiss(&id));
        assert!(notifier.active().is_empty());
    }

    #[test]
    fn test_expire_respects_timeout() {
        let mut notifier = Notifier::new(Duration::from_millis(3000));
        notifier.notify("short", None, Some(Duration::ZERO));
        notifier.notify("long", None, None);
        assert_eq!(notifier.expire(Instant::now()), 1);
        assert_eq!(notifier.active()[0].message, "long");
        assert_eq!(notifier.active()[0].level, NotificationLevel::Info);
    }
}
