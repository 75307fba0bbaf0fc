//! Page notices: transient alerts with auto-dismiss.
//!
//! Notices surface operation failures and confirmations. Each one closes
//! manually or expires five seconds after creation; expiry is driven by the
//! caller handing in the current instant, so the lifecycle is testable
//! without timers.

use std::time::{Duration, Instant};

/// How long a notice stays up before auto-dismissal.
pub const AUTO_DISMISS: Duration = Duration::from_secs(5);

/// Delay before revealing the card at `index` in a staggered list.
pub fn reveal_delay(index: usize) -> Duration {
    Duration::from_millis(100) * index as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    /// FontAwesome icon name rendered next to the message.
    pub fn icon(&self) -> &'static str {
        match self {
            NoticeKind::Success => "check-circle",
            NoticeKind::Info => "info-circle",
            NoticeKind::Warning => "exclamation-triangle",
            NoticeKind::Error => "exclamation-circle",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
    pub created_at: Instant,
}

impl Notice {
    pub fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= AUTO_DISMISS
    }
}

/// Holds the notices currently on screen.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a notice and returns its id (used for manual dismissal).
    pub fn push(&mut self, kind: NoticeKind, text: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            kind,
            text: text.into(),
            created_at: now,
        });
        id
    }

    /// Manual close. Returns false when the notice already went away.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    /// Drops expired notices, returning the ids that were removed.
    pub fn sweep(&mut self, now: Instant) -> Vec<u64> {
        let expired: Vec<u64> = self
            .notices
            .iter()
            .filter(|n| n.expired(now))
            .map(|n| n.id)
            .collect();
        self.notices.retain(|n| !n.expired(now));
        expired
    }

    pub fn active(&self) -> &[Notice] {
        &self.notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expires_after_five_seconds() {
        let start = Instant::now();
        let mut board = NoticeBoard::new();
        let id = board.push(NoticeKind::Error, "fallo", start);

        assert!(board.sweep(start + Duration::from_secs(4)).is_empty());
        assert_eq!(board.sweep(start + Duration::from_secs(5)), vec![id]);
        assert!(board.active().is_empty());
    }

    #[test]
    fn test_manual_dismiss() {
        let start = Instant::now();
        let mut board = NoticeBoard::new();
        let id = board.push(NoticeKind::Info, "hola", start);
        assert!(board.dismiss(id));
        assert!(!board.dismiss(id));
    }

    #[test]
    fn test_icons_per_kind() {
        assert_eq!(NoticeKind::Success.icon(), "check-circle");
        assert_eq!(NoticeKind::Error.icon(), "exclamation-circle");
    }

    #[test]
    fn test_reveal_delay_staggers_by_100ms() {
        assert_eq!(reveal_delay(0), Duration::ZERO);
        assert_eq!(reveal_delay(3), Duration::from_millis(300));
    }
}
