//! Transient notifications

use std::time::Duration;

/// How long a toast stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Most toasts shown at once; older ones are dropped first
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Danger,
}

impl ToastLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Info => "ℹ",
            ToastLevel::Success => "✓",
            ToastLevel::Warning => "⚠",
            ToastLevel::Danger => "✗",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ToastQueue {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast and return its id for later dismissal
    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            level,
            message: message.into(),
        });
        if self.toasts.len() > MAX_TOASTS {
            self.toasts.remove(0);
        }
        id
    }

    /// Remove a toast. Dismissing one that is already gone is a no-op.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Remove the newest toast, as the close key does
    pub fn dismiss_latest(&mut self) -> Option<u64> {
        self.toasts.pop().map(|t| t.id)
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let mut queue = ToastQueue::new();
        let first = queue.push(ToastLevel::Info, "one");
        let second = queue.push(ToastLevel::Success, "two");
        assert_ne!(first, second);

        assert!(queue.dismiss(first));
        assert_eq!(queue.toasts().len(), 1);
        assert_eq!(queue.toasts()[0].message, "two");
    }

    #[test]
    fn test_stale_dismiss_is_noop() {
        let mut queue = ToastQueue::new();
        let id = queue.push(ToastLevel::Warning, "gone");
        assert_eq!(queue.dismiss_latest(), Some(id));

        // The timer for the closed toast fires later
        assert!(!queue.dismiss(id));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_oldest_dropped_when_full() {
        let mut queue = ToastQueue::new();
        for i in 0..6 {
            queue.push(ToastLevel::Info, format!("toast {}", i));
        }
        assert_eq!(queue.toasts().len(), MAX_TOASTS);
        assert_eq!(queue.toasts()[0].message, "toast 2");
    }
}
