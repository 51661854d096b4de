//! Notification center
//!
//! Header notification list with read/unread tracking.

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};

/// Severity of a notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
    Error,
}

impl NotificationKind {
    pub fn glyph(&self) -> &'static str {
        match self {
            NotificationKind::Warning => "⚠️",
            NotificationKind::Success => "✅",
            NotificationKind::Error => "❌",
            NotificationKind::Info => "ℹ️",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    /// Relative time label ("5 min ago")
    pub time: String,
    pub kind: NotificationKind,
    pub read: bool,
}

/// Counts published whenever the list changes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationSummary {
    pub total: usize,
    pub unread: usize,
}

/// Badge text for an unread count; capped at "9+"
pub fn badge_label(unread: usize) -> Option<String> {
    match unread {
        0 => None,
        1..=9 => Some(unread.to_string()),
        _ => Some("9+".to_string()),
    }
}

/// Notifications shown in the header on first load
pub fn default_notifications() -> Vec<Notification> {
    vec![
        notification(
            "1",
            "Campaign Performance Alert",
            "Your \"Summer Sale\" campaign has exceeded budget by 15%",
            "5 min ago",
            NotificationKind::Warning,
            false,
        ),
        notification(
            "2",
            "Monthly Report Ready",
            "July analytics report is ready for download",
            "1 hour ago",
            NotificationKind::Success,
            false,
        ),
        notification(
            "3",
            "Low Conversion Rate",
            "Facebook Ads campaign showing 2.1% conversion rate",
            "3 hours ago",
            NotificationKind::Info,
            true,
        ),
        notification(
            "4",
            "System Maintenance",
            "Scheduled maintenance tomorrow 2-4 AM EST",
            "1 day ago",
            NotificationKind::Info,
            true,
        ),
    ]
}

fn notification(
    id: &str,
    title: &str,
    message: &str,
    time: &str,
    kind: NotificationKind,
    read: bool,
) -> Notification {
    Notification {
        id: id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        time: time.to_string(),
        kind,
        read,
    }
}

/// Notification list plus change notifications
pub struct NotificationCenter {
    items: RwLock<Vec<Notification>>,
    sender: broadcast::Sender<NotificationSummary>,
}

impl NotificationCenter {
    pub fn new(items: Vec<Notification>) -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            items: RwLock::new(items),
            sender,
        }
    }

    pub async fn list(&self) -> Vec<Notification> {
        self.items.read().await.clone()
    }

    pub async fn summary(&self) -> NotificationSummary {
        summarize(&self.items.read().await)
    }

    pub async fn unread_count(&self) -> usize {
        self.summary().await.unread
    }

    pub async fn badge(&self) -> Option<String> {
        badge_label(self.unread_count().await)
    }

    /// Mark one notification read
    ///
    /// Returns false if no notification has that id.
    pub async fn mark_read(&self, id: &str) -> bool {
        let mut items = self.items.write().await;
        let Some(item) = items.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        let changed = !item.read;
        item.read = true;

        if changed {
            self.publish(&items);
        }
        true
    }

    /// Mark everything read; returns how many changed
    pub async fn mark_all_read(&self) -> usize {
        let mut items = self.items.write().await;
        let mut changed = 0;
        for item in items.iter_mut().filter(|n| !n.read) {
            item.read = true;
            changed += 1;
        }

        if changed > 0 {
            self.publish(&items);
        }
        changed
    }

    /// Remove everything; returns how many were removed
    pub async fn clear(&self) -> usize {
        let mut items = self.items.write().await;
        let removed = items.len();
        items.clear();

        if removed > 0 {
            self.publish(&items);
        }
        removed
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationSummary> {
        self.sender.subscribe()
    }

    fn publish(&self, items: &[Notification]) {
        let summary = summarize(items);
        tracing::debug!(total = summary.total, unread = summary.unread, "Notifications changed");
        let _ = self.sender.send(summary);
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(default_notifications())
    }
}

fn summarize(items: &[Notification]) -> NotificationSummary {
    NotificationSummary {
        total: items.len(),
        unread: items.iter().filter(|n| !n.read).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_label() {
        assert_eq!(badge_label(0), None);
        assert_eq!(badge_label(3), Some("3".to_string()));
        assert_eq!(badge_label(9), Some("9".to_string()));
        assert_eq!(badge_label(10), Some("9+".to_string()));
    }

    #[tokio::test]
    async fn test_defaults() {
        let center = NotificationCenter::default();
        assert_eq!(center.list().await.len(), 4);
        assert_eq!(center.unread_count().await, 2);
        assert_eq!(center.badge().await, Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_mark_read() {
        let center = NotificationCenter::default();
        let mut rx = center.subscribe();

        assert!(center.mark_read("1").await);
        assert_eq!(rx.recv().await.unwrap(), NotificationSummary { total: 4, unread: 1 });

        // Already read: found, but nothing published
        assert!(center.mark_read("1").await);
        assert!(rx.try_recv().is_err());

        assert!(!center.mark_read("missing").await);
    }

    #[tokio::test]
    async fn test_mark_all_and_clear() {
        let center = NotificationCenter::default();
        assert_eq!(center.mark_all_read().await, 2);
        assert_eq!(center.mark_all_read().await, 0);
        assert_eq!(center.badge().await, None);

        assert_eq!(center.clear().await, 4);
        assert!(center.list().await.is_empty());
        assert_eq!(center.clear().await, 0);
    }
}
