//! Decode diagnostics.
//!
//! Non-fatal issues met while decoding a drawing (unknown entity kinds,
//! skipped sections, dangling block references, truncated block cycles) are
//! collected on [`DrawingDocument::notifications`](crate::DrawingDocument)
//! instead of aborting the decode. Each notification is also emitted as a
//! `tracing` event so hosts with a subscriber see them live.

use std::fmt;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// The payload holds something this decoder skips on purpose.
    NotImplemented,
    /// A recoverable oddity (missing block, unknown layer flag).
    Warning,
    /// A malformed construct that was recovered from (failsafe mode).
    Error,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented => write!(f, "NotImplemented"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A single diagnostic produced during decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub notification_type: NotificationType,
    pub message: String,
}

impl Notification {
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)
    }
}

/// Ordered collection of decode diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification and forward it to `tracing`.
    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        let message = message.into();
        match notification_type {
            NotificationType::NotImplemented => tracing::debug!(%message, "skipped during decode"),
            NotificationType::Warning => tracing::warn!(%message, "decode warning"),
            NotificationType::Error => tracing::error!(%message, "recovered decode error"),
        }
        self.items.push(Notification::new(notification_type, message));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Get all notifications of a specific type.
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.notification_type == nt).collect()
    }

    /// Check whether any notification of the given type exists.
    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
