//! Notification emission boundary.
//!
//! Delivery (push, mail, in-app storage) lives outside the core. The engine
//! only hands a tuple to a sink after the financial mutation has committed;
//! the sink must never be able to roll it back, so the call is synchronous,
//! infallible and made outside any database transaction.

use std::fmt::Debug;

/// Fire-and-forget consumer of user-facing events.
pub trait NotificationSink: Send + Sync + Debug {
    fn notify(&self, user_id: &str, category: &str, title: &str, message: &str);
}

/// Default sink: emits a tracing event and drops the notification.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, user_id: &str, category: &str, title: &str, message: &str) {
        tracing::info!(user_id, category, title, message, "notification emitted");
    }
}
