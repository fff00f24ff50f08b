//! Change-notification registration
//!
//! Every cursor the provider returns is registered against its
//! originating URI so that writers elsewhere in the application can
//! signal "this result may be stale". Only registration lives here;
//! notification delivery is wired up by the embedding application.

use std::collections::HashMap;
use std::sync::Mutex;

/// Registration side of change notifications.
pub trait ChangeNotifier: Send + Sync {
    /// Register a returned cursor against its originating URI.
    fn register(&self, uri: &str);
}

/// In-process notifier keeping per-URI registration counts.
#[derive(Debug, Default)]
pub struct NotificationHub {
    registrations: Mutex<HashMap<String, usize>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many cursors have been registered against `uri`.
    pub fn registration_count(&self, uri: &str) -> usize {
        self.registrations
            .lock()
            .unwrap()
            .get(uri)
            .copied()
            .unwrap_or(0)
    }

    /// Signal that data behind `uri` changed.
    pub fn notify_change(&self, uri: &str) {
        let count = self.registration_count(uri);
        log::debug!("change on {uri}: {count} registered cursor(s)");
    }
}

impl ChangeNotifier for NotificationHub {
    fn register(&self, uri: &str) {
        *self
            .registrations
            .lock()
            .unwrap()
            .entry(uri.to_string())
            .or_insert(0) += 1;
    }
}
