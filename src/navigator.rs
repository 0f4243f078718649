//! User-facing side effects of the session policy.
//!
//! The client never talks to a UI directly. Expiry notices and route
//! changes go through a [`Navigator`], so a browser shell, a terminal, and
//! a test can each decide what "alert" and "redirect" mean.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

/// Sink for notices and route changes.
pub trait Navigator: Send + Sync + std::fmt::Debug {
    /// Show a blocking notice to the user.
    fn notify(&self, message: &str);

    /// Move to another route.
    fn redirect(&self, route: &str);
}

/// One recorded navigator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorEvent {
    Notice(String),
    Redirect(String),
}

/// Navigator that records every call in order.
///
/// Cloning shares the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    events: Arc<Mutex<Vec<NavigatorEvent>>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<NavigatorEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Recorded notices only.
    #[must_use]
    pub fn notices(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                NavigatorEvent::Notice(m) => Some(m),
                NavigatorEvent::Redirect(_) => None,
            })
            .collect()
    }

    /// Recorded redirects only.
    #[must_use]
    pub fn redirects(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                NavigatorEvent::Redirect(r) => Some(r),
                NavigatorEvent::Notice(_) => None,
            })
            .collect()
    }

    fn push(&self, event: NavigatorEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Navigator for RecordingNavigator {
    fn notify(&self, message: &str) {
        self.push(NavigatorEvent::Notice(message.to_string()));
    }

    fn redirect(&self, route: &str) {
        self.push(NavigatorEvent::Redirect(route.to_string()));
    }
}

/// Navigator that turns notices and redirects into `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn notify(&self, message: &str) {
        warn!(name: "navigator.notice", notice = %message, "Notice shown to user");
    }

    fn redirect(&self, route: &str) {
        info!(name: "navigator.redirect", route = %route, "Redirecting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_navigator_keeps_order() {
        let nav = RecordingNavigator::new();
        let handle = nav.clone();

        nav.notify("expired");
        nav.redirect("/login");

        assert_eq!(
            handle.events(),
            vec![
                NavigatorEvent::Notice("expired".into()),
                NavigatorEvent::Redirect("/login".into()),
            ]
        );
        assert_eq!(handle.notices(), vec!["expired".to_string()]);
        assert_eq!(handle.redirects(), vec!["/login".to_string()]);
    }
}
