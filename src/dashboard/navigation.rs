//! Navigation and notification capabilities
//!
//! Information Hiding:
//! - Redirects and user notifications are requested through traits
//! - Console implementations render them on a terminal
//! - Recording implementations let tests assert what was requested

use crate::core::ConversationId;
use crate::utils;
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Overview,
    Conversation(ConversationId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Overview => "/dashboard".to_string(),
            Route::Conversation(id) => format!("/conversation/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.path())
    }
}

pub trait Navigator: Send + Sync {
    fn redirect(&self, route: Route);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints the destination; the terminal has no pages to switch
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn redirect(&self, route: Route) {
        tracing::debug!("[Navigator] Redirect to {}", route);
        utils::print_info(&format!("-> {}", route));
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => utils::print_info(&notification.message),
            NotificationLevel::Success => utils::print_success(&notification.message),
            NotificationLevel::Error => utils::print_error(&notification.message),
        }
    }
}

/// Keeps every redirect in order
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<Route>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn count(&self, route: &Route) -> usize {
        self.routes().iter().filter(|r| *r == route).count()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: Route) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Landing.path(), "/");
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Overview.path(), "/dashboard");
        assert_eq!(Route::Conversation(ConversationId(7)).to_string(), "/conversation/7");
        // Rows in the CLI listing rely on width padding
        assert_eq!(format!("{:<8}|", Route::Login), "/login  |");
    }

    #[test]
    fn test_recording_navigator_counts() {
        let navigator = RecordingNavigator::new();
        let shared = navigator.clone();
        navigator.redirect(Route::Login);
        navigator.redirect(Route::Overview);
        navigator.redirect(Route::Login);

        assert_eq!(shared.count(&Route::Login), 2);
        assert_eq!(shared.last(), Some(Route::Login));
    }

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::error("boom"));
        assert_eq!(
            notifier.last(),
            Some(Notification {
                level: NotificationLevel::Error,
                message: "boom".to_string(),
            })
        );
    }
}
