//! Seams through which the session reaches the user interface
//!
//! The controller never renders anything itself. It emits [`Notification`]s
//! and asks for [`Route`] changes; a front end supplies a [`Notifier`] and a
//! [`Navigator`] that turn those into toasts and page transitions. Closures
//! implement both traits, so a Yew `Callback` or a test recorder can be
//! plugged in directly.

use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// A user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
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

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Destinations the session may send the user to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

pub trait Navigator {
    fn navigate(&self, route: Route);
}

impl<F: Fn(Notification)> Notifier for F {
    fn notify(&self, notification: Notification) {
        self(notification)
    }
}

impl<F: Fn(Route)> Navigator for F {
    fn navigate(&self, route: Route) {
        self(route)
    }
}

/// Writes notifications to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => warn!(message = %notification.message, "Notification"),
            _ => info!(message = %notification.message, "Notification"),
        }
    }
}

/// Records navigation requests in the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        info!(%route, "Navigation requested");
    }
}
