//! Terminal seams for the session and result printing

use anyhow::Result;
use codemarket_session::{Navigator, Notification, NotificationLevel, Notifier, Route};
use serde::Serialize;
use tracing::debug;

/// Prints session notifications to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("{}", render(&notification));
    }
}

fn render(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
        NotificationLevel::Info => "info",
    };
    format!("[{tag}] {}", notification.message)
}

/// A terminal has no pages; navigation requests are only logged
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggedNavigator;

impl Navigator for LoggedNavigator {
    fn navigate(&self, route: Route) {
        debug!(%route, "Ignoring navigation request");
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
