//! Codemarket session layer
//!
//! Ties the HTTP client to a front end: [`AuthSession`] tracks who is signed
//! in, keeps stored tokens consistent with that, and reports outcomes through
//! the [`Notifier`] and [`Navigator`] seams.

pub mod controller;
pub mod error;
pub mod notify;
pub mod session;
mod support;
mod upload;

pub use controller::{AuthSession, ListenerId};
pub use error::SessionError;
pub use notify::{
    LogNavigator, LogNotifier, Navigator, Notification, NotificationLevel, Notifier, Route,
};
pub use session::{Session, SessionState};
