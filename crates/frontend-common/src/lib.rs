//! Yew bindings for the Codemarket session
//!
//! Wrap the app in a router and an [`AuthProvider`]; pages then read the
//! session through [`use_auth`] and friends, and every notification the
//! session emits shows up as a toast.

pub mod auth;
pub mod components;
pub mod config;
pub mod navigation;
pub mod notifications;
pub mod storage;

pub use auth::{
    AuthContext, AuthProvider, RequireAuth, use_auth, use_current_user, use_is_authenticated,
};
pub use components::Spinner;
pub use config::api_base_url;
pub use navigation::{AppRoute, RouterNavigator};
pub use notifications::{Toast, ToastAction, ToastContext, ToastNotifier, ToastState, Toasts};
pub use storage::BrowserStorage;

/// Route `tracing` events to the browser console
///
/// `log` records from dependencies are bridged into the same output by the
/// `LogTracer` that `try_init` installs with tracing-subscriber's default
/// `tracing-log` feature. Safe to call more than once; only the first call
/// installs anything.
pub fn init_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_web::MakeWebConsoleWriter;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
