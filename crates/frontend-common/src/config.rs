//! Frontend configuration

use codemarket_http::client::config::DEFAULT_BASE_URL;
use web_sys::window;

/// Path of the API under the serving origin
pub const API_PREFIX: &str = "/api/v1";

/// How long a toast stays on screen, in milliseconds
pub const TOAST_TIMEOUT_MS: u32 = 4_000;

/// Most toasts shown at once; older ones are dropped first
pub const MAX_TOASTS: usize = 5;

/// API base URL for the page the app is served from
///
/// Falls back to the local development backend when no window origin is
/// available.
pub fn api_base_url() -> String {
    window()
        .and_then(|window| window.location().origin().ok())
        .filter(|origin| !origin.is_empty() && origin != "null")
        .map(|origin| format!("{origin}{API_PREFIX}"))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}
