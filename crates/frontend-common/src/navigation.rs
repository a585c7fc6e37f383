//! Application routes and the router-backed navigator

use codemarket_session::{Navigator, Route};
use tracing::debug;
use yew_router::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, Routable)]
pub enum AppRoute {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/dashboard")]
    Dashboard,
    #[at("/profile")]
    Profile,
    #[at("/products")]
    Products,
    #[at("/products/:id")]
    ProductDetail { id: i64 },
    #[at("/upload")]
    Upload,
    #[at("/contact")]
    Contact,
    #[at("/admin")]
    Admin,
    #[at("/reset-password")]
    ResetPassword,
    #[at("/verify-email")]
    VerifyEmail,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl AppRoute {
    /// Pages that need a signed-in user
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Profile | Self::Upload | Self::Admin
        )
    }
}

impl From<Route> for AppRoute {
    fn from(route: Route) -> Self {
        match route {
            Route::Home => Self::Home,
            Route::Login => Self::Login,
            Route::Dashboard => Self::Dashboard,
        }
    }
}

/// Sends session navigation requests through `yew_router`
pub struct RouterNavigator {
    navigator: yew_router::navigator::Navigator,
}

impl RouterNavigator {
    pub fn new(navigator: yew_router::navigator::Navigator) -> Self {
        Self { navigator }
    }
}

impl Navigator for RouterNavigator {
    fn navigate(&self, route: Route) {
        debug!(%route, "Navigating");
        self.navigator.push(&AppRoute::from(route));
    }
}
