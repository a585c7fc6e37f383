//! Global authentication context and provider

use crate::config::api_base_url;
use crate::navigation::RouterNavigator;
use crate::notifications::{ToastContext, ToastNotifier, ToastState, Toasts};
use crate::storage::BrowserStorage;
use codemarket_core::User;
use codemarket_http::{MarketClient, TokenStore};
use codemarket_session::{AuthSession, LogNavigator, Navigator, Session};
use std::rc::Rc;
use std::sync::Arc;
use tracing::error;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::use_navigator;

/// Session controller plus the session it last reported
///
/// Components call operations on `session`; `state` is what they render.
#[derive(Clone)]
pub struct AuthContext {
    pub session: AuthSession,
    pub state: Session,
}

impl PartialEq for AuthContext {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

/// Auth provider props
#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    pub children: Children,
    /// API base URL; defaults to `/api/v1` on the serving origin
    #[prop_or_default]
    pub base_url: Option<AttrValue>,
}

fn build_session(
    base_url: String,
    toasts: ToastNotifier,
    navigator: Rc<dyn Navigator>,
) -> Option<AuthSession> {
    let tokens = TokenStore::new(Arc::new(BrowserStorage));
    match MarketClient::new(base_url, tokens) {
        Ok(client) => Some(AuthSession::new(client, Rc::new(toasts), navigator)),
        Err(err) => {
            error!(error = %err, "Failed to configure API client");
            None
        }
    }
}

/// Auth provider component
///
/// Must sit inside a router for session navigation to reach the page;
/// outside one, navigation requests are only logged.
#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    let toasts = use_reducer(ToastState::default);
    let state = use_state(Session::default);
    let router = use_navigator();

    let session = {
        let dispatcher = toasts.dispatcher();
        let base_url = props
            .base_url
            .as_ref()
            .map(|url| url.to_string())
            .unwrap_or_else(api_base_url);
        use_memo((), move |_| {
            let navigator: Rc<dyn Navigator> = match router {
                Some(router) => Rc::new(RouterNavigator::new(router)),
                None => Rc::new(LogNavigator),
            };
            build_session(base_url, ToastNotifier::new(dispatcher), navigator)
        })
    };

    // Follow session changes and run the startup check once
    {
        let session = session.clone();
        let setter = state.setter();
        use_effect_with((), move |_| {
            let subscription = (*session).as_ref().map(|session| {
                let id = session.subscribe(move |current| setter.set(current.clone()));
                let startup = session.clone();
                spawn_local(async move { startup.initialize().await });
                (session.clone(), id)
            });
            move || {
                if let Some((session, id)) = subscription {
                    session.unsubscribe(id);
                }
            }
        });
    }

    let Some(session) = (*session).clone() else {
        return html! {
            <div class="p-6 text-red-600">{"The marketplace API is not configured."}</div>
        };
    };

    let context = AuthContext {
        session,
        state: (*state).clone(),
    };

    html! {
        <ContextProvider<ToastContext> context={toasts}>
            <ContextProvider<AuthContext> context={context}>
                <Toasts />
                {props.children.clone()}
            </ContextProvider<AuthContext>>
        </ContextProvider<ToastContext>>
    }
}

/// Hook to use auth context
#[hook]
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
        .expect("AuthContext not found. Make sure to wrap your component with AuthProvider")
}

/// Hook to get the signed-in user
#[hook]
pub fn use_current_user() -> Option<User> {
    let auth = use_auth();
    auth.state.current_user.clone()
}

/// Hook to check if authenticated
#[hook]
pub fn use_is_authenticated() -> bool {
    let auth = use_auth();
    auth.state.is_authenticated()
}
