//! Authentication guard for protected routes

use super::use_auth;
use crate::components::Spinner;
use crate::navigation::AppRoute;
use yew::prelude::*;
use yew_router::prelude::Redirect;

#[derive(Properties, PartialEq)]
pub struct RequireAuthProps {
    pub children: Children,
}

/// Shows children to signed-in users and sends everyone else to the login page
#[function_component(RequireAuth)]
pub fn require_auth(props: &RequireAuthProps) -> Html {
    let auth = use_auth();

    if auth.state.is_loading && !auth.state.is_authenticated() {
        return html! { <Spinner text={"Checking authentication..."} /> };
    }

    if auth.state.is_authenticated() {
        return html! { <>{ props.children.clone() }</> };
    }

    html! { <Redirect<AppRoute> to={AppRoute::Login} /> }
}
