//! Shared fixtures for session tests

#![allow(dead_code)]

use codemarket_http::{MarketClient, TokenStore};
use codemarket_session::{AuthSession, Navigator, Notification, Notifier, Route};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;
use wiremock::MockServer;

/// Records everything the controller asks the UI to do
#[derive(Default)]
pub struct Recorder {
    pub notifications: RefCell<Vec<Notification>>,
    pub routes: RefCell<Vec<Route>>,
}

impl Recorder {
    pub fn errors(&self) -> Vec<String> {
        self.notifications
            .borrow()
            .iter()
            .filter(|n| n.is_error())
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .borrow()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.borrow().clone()
    }
}

impl Notifier for Recorder {
    fn notify(&self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }
}

impl Navigator for Recorder {
    fn navigate(&self, route: Route) {
        self.routes.borrow_mut().push(route);
    }
}

pub struct Harness {
    pub session: AuthSession,
    pub tokens: TokenStore,
    pub recorder: Rc<Recorder>,
}

pub fn harness(server: &MockServer) -> Harness {
    harness_with_tokens(server, TokenStore::in_memory())
}

pub fn harness_with_tokens(server: &MockServer, tokens: TokenStore) -> Harness {
    let client = MarketClient::new(server.uri(), tokens.clone()).unwrap();
    let recorder = Rc::new(Recorder::default());
    let session = AuthSession::new(client, recorder.clone(), recorder.clone());
    Harness {
        session,
        tokens,
        recorder,
    }
}

pub fn user_json(id: i64, username: &str, role: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "role": role,
        "is_verified": true
    })
}

pub fn token_json(access: &str, refresh: &str) -> Value {
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "bearer"
    })
}
