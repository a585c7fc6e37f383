use codemarket_core::User;

/// Client-side view of who is signed in
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub current_user: Option<User>,
    /// True until the startup check has finished
    pub is_loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            current_user: None,
            is_loading: true,
        }
    }
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn state(&self) -> SessionState {
        match (&self.current_user, self.is_loading) {
            (Some(user), _) => SessionState::Authenticated(user.clone()),
            (None, true) => SessionState::Loading,
            (None, false) => SessionState::Anonymous,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Anonymous,
    Authenticated(User),
}
