//! Authentication session controller
//!
//! [`AuthSession`] owns the current [`Session`] and is the only thing that
//! changes it. Every operation talks to the backend through the shared
//! [`MarketClient`], keeps the token store in step with the session, and
//! reports the outcome to the user through the [`Notifier`].
//!
//! The controller is single-threaded (`Rc`/`RefCell`) so that browser
//! callbacks can serve as notifiers and listeners. State borrows are never
//! held across an `.await`.

use crate::error::SessionError;
use crate::notify::{Navigator, Notification, Notifier, Route};
use crate::session::{Session, SessionState};
use codemarket_core::{
    LoginForm, MessageResponse, NewPasswordForm, PasswordResetForm, RegisterForm, TokenPair, User,
    Validate,
};
use codemarket_http::{MarketClient, TokenStore};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};

pub(crate) const LOGIN_SUCCESS: &str = "Login successful!";
pub(crate) const LOGIN_FAILED: &str = "Login failed";
pub(crate) const REGISTER_SUCCESS: &str =
    "Registration successful! Please check your email to verify your account.";
pub(crate) const REGISTER_FAILED: &str = "Registration failed";
pub(crate) const LOGOUT_SUCCESS: &str = "Logged out successfully";
const RESET_REQUESTED: &str = "If the email exists, a reset link has been sent";
const RESET_REQUEST_FAILED: &str = "Failed to send reset email";
const RESET_CONFIRMED: &str = "Password successfully reset";
const RESET_CONFIRM_FAILED: &str = "Failed to reset password";
const EMAIL_VERIFIED: &str = "Email successfully verified";
const EMAIL_VERIFY_FAILED: &str = "Email verification failed";

type Listener = Rc<dyn Fn(&Session)>;

/// Handle returned by [`AuthSession::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Controller for the signed-in identity
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct AuthSession {
    inner: Rc<Inner>,
}

struct Inner {
    client: MarketClient,
    session: RefCell<Session>,
    notifier: Rc<dyn Notifier>,
    navigator: Rc<dyn Navigator>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_listener: Cell<u64>,
}

impl AuthSession {
    pub fn new(
        client: MarketClient,
        notifier: Rc<dyn Notifier>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                client,
                session: RefCell::new(Session::default()),
                notifier,
                navigator,
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    pub fn client(&self) -> &MarketClient {
        &self.inner.client
    }

    pub fn tokens(&self) -> &TokenStore {
        self.inner.client.tokens()
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.inner.session.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.inner.session.borrow().state()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.session.borrow().current_user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.session.borrow().is_loading
    }

    /// Register a callback run with the new session after every change
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }

    /// Startup check: resolve stored tokens into a user
    ///
    /// Never fails. A rejected or unusable token is cleared so the next
    /// call takes the no-token path without touching the network.
    pub async fn initialize(&self) {
        let user = if self.tokens().access_token().is_some() {
            match self.inner.client.auth().me().await {
                Ok(user) => {
                    info!(user_id = user.id, username = %user.username, "Restored session");
                    Some(user)
                }
                Err(err) => {
                    warn!(error = %err, "Stored token rejected, starting anonymous");
                    self.discard_tokens();
                    None
                }
            }
        } else {
            debug!("No stored token, starting anonymous");
            None
        };

        self.update(|session| {
            session.current_user = user;
            session.is_loading = false;
        });
    }

    /// Sign in with email and password
    ///
    /// On success the tokens are stored, the user is set and the dashboard
    /// requested. Backend failures are notified and returned; invalid input
    /// is returned without a request.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        let form = LoginForm::new(email.trim(), password);
        form.validate()?;

        match self.sign_in(&form).await {
            Ok(user) => {
                self.notify(Notification::success(LOGIN_SUCCESS));
                self.navigate(Route::Dashboard);
                Ok(user)
            }
            Err(err) => {
                warn!(error = %err, "Login failed");
                self.notify(Notification::error(err.user_message(LOGIN_FAILED)));
                Err(err)
            }
        }
    }

    async fn sign_in(&self, form: &LoginForm) -> Result<User, SessionError> {
        let auth = self.inner.client.auth();
        let tokens: TokenPair = auth.login(&form.email, &form.password).await?.into();
        self.tokens().save(&tokens)?;

        let user = match auth.me().await {
            Ok(user) => user,
            Err(err) => {
                // Tokens without a profile would leave a half signed-in state
                self.discard_tokens();
                return Err(err.into());
            }
        };

        // Cached reads may belong to the previous identity
        self.inner.client.clear_cache();
        info!(user_id = user.id, username = %user.username, "Signed in");
        self.update(|session| session.current_user = Some(user.clone()));
        Ok(user)
    }

    /// Create an account
    ///
    /// The new user must verify their email before signing in, so the
    /// session is left untouched and the login page requested.
    pub async fn register(&self, form: &RegisterForm) -> Result<User, SessionError> {
        form.validate()?;

        match self.inner.client.auth().register(&form.to_request()).await {
            Ok(user) => {
                info!(user_id = user.id, username = %user.username, "Registered");
                self.notify(Notification::success(REGISTER_SUCCESS));
                self.navigate(Route::Login);
                Ok(user)
            }
            Err(err) => {
                let err = SessionError::from(err);
                warn!(error = %err, "Registration failed");
                self.notify(Notification::error(err.user_message(REGISTER_FAILED)));
                Err(err)
            }
        }
    }

    /// Sign out locally
    pub fn logout(&self) {
        self.discard_tokens();
        self.inner.client.clear_cache();
        self.update(|session| session.current_user = None);
        info!("Signed out");
        self.notify(Notification::success(LOGOUT_SUCCESS));
        self.navigate(Route::Home);
    }

    /// Replace the in-memory user, e.g. after a profile edit
    pub fn update_user(&self, user: User) {
        self.update(|session| session.current_user = Some(user));
    }

    /// Exchange the stored refresh token for a new token pair
    pub async fn refresh(&self) -> Result<TokenPair, SessionError> {
        let refresh_token = self
            .tokens()
            .refresh_token()
            .ok_or(SessionError::NotAuthenticated)?;

        let tokens: TokenPair = self
            .inner
            .client
            .auth()
            .refresh(&refresh_token)
            .await
            .inspect_err(|err| warn!(error = %err, "Token refresh rejected"))?
            .into();
        self.tokens().save(&tokens)?;
        debug!("Tokens refreshed");
        Ok(tokens)
    }

    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<MessageResponse, SessionError> {
        let form = PasswordResetForm {
            email: email.trim().to_string(),
        };
        form.validate()?;

        let result = self
            .inner
            .client
            .auth()
            .request_password_reset(&form.email)
            .await;
        self.report(result, RESET_REQUESTED, RESET_REQUEST_FAILED)
    }

    pub async fn confirm_password_reset(
        &self,
        form: &NewPasswordForm,
    ) -> Result<MessageResponse, SessionError> {
        form.validate()?;

        let result = self
            .inner
            .client
            .auth()
            .confirm_password_reset(&form.token, &form.new_password)
            .await;
        let response = self.report(result, RESET_CONFIRMED, RESET_CONFIRM_FAILED)?;
        self.navigate(Route::Login);
        Ok(response)
    }

    pub async fn verify_email(&self, token: &str) -> Result<MessageResponse, SessionError> {
        let token = token.trim();
        if token.is_empty() {
            let mut errors = codemarket_core::ValidationErrors::default();
            errors.push("token", codemarket_core::FieldErrorKind::Required);
            return Err(errors.into());
        }

        let result = self.inner.client.auth().verify_email(token).await;
        self.report(result, EMAIL_VERIFIED, EMAIL_VERIFY_FAILED)
    }

    /// Notify the outcome of an acknowledgement-style call
    fn report(
        &self,
        result: Result<MessageResponse, codemarket_http::ClientError>,
        success: &str,
        failure: &str,
    ) -> Result<MessageResponse, SessionError> {
        match result {
            Ok(response) => {
                let message = if response.message.is_empty() {
                    success.to_string()
                } else {
                    response.message.clone()
                };
                self.notify(Notification::success(message));
                Ok(response)
            }
            Err(err) => {
                let err = SessionError::from(err);
                warn!(error = %err, "{failure}");
                self.notify(Notification::error(err.user_message(failure)));
                Err(err)
            }
        }
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.inner.notifier.notify(notification);
    }

    pub(crate) fn navigate(&self, route: Route) {
        self.inner.navigator.navigate(route);
    }

    fn discard_tokens(&self) {
        if let Err(err) = self.tokens().clear() {
            warn!(error = %err, "Failed to clear stored tokens");
        }
    }

    fn update(&self, change: impl FnOnce(&mut Session)) {
        let snapshot = {
            let mut session = self.inner.session.borrow_mut();
            change(&mut session);
            session.clone()
        };

        // Listeners may subscribe or read the session re-entrantly
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("base_url", &self.inner.client.base_url())
            .field("session", &*self.inner.session.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}
