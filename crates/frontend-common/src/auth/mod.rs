//! Authentication module

pub mod context;
pub mod guard;

pub use context::{
    AuthContext, AuthProvider, use_auth, use_current_user, use_is_authenticated,
};
pub use guard::RequireAuth;
