//! Static session holder standing in for the auth provider.

use std::sync::RwLock;

use crate::domain::ports::auth::AuthContext;

/// Auth context with an explicitly managed session
///
/// The real application owns sign-in elsewhere; tests and the
/// maintenance binary flip the session by hand.
#[derive(Default)]
pub struct FixedAuth {
    user: RwLock<Option<String>>,
}

impl FixedAuth {
    /// Starts signed out
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a signed-in user
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user: RwLock::new(Some(user_id.into())),
        }
    }

    /// Sets the current session user
    pub fn sign_in(&self, user_id: impl Into<String>) {
        if let Ok(mut user) = self.user.write() {
            *user = Some(user_id.into());
        }
    }

    /// Ends the current session
    pub fn sign_out(&self) {
        if let Ok(mut user) = self.user.write() {
            *user = None;
        }
    }
}

impl AuthContext for FixedAuth {
    fn current_user_id(&self) -> Option<String> {
        self.user.read().ok().and_then(|user| user.clone())
    }
}
