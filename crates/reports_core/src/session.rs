/// Authenticated operator as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Register,
    Logout,
}

/// Session owned by the page controller.
///
/// Lifecycle: unresolved until the current user has been fetched once;
/// cleared explicitly on logout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    resolved: bool,
    user: Option<User>,
    pending: Option<AuthAction>,
    auth_error: Option<String>,
}

impl Session {
    pub(crate) fn resolve(&mut self, user: Option<User>) {
        self.resolved = true;
        self.user = user;
    }

    pub(crate) fn begin(&mut self, action: AuthAction) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(action);
        self.auth_error = None;
        true
    }

    pub(crate) fn sign_in(&mut self, user: User) {
        self.resolved = true;
        self.user = Some(user);
        self.pending = None;
        self.auth_error = None;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.pending = None;
        self.auth_error = Some(message.into());
    }

    /// Teardown after logout. The session stays resolved: we know nobody is signed in.
    pub(crate) fn clear(&mut self) {
        *self = Self {
            resolved: true,
            ..Self::default()
        };
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn pending(&self) -> Option<AuthAction> {
        self.pending
    }

    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }
}
