//! Process-wide authentication state and its shared handle.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`SessionContext`] is created at startup and cloned into both the
//! [`crate::state::store::SessionStore`] (the only writer) and the
//! [`crate::routing::guard::NavigationGuard`] (a reader).
//!
//! TRADE-OFFS
//! ==========
//! Writers take the lock only to apply a settled result, never across an
//! outbound API call. Overlapping operations are therefore not serialized:
//! whichever settles last wins.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, PoisonError, RwLock};

use super::permission::{self, Capability};
use crate::net::types::User;

/// In-flight vs settled state of the most recent session operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// No operation has run yet.
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

impl SessionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }
}

/// Authentication state: who is signed in, and how the last operation went.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    /// The signed-in user. `None` means anonymous.
    pub identity: Option<User>,
    pub status: SessionStatus,
    /// Message from the last failed operation; cleared when the next one starts.
    pub last_error: Option<String>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.identity.as_ref().is_some_and(|u| u.is_admin)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    /// Evaluate a capability by name. Unknown names and anonymous sessions are denied.
    #[must_use]
    pub fn has_permission(&self, capability: &str) -> bool {
        permission::evaluate(self.identity.as_ref(), capability)
    }

    /// Typed variant of [`Session::has_permission`].
    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|u| permission::grants(u, capability))
    }

    pub(crate) fn begin(&mut self) {
        self.status = SessionStatus::Loading;
        self.last_error = None;
    }

    pub(crate) fn establish(&mut self, user: User) {
        self.identity = Some(user);
        self.status = SessionStatus::Ready;
    }

    /// Settle as anonymous without an error (clean logout, "not authenticated").
    pub(crate) fn clear(&mut self) {
        self.identity = None;
        self.status = SessionStatus::Ready;
    }

    /// Settle as anonymous with an error.
    pub(crate) fn fail(&mut self, message: String) {
        self.identity = None;
        self.status = SessionStatus::Error;
        self.last_error = Some(message);
    }
}

/// Cloneable handle to the single shared [`Session`].
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Session>>,
}

impl SessionContext {
    /// Fresh anonymous, idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current committed state.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.read(Session::clone)
    }

    /// Run `f` against the committed state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
