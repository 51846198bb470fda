//! Navigation guard consulted before every route transition.
//!
//! SYSTEM CONTEXT
//! ==============
//! The routing engine hands the guard a destination's [`RouteMeta`]; the
//! guard reads the already-committed session and answers with a
//! [`Decision`]. It never mutates the session, never starts a session check,
//! and never waits: while a store operation is in flight it sees the state
//! from before that operation.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use serde::{Deserialize, Serialize};

use crate::state::permission::Capability;
use crate::state::session::{Session, SessionContext};

/// Declared requirements of a route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default)]
    pub requires_permission: Option<Capability>,
}

impl RouteMeta {
    /// Reachable by anyone, signed in or not.
    pub const PUBLIC: Self = Self { requires_auth: false, requires_permission: None };

    /// Requires a signed-in user.
    pub const AUTHENTICATED: Self = Self { requires_auth: true, requires_permission: None };

    /// Requires a signed-in user holding `capability`.
    #[must_use]
    pub const fn with_permission(capability: Capability) -> Self {
        Self { requires_auth: true, requires_permission: Some(capability) }
    }
}

/// Outcome of guarding a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    /// Cancel outright; the UI shows a sign-in prompt in place.
    Block,
    /// Go to the named route instead.
    Redirect(String),
}

/// Pure decision over a session snapshot.
///
/// 1. auth required and anonymous: [`Decision::Block`]
/// 2. permission required, authenticated, and not granted: redirect to `home_route`
/// 3. otherwise [`Decision::Proceed`]
#[must_use]
pub fn decide(meta: &RouteMeta, session: &Session, home_route: &str) -> Decision {
    if meta.requires_auth && !session.is_authenticated() {
        return Decision::Block;
    }
    if let Some(capability) = meta.requires_permission {
        if session.is_authenticated() && !session.can(capability) {
            return Decision::Redirect(home_route.to_owned());
        }
    }
    Decision::Proceed
}

/// Guard bound to the shared session and the redirect target.
#[derive(Clone, Debug)]
pub struct NavigationGuard {
    session: SessionContext,
    home_route: String,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(session: SessionContext, home_route: impl Into<String>) -> Self {
        Self { session, home_route: home_route.into() }
    }

    #[must_use]
    pub fn home_route(&self) -> &str {
        &self.home_route
    }

    /// Decide a transition to a destination declaring `meta`.
    #[must_use]
    pub fn check(&self, meta: &RouteMeta) -> Decision {
        let decision = self
            .session
            .read(|session| decide(meta, session, &self.home_route));
        match &decision {
            Decision::Proceed => {}
            Decision::Block => tracing::debug!(?meta, "navigation blocked: not authenticated"),
            Decision::Redirect(to) => tracing::debug!(?meta, %to, "navigation redirected: permission denied"),
        }
        decision
    }
}
