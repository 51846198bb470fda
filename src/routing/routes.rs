//! The wiki's route table and a navigator that applies the guard to it.
//!
//! DESIGN
//! ======
//! Routes are plain data: a name, a path pattern and a [`RouteMeta`]. Path
//! patterns use `/literal` and `/:param` segments. When several patterns match,
//! the one with a literal where the others have a parameter wins, so
//! `/pages/create` beats `/pages/:slug` regardless of declaration order.
//! Unmatched paths resolve to the catch-all route.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::collections::BTreeMap;

use super::guard::{Decision, NavigationGuard, RouteMeta};
use crate::state::permission::Capability;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub name: String,
    pub path: String,
    pub meta: RouteMeta,
}

impl Route {
    #[must_use]
    pub fn new(name: &str, path: &str, meta: RouteMeta) -> Self {
        Self { name: name.to_owned(), path: path.to_owned(), meta }
    }

    /// Match `segments` against this route's pattern, collecting `:param` values.
    ///
    /// Returns the per-segment rank (`0` literal, `1` param) with the params.
    fn matches(&self, segments: &[&str]) -> Option<(Vec<u8>, BTreeMap<String, String>)> {
        let pattern = split_path(&self.path);
        if pattern.len() != segments.len() {
            return None;
        }
        let mut rank = Vec::with_capacity(pattern.len());
        let mut params = BTreeMap::new();
        for (want, got) in pattern.iter().zip(segments) {
            if let Some(param) = want.strip_prefix(':') {
                params.insert(param.to_owned(), (*got).to_owned());
                rank.push(1);
            } else if want == got {
                rank.push(0);
            } else {
                return None;
            }
        }
        Some((rank, params))
    }
}

/// A resolved path: the matching route plus its extracted parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
    fallback: Route,
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: Vec<Route>, fallback: Route) -> Self {
        Self { routes, fallback }
    }

    /// The wiki's views and the requirements each declares.
    #[must_use]
    pub fn wiki() -> Self {
        Self::new(
            vec![
                Route::new("home", "/", RouteMeta::AUTHENTICATED),
                Route::new("pages", "/pages", RouteMeta::AUTHENTICATED),
                Route::new("create-page", "/pages/create", RouteMeta::with_permission(Capability::Create)),
                Route::new("page", "/pages/:slug", RouteMeta::AUTHENTICATED),
                Route::new("edit-page", "/pages/:slug/edit", RouteMeta::with_permission(Capability::Edit)),
                Route::new("files", "/files", RouteMeta::AUTHENTICATED),
                Route::new("search", "/search", RouteMeta::AUTHENTICATED),
                Route::new("settings", "/settings", RouteMeta::with_permission(Capability::Admin)),
            ],
            Route::new("not-found", "/:pathMatch(.*)*", RouteMeta::PUBLIC),
        )
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes
            .iter()
            .chain(std::iter::once(&self.fallback))
            .find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Resolve a browser path (query and fragment ignored) to a route.
    #[must_use]
    pub fn resolve(&self, path: &str) -> RouteMatch<'_> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments = split_path(path);
        self.routes
            .iter()
            .filter_map(|route| route.matches(&segments).map(|(rank, params)| (rank, route, params)))
            .min_by(|a, b| a.0.cmp(&b.0))
            .map_or_else(
                || RouteMatch { route: &self.fallback, params: BTreeMap::new() },
                |(_, route, params)| RouteMatch { route, params },
            )
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Result of attempting to navigate to a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Landed on `route`.
    Arrived { route: String, params: BTreeMap<String, String> },
    /// The transition to `route` was cancelled.
    Blocked { route: String },
    /// `from` was denied; landed on `to` instead.
    Redirected { from: String, to: String },
}

/// Routing-engine stand-in: resolves paths and runs the guard before "activating" them.
#[derive(Clone, Debug)]
pub struct Navigator {
    table: RouteTable,
    guard: NavigationGuard,
}

impl Navigator {
    #[must_use]
    pub fn new(table: RouteTable, guard: NavigationGuard) -> Self {
        Self { table, guard }
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    #[must_use]
    pub fn navigate(&self, path: &str) -> Navigation {
        let matched = self.table.resolve(path);
        let route = matched.route.name.clone();
        match self.guard.check(&matched.route.meta) {
            Decision::Proceed => Navigation::Arrived { route, params: matched.params },
            Decision::Block => Navigation::Blocked { route },
            Decision::Redirect(to) => Navigation::Redirected { from: route, to },
        }
    }
}
