//! Client-side session store and navigation guard for the wiki frontend.
//!
//! ARCHITECTURE
//! ============
//! `state` owns the process-wide session (identity, status, last error) and
//! the async operations that mutate it. `routing` reads that session to decide
//! whether a route transition may proceed. `net` is the HTTP collaborator the
//! store talks to, hidden behind the `AuthApi` trait so tests can script it.

pub mod config;
pub mod net;
pub mod routing;
pub mod state;

pub use config::{ClientConfig, ConfigError};
pub use net::api::{ApiError, AuthApi, HttpAuthApi};
pub use net::types::{Credentials, Permissions, User};
pub use routing::guard::{Decision, NavigationGuard, RouteMeta};
pub use routing::routes::{Navigation, Navigator, Route, RouteTable};
pub use state::permission::Capability;
pub use state::session::{Session, SessionContext, SessionStatus};
pub use state::store::{SessionError, SessionStore};
