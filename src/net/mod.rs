//! Networking for the wiki's auth endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` is the transport collaborator the session store calls through the
//! `AuthApi` trait, and `types` defines the JSON schema both sides share.

pub mod api;
pub mod types;
