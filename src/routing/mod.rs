//! Route guarding.
//!
//! SYSTEM CONTEXT
//! ==============
//! `guard` turns route requirements plus the current session into a
//! navigation decision; `routes` holds the wiki's route table and a small
//! navigator that resolves paths and consults the guard.

pub mod guard;
pub mod routes;
