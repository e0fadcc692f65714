//! List use-case services.
//!
//! # Responsibility
//! - Turn row gestures into store mutations and notification flows.
//! - Bundle store, host and controller into one screen-scoped session.
//!
//! # Invariants
//! - Services own their deferred work; closing a service cancels it.

pub mod list_controller;
pub mod list_session;
