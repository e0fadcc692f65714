//! Flutter-facing bindings for the swipe list core.

pub mod api;
