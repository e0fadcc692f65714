//! Domain model for the swipeable person list.
//!
//! # Responsibility
//! - Define the immutable record rendered by every list row.
//! - Provide the fixed seed used when a list screen is created.
//!
//! # Invariants
//! - Every row is identified by a stable `PersonId`.
//! - Records are replaced or removed, never mutated in place.

pub mod person;
