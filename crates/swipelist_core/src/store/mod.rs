//! Ordered, observable person storage.
//!
//! # Responsibility
//! - Own the in-memory sequence rendered by the list screen.
//! - Publish every mutation to subscribers (the rendering layer).
//!
//! # Invariants
//! - Person ids are unique across the sequence after every mutation.
//! - Each mutation is applied atomically and published exactly once.

pub mod person_store;
