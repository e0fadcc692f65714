//! Person domain model.
//!
//! # Responsibility
//! - Define the value rendered by one list row.
//! - Provide the seed sequence shown when a list screen opens.
//!
//! # Invariants
//! - `id` is stable and unique within one `PersonStore`.
//! - A `Person` is a value: equality covers all fields.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identifier used to key rows for diffing and animation.
pub type PersonId = i64;

/// One list entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub age: i32,
}

impl Person {
    pub fn new(id: PersonId, name: impl Into<String>, age: i32) -> Self {
        Self {
            id,
            name: name.into(),
            age,
        }
    }
}

impl Display for Person {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} ({})", self.id, self.name, self.age)
    }
}

/// Returns the six records every freshly created list starts with.
pub fn seed_persons() -> Vec<Person> {
    vec![
        Person::new(1, "Bill", 99),
        Person::new(2, "Teddy", 88),
        Person::new(3, "Shelly", 44),
        Person::new(4, "Alexander", 22),
        Person::new(5, "Arnold", 5),
        Person::new(6, "Marcy", 333),
    ]
}
