//! PersonStore: the list screen's ordered sequence of people.
//!
//! # Responsibility
//! - Provide positional insert, value removal and delayed append.
//! - Expose snapshots and a change stream for the rendering layer.
//!
//! # Invariants
//! - `insert_at` never clamps; an index past the end is rejected.
//! - No two stored persons share an `id`.
//! - Delayed appends die with the store (close or drop).
//!
//! # See also
//! - `crate::scope::TaskScope`

use crate::config::DEFAULT_ADD_DELAY;
use crate::model::person::{seed_persons, Person, PersonId};
use crate::scope::{ScopeError, TaskScope};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store mutation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert position is past the end of the sequence.
    IndexOutOfRange { index: usize, len: usize },
    /// Another stored person already uses this id.
    DuplicateId(PersonId),
    /// Deferred mutation could not be scheduled.
    Scope(ScopeError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "insert index {index} out of range for length {len}")
            }
            Self::DuplicateId(id) => write!(f, "person id already stored: {id}"),
            Self::Scope(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Scope(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ScopeError> for StoreError {
    fn from(value: ScopeError) -> Self {
        Self::Scope(value)
    }
}

/// Kind of mutation carried by one `StoreChange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Inserted { index: usize },
    Appended { index: usize },
    Removed { index: usize },
}

/// Published after every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    /// Monotonic counter, incremented once per mutation.
    pub revision: u64,
    pub kind: ChangeKind,
    /// Full sequence after the mutation.
    pub persons: Vec<Person>,
}

struct StoreState {
    persons: Vec<Person>,
    revision: u64,
}

struct Shared {
    state: Mutex<StoreState>,
    changes: broadcast::Sender<StoreChange>,
}

impl Shared {
    fn new(persons: Vec<Person>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(StoreState {
                persons,
                revision: 0,
            }),
            changes,
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Applies `mutate` under the lock and publishes the resulting change.
    fn mutate(
        &self,
        mutate: impl FnOnce(&mut Vec<Person>) -> StoreResult<Option<ChangeKind>>,
    ) -> StoreResult<Option<ChangeKind>> {
        let change = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let Some(kind) = mutate(&mut state.persons)? else {
                return Ok(None);
            };
            state.revision += 1;
            StoreChange {
                revision: state.revision,
                kind,
                persons: state.persons.clone(),
            }
        };
        let kind = change.kind;
        // No subscribers is a normal state for headless callers.
        let _ = self.changes.send(change);
        Ok(Some(kind))
    }

    fn append(&self, person: Person) -> StoreResult<usize> {
        let mut appended_at = 0;
        self.mutate(|persons| {
            ensure_unique(persons, person.id)?;
            persons.push(person);
            appended_at = persons.len() - 1;
            Ok(Some(ChangeKind::Appended { index: appended_at }))
        })?;
        Ok(appended_at)
    }
}

fn ensure_unique(persons: &[Person], id: PersonId) -> StoreResult<()> {
    if persons.iter().any(|existing| existing.id == id) {
        return Err(StoreError::DuplicateId(id));
    }
    Ok(())
}

/// Ordered, observable, in-memory sequence of `Person` records.
///
/// Owned by one list screen and injected into its controller. Dropping the
/// store cancels any `add` still waiting for its delay.
pub struct PersonStore {
    shared: Arc<Shared>,
    scope: TaskScope,
    add_delay: Duration,
}

impl Default for PersonStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonStore {
    /// Creates an empty store with the default add delay.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::new(Vec::new())),
            scope: TaskScope::new("person_store"),
            add_delay: DEFAULT_ADD_DELAY,
        }
    }

    /// Creates a store holding the fixed six-person seed.
    pub fn seeded() -> Self {
        Self::from_persons(seed_persons()).unwrap_or_else(|_| Self::new())
    }

    /// Creates a store from an initial sequence.
    ///
    /// # Errors
    /// - `StoreError::DuplicateId` when two records share an id.
    pub fn from_persons(persons: Vec<Person>) -> StoreResult<Self> {
        for (position, person) in persons.iter().enumerate() {
            ensure_unique(&persons[..position], person.id)?;
        }
        Ok(Self {
            shared: Arc::new(Shared::new(persons)),
            scope: TaskScope::new("person_store"),
            add_delay: DEFAULT_ADD_DELAY,
        })
    }

    /// Overrides the delay used by `add`.
    pub fn with_add_delay(mut self, add_delay: Duration) -> Self {
        self.add_delay = add_delay;
        self
    }

    /// Delay applied by `add`.
    pub fn add_delay(&self) -> Duration {
        self.add_delay
    }

    /// Inserts `person` at `index`, shifting later rows right.
    ///
    /// # Errors
    /// - `StoreError::IndexOutOfRange` when `index > len`.
    /// - `StoreError::DuplicateId` when the id is already stored.
    pub fn insert_at(&self, index: usize, person: Person) -> StoreResult<()> {
        let person_id = person.id;
        self.shared.mutate(|persons| {
            if index > persons.len() {
                return Err(StoreError::IndexOutOfRange {
                    index,
                    len: persons.len(),
                });
            }
            ensure_unique(persons, person.id)?;
            persons.insert(index, person);
            Ok(Some(ChangeKind::Inserted { index }))
        })?;
        debug!(
            "event=person_insert module=store status=ok id={} index={}",
            person_id, index
        );
        Ok(())
    }

    /// Removes the first element equal to `person`.
    ///
    /// Returns the former index, or `None` when no such element exists.
    pub fn remove_by_identity(&self, person: &Person) -> Option<usize> {
        let removed = self.shared.mutate(|persons| {
            let Some(index) = persons.iter().position(|existing| existing == person) else {
                return Ok(None);
            };
            persons.remove(index);
            Ok(Some(ChangeKind::Removed { index }))
        });
        match removed {
            Ok(Some(ChangeKind::Removed { index })) => {
                debug!(
                    "event=person_remove module=store status=ok id={} index={}",
                    person.id, index
                );
                Some(index)
            }
            _ => None,
        }
    }

    /// Appends `person` immediately.
    ///
    /// # Errors
    /// - `StoreError::DuplicateId` when the id is already stored.
    pub fn push(&self, person: Person) -> StoreResult<()> {
        self.shared.append(person).map(|_| ())
    }

    /// Schedules `person` to be appended once the add delay elapses.
    ///
    /// Returns as soon as the append is scheduled. The sequence is unchanged
    /// until the delay elapses. If the id is taken by then, the append is
    /// skipped and logged.
    ///
    /// # Errors
    /// - `StoreError::Scope` when called outside a runtime or after `close()`.
    pub fn add(&self, person: Person) -> StoreResult<()> {
        let shared = Arc::clone(&self.shared);
        let delay = self.add_delay;
        self.scope.spawn(async move {
            tokio::time::sleep(delay).await;
            let person_id = person.id;
            match shared.append(person) {
                Ok(index) => debug!(
                    "event=person_add module=store status=ok id={} index={}",
                    person_id, index
                ),
                Err(err) => warn!(
                    "event=person_add module=store status=rejected id={} error={}",
                    person_id, err
                ),
            }
        })?;
        Ok(())
    }

    /// Returns a copy of the current sequence.
    pub fn snapshot(&self) -> Vec<Person> {
        self.shared.with_state(|state| state.persons.clone())
    }

    /// Returns the person at `index`, if any.
    pub fn get(&self, index: usize) -> Option<Person> {
        self.shared
            .with_state(|state| state.persons.get(index).cloned())
    }

    /// Index of the first element equal to `person`.
    pub fn position_of(&self, person: &Person) -> Option<usize> {
        self.shared
            .with_state(|state| state.persons.iter().position(|existing| existing == person))
    }

    /// Number of stored persons.
    pub fn len(&self) -> usize {
        self.shared.with_state(|state| state.persons.len())
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of mutations applied since creation.
    pub fn revision(&self) -> u64 {
        self.shared.with_state(|state| state.revision)
    }

    /// Subscribes to mutation events.
    ///
    /// Slow receivers observe `RecvError::Lagged` and should re-read
    /// `snapshot()`.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.shared.changes.subscribe()
    }

    /// Cancels pending delayed adds. Later `add` calls fail.
    pub fn close(&self) {
        self.scope.close();
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeKind, PersonStore, StoreError};
    use crate::model::person::Person;
    use crate::scope::ScopeError;

    #[test]
    fn from_persons_rejects_duplicate_ids() {
        let err = PersonStore::from_persons(vec![
            Person::new(1, "Bill", 99),
            Person::new(1, "Other Bill", 12),
        ])
        .err()
        .expect("duplicate ids must be rejected");
        assert_eq!(err, StoreError::DuplicateId(1));
    }

    #[test]
    fn insert_at_end_is_allowed() {
        let store = PersonStore::from_persons(vec![Person::new(1, "Bill", 99)]).unwrap();
        store.insert_at(1, Person::new(2, "Teddy", 88)).unwrap();
        assert_eq!(store.get(1).unwrap().name, "Teddy");
    }

    #[test]
    fn mutations_publish_changes_in_order() {
        let store = PersonStore::seeded();
        let mut changes = store.subscribe();

        let teddy = store.get(1).unwrap();
        store.remove_by_identity(&teddy);
        store.insert_at(1, teddy).unwrap();

        let first = changes.try_recv().unwrap();
        assert_eq!(first.revision, 1);
        assert_eq!(first.kind, ChangeKind::Removed { index: 1 });
        assert_eq!(first.persons.len(), 5);

        let second = changes.try_recv().unwrap();
        assert_eq!(second.revision, 2);
        assert_eq!(second.kind, ChangeKind::Inserted { index: 1 });
        assert_eq!(second.persons.len(), 6);
    }

    #[test]
    fn failed_and_noop_mutations_do_not_bump_revision() {
        let store = PersonStore::seeded();
        let _ = store.insert_at(99, Person::new(7, "New", 1));
        store.remove_by_identity(&Person::new(42, "Nobody", 0));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn add_outside_runtime_fails() {
        let store = PersonStore::new();
        let err = store.add(Person::new(7, "New", 1)).unwrap_err();
        assert_eq!(err, StoreError::Scope(ScopeError::RuntimeUnavailable));
    }
}
