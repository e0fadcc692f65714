//! Swipe-to-dismiss list use-case controller.
//!
//! # Responsibility
//! - Map row gestures to delete/archive actions on the `PersonStore`.
//! - Drive the "Undo" and "Hide" notification flows.
//!
//! # Invariants
//! - At most one delete-undo notification is visible; the newest wins.
//! - Undo re-inserts the captured person at its captured index.
//! - Archive removal is permanent regardless of the notification outcome.
//! - All deferred work is cancelled when the controller is closed or dropped.

use crate::gesture::{DismissDirection, RowState, RowVisuals};
use crate::model::person::{Person, PersonId};
use crate::notify::{
    NotificationDuration, NotificationPresenter, NotificationRequest, NotificationResult,
};
use crate::scope::{ScopeError, TaskScope};
use crate::store::person_store::{PersonStore, StoreError};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinSet;

pub const DELETE_ACTION_LABEL: &str = "Undo";
pub const ARCHIVE_ACTION_LABEL: &str = "Hide";

/// Builds the delete notification text.
pub fn deleted_message(name: &str) -> String {
    format!("Deleted {name}")
}

/// Builds the archive notification text.
///
/// The spelling is kept as shipped; UI tests match on it.
pub fn archived_message(name: &str) -> String {
    format!("Archieved {name}")
}

/// Controller failures surfaced to the UI shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// Gesture referenced a row index that is not in the list.
    RowNotFound { index: usize, len: usize },
    /// Gesture referenced a person id that is not in the list.
    UnknownPerson(PersonId),
    Store(StoreError),
    Scope(ScopeError),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RowNotFound { index, len } => {
                write!(f, "row {index} not found in list of length {len}")
            }
            Self::UnknownPerson(id) => write!(f, "person not in list: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Scope(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Scope(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ControllerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ScopeError> for ControllerError {
    fn from(value: ScopeError) -> Self {
        Self::Scope(value)
    }
}

/// What a completed dismissal did to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DismissOutcome {
    /// Removed; an "Undo" notification is pending.
    Deleted { person: Person, index: usize },
    /// Removed for good; a "Hide" notification follows.
    Archived { person: Person, index: usize },
}

#[derive(Debug, Clone, Copy, Default)]
struct RowDrag {
    state: RowState,
    progress: f32,
}

/// Gesture-to-action state machine for one list screen.
pub struct ListController<P: NotificationPresenter + 'static> {
    store: Arc<PersonStore>,
    presenter: Arc<P>,
    scope: TaskScope,
    rows: Mutex<HashMap<PersonId, RowDrag>>,
    pending_archive: Arc<watch::Sender<Option<Person>>>,
    // Ticket of the newest delete; older undo flows that have not shown yet
    // give up their notification.
    latest_delete: Arc<AtomicU64>,
}

impl<P: NotificationPresenter + 'static> ListController<P> {
    /// Creates a controller and starts its archive-notification effect.
    ///
    /// # Errors
    /// - `ControllerError::Scope` when called outside a tokio runtime.
    pub fn new(store: Arc<PersonStore>, presenter: Arc<P>) -> Result<Self, ControllerError> {
        let (pending_archive, pending_rx) = watch::channel(None);
        let pending_archive = Arc::new(pending_archive);
        let scope = TaskScope::new("list_controller");
        scope.spawn(run_archive_effect(
            Arc::clone(&presenter),
            Arc::clone(&pending_archive),
            pending_rx,
        ))?;

        Ok(Self {
            store,
            presenter,
            scope,
            rows: Mutex::new(HashMap::new()),
            pending_archive,
            latest_delete: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Store this controller mutates.
    pub fn store(&self) -> &Arc<PersonStore> {
        &self.store
    }

    /// Notification service used for undo/hide flows.
    pub fn presenter(&self) -> &Arc<P> {
        &self.presenter
    }

    /// Current list contents.
    pub fn persons(&self) -> Vec<Person> {
        self.store.snapshot()
    }

    /// Archived person not yet picked up by the notification effect.
    pub fn pending_archive(&self) -> Option<Person> {
        self.pending_archive.borrow().clone()
    }

    /// Records an in-flight drag on row `id`.
    ///
    /// Ignored for rows that already settled into a dismissal.
    pub fn drag(
        &self,
        id: PersonId,
        direction: DismissDirection,
        progress: f32,
    ) -> Result<RowState, ControllerError> {
        self.ensure_listed(id)?;
        let mut rows = self.lock_rows();
        let row = rows.entry(id).or_default();
        if !row.state.is_dismissed() {
            row.state = RowState::dragging(direction);
            row.progress = progress.clamp(0.0, 1.0);
        }
        Ok(row.state)
    }

    /// Releases a drag that did not reach a dismissal.
    pub fn release(&self, id: PersonId) -> RowState {
        let mut rows = self.lock_rows();
        let settled = rows
            .get(&id)
            .map(|row| row.state)
            .filter(|state| state.is_dismissed());
        if let Some(state) = settled {
            return state;
        }
        rows.remove(&id);
        RowState::Idle
    }

    /// Gesture state of row `id`; `Idle` when untracked.
    pub fn row_state(&self, id: PersonId) -> RowState {
        self.lock_rows()
            .get(&id)
            .map(|row| row.state)
            .unwrap_or_default()
    }

    /// Background visuals for row `id` from its drag state.
    pub fn row_visuals(&self, id: PersonId) -> RowVisuals {
        let row = self.lock_rows().get(&id).copied().unwrap_or_default();
        RowVisuals::for_row(row.state, row.progress)
    }

    /// Applies a completed swipe on the row at `index`.
    ///
    /// `EndToStart` deletes with an "Undo" notification; `StartToEnd`
    /// archives and queues a "Hide" notification.
    ///
    /// # Errors
    /// - `ControllerError::RowNotFound` when `index` is not a list row.
    /// - `ControllerError::Scope` when the controller is closed or has no
    ///   runtime; the list is left unchanged.
    pub fn dismiss(
        &self,
        index: usize,
        direction: DismissDirection,
    ) -> Result<DismissOutcome, ControllerError> {
        if self.scope.is_closed() {
            return Err(ControllerError::Scope(ScopeError::Closed));
        }
        let person = self
            .store
            .get(index)
            .ok_or_else(|| ControllerError::RowNotFound {
                index,
                len: self.store.len(),
            })?;
        self.set_row_state(person.id, RowState::dismissed(direction));

        match direction {
            DismissDirection::EndToStart => self.delete(person, index),
            DismissDirection::StartToEnd => Ok(self.archive(person, index)),
        }
    }

    /// Cancels pending notification flows. Later dismissals fail.
    pub fn close(&self) {
        self.scope.close();
    }

    fn delete(&self, person: Person, index: usize) -> Result<DismissOutcome, ControllerError> {
        self.store.remove_by_identity(&person);
        let ticket = self.latest_delete.fetch_add(1, Ordering::AcqRel) + 1;

        let request = NotificationRequest::new(
            deleted_message(&person.name),
            NotificationDuration::Short,
        )
        .with_action(DELETE_ACTION_LABEL);
        let spawned = self.scope.spawn(undo_delete_flow(
            Arc::clone(&self.store),
            Arc::clone(&self.presenter),
            UndoTicket {
                ticket,
                latest: Arc::clone(&self.latest_delete),
            },
            request,
            person.clone(),
            index,
        ));
        if let Err(err) = spawned {
            // Without a notification there is no undo path; keep the row.
            if let Err(rollback) = self.store.insert_at(index, person.clone()) {
                warn!(
                    "event=row_delete_rollback module=controller status=error id={} index={} error={}",
                    person.id, index, rollback
                );
            }
            self.reset_row(person.id);
            return Err(err.into());
        }

        self.reset_row(person.id);
        info!(
            "event=row_delete module=controller status=ok id={} index={}",
            person.id, index
        );
        Ok(DismissOutcome::Deleted { person, index })
    }

    fn archive(&self, person: Person, index: usize) -> DismissOutcome {
        self.store.remove_by_identity(&person);
        self.reset_row(person.id);
        let overwritten = self.pending_archive.send_replace(Some(person.clone()));
        if let Some(lost) = overwritten {
            warn!(
                "event=row_archive module=controller status=coalesced lost_id={}",
                lost.id
            );
        }
        info!(
            "event=row_archive module=controller status=ok id={} index={}",
            person.id, index
        );
        DismissOutcome::Archived { person, index }
    }

    fn ensure_listed(&self, id: PersonId) -> Result<(), ControllerError> {
        if self.store.snapshot().iter().any(|person| person.id == id) {
            Ok(())
        } else {
            Err(ControllerError::UnknownPerson(id))
        }
    }

    fn set_row_state(&self, id: PersonId, state: RowState) {
        self.lock_rows().insert(
            id,
            RowDrag {
                state,
                progress: 1.0,
            },
        );
    }

    fn reset_row(&self, id: PersonId) {
        self.lock_rows().remove(&id);
    }

    fn lock_rows(&self) -> std::sync::MutexGuard<'_, HashMap<PersonId, RowDrag>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct UndoTicket {
    ticket: u64,
    latest: Arc<AtomicU64>,
}

impl UndoTicket {
    fn is_latest(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.ticket
    }
}

/// Shows the "Undo" notification for one delete and restores on action.
///
/// A newer delete supersedes this one: if it arrived before this flow got
/// to show, the notification is skipped and the delete stays permanent;
/// otherwise the newer flow force-dismisses this one.
async fn undo_delete_flow<P: NotificationPresenter>(
    store: Arc<PersonStore>,
    presenter: Arc<P>,
    undo: UndoTicket,
    request: NotificationRequest,
    person: Person,
    index: usize,
) {
    let person_id = person.id;
    if !undo.is_latest() {
        debug!(
            "event=undo_delete module=controller status=superseded id={}",
            person_id
        );
        return;
    }
    presenter.dismiss_current();
    match presenter.show(request).await {
        NotificationResult::Dismissed => debug!(
            "event=undo_delete module=controller status=expired id={}",
            person_id
        ),
        NotificationResult::ActionPerformed => match store.insert_at(index, person) {
            Ok(()) => info!(
                "event=undo_delete module=controller status=ok id={} index={}",
                person_id, index
            ),
            Err(err) => warn!(
                "event=undo_delete module=controller status=error id={} error={}",
                person_id, err
            ),
        },
    }
}

/// Reacts to PendingArchive becoming non-empty.
///
/// Each archive is captured and cleared, then announced on its own task so
/// later archives are picked up while earlier notifications are queued.
/// Dropping this future aborts the notification tasks it started.
async fn run_archive_effect<P: NotificationPresenter + 'static>(
    presenter: Arc<P>,
    pending: Arc<watch::Sender<Option<Person>>>,
    mut pending_rx: watch::Receiver<Option<Person>>,
) {
    let mut notifications = JoinSet::new();
    while pending_rx.changed().await.is_ok() {
        while notifications.try_join_next().is_some() {}

        let archived = pending_rx.borrow_and_update().clone();
        let Some(archived) = archived else {
            continue;
        };
        let person_id = archived.id;
        let name = archived.name;
        pending.send_replace(None);

        let presenter = Arc::clone(&presenter);
        let pending = Arc::clone(&pending);
        notifications.spawn(async move {
            let request =
                NotificationRequest::new(archived_message(&name), NotificationDuration::Short)
                    .with_action(ARCHIVE_ACTION_LABEL);
            let result = presenter.show(request).await;
            pending.send_replace(None);
            match result {
                NotificationResult::Dismissed => {}
                NotificationResult::ActionPerformed => debug!(
                    "event=archive_hide module=controller status=ok id={}",
                    person_id
                ),
            }
        });
    }
}
