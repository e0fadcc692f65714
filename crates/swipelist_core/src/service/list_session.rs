//! Screen-scoped bundle of store, snackbar host and controller.
//!
//! # Responsibility
//! - Wire one list screen from a `ListConfig`.
//! - Tear down all deferred work together when the screen goes away.

use crate::config::ListConfig;
use crate::model::person::{seed_persons, Person};
use crate::notify::snackbar_host::SnackbarHost;
use crate::service::list_controller::{ControllerError, ListController};
use crate::store::person_store::PersonStore;
use log::info;
use std::sync::Arc;

/// One list screen: seeded store, headless snackbar host and controller.
pub struct ListSession {
    config: ListConfig,
    controller: ListController<SnackbarHost>,
}

impl ListSession {
    /// Starts a session over the fixed six-person seed.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(config: ListConfig) -> Result<Self, ControllerError> {
        Self::with_persons(config, seed_persons())
    }

    /// Starts a session over a caller-provided initial sequence.
    pub fn with_persons(config: ListConfig, persons: Vec<Person>) -> Result<Self, ControllerError> {
        let store = Arc::new(PersonStore::from_persons(persons)?.with_add_delay(config.add_delay));
        let host = Arc::new(SnackbarHost::from_config(&config));
        let controller = ListController::new(store, host)?;
        info!(
            "event=session_start module=service status=ok rows={}",
            controller.store().len()
        );
        Ok(Self { config, controller })
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn controller(&self) -> &ListController<SnackbarHost> {
        &self.controller
    }

    pub fn store(&self) -> &Arc<PersonStore> {
        self.controller.store()
    }

    pub fn host(&self) -> &Arc<SnackbarHost> {
        self.controller.presenter()
    }

    /// Appends `person` after the configured add delay.
    pub fn add(&self, person: Person) -> Result<(), ControllerError> {
        self.store().add(person)?;
        Ok(())
    }

    /// Cancels pending adds and notification flows.
    pub fn close(&self) {
        self.controller.close();
        self.store().close();
    }
}

impl Drop for ListSession {
    fn drop(&mut self) {
        self.close();
    }
}
