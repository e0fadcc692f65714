//! Core logic for the swipe-to-dismiss person list.
//! This crate owns list state and the gesture/notification workflow; UI
//! shells only render snapshots and forward gestures.

pub mod config;
pub mod gesture;
pub mod logging;
pub mod model;
pub mod notify;
pub mod scope;
pub mod service;
pub mod store;

pub use config::ListConfig;
pub use gesture::{
    DismissDirection, DismissTarget, IconAlignment, Rgba, RowIcon, RowState, RowVisuals,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::person::{seed_persons, Person, PersonId};
pub use notify::snackbar_host::{NotificationEvent, SnackbarHost, VisibleNotification};
pub use notify::{
    NotificationDuration, NotificationPresenter, NotificationRequest, NotificationResult,
};
pub use scope::{ScopeError, TaskScope};
pub use service::list_controller::{ControllerError, DismissOutcome, ListController};
pub use service::list_session::ListSession;
pub use store::person_store::{ChangeKind, PersonStore, StoreChange, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
