//! FFI use-case API for the Flutter list screen.
//!
//! # Responsibility
//! - Expose list gestures, snapshots and snackbar controls to Dart via FRB.
//! - Own the process-wide list session and the runtime that drives it.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - All deferred list work runs on the session runtime.
//! - Failures are reported in response envelopes, never thrown.

use std::sync::OnceLock;
use swipelist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    DismissDirection, DismissOutcome, IconAlignment, ListConfig, ListSession,
    NotificationPresenter, Person, Rgba, RowIcon, VisibleNotification,
};
use tokio::runtime::{Builder, Runtime};

struct Session {
    list: ListSession,
    runtime: Runtime,
}

static SESSION: OnceLock<Result<Session, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonItem {
    pub id: i64,
    pub name: String,
    pub age: i32,
}

/// Visible snackbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    pub id: u64,
    pub message: String,
    pub action_label: Option<String>,
}

/// Row background layer, colors as `0xAARRGGBB`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowVisualsItem {
    pub background_argb: u32,
    /// `delete` or `add_circle`.
    pub icon: String,
    /// `start` or `end`.
    pub icon_alignment: String,
    pub icon_scale: f32,
}

/// Generic action response envelope for list gestures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListActionResponse {
    pub ok: bool,
    /// Affected person id, when known.
    pub person_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ListActionResponse {
    fn success(message: impl Into<String>, person_id: i64) -> Self {
        Self {
            ok: true,
            person_id: Some(person_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            person_id: None,
            message: message.into(),
        }
    }
}

/// Returns the current list rows in display order.
///
/// Empty when the session failed to start.
#[flutter_rust_bridge::frb(sync)]
pub fn list_persons() -> Vec<PersonItem> {
    with_session(|session| {
        session
            .list
            .store()
            .snapshot()
            .into_iter()
            .map(to_person_item)
            .collect()
    })
    .unwrap_or_default()
}

/// Mutation counter; re-read `list_persons` when it changes.
#[flutter_rust_bridge::frb(sync)]
pub fn list_revision() -> u64 {
    with_session(|session| session.list.store().revision()).unwrap_or(0)
}

/// Applies a completed swipe on row `index`.
///
/// `direction`: `start` (delete, undoable) or `end` (archive).
#[flutter_rust_bridge::frb(sync)]
pub fn swipe_row(index: u32, direction: String) -> ListActionResponse {
    let Some(direction) = DismissDirection::parse(direction.as_str()) else {
        return ListActionResponse::failure(format!(
            "swipe_row failed: unsupported direction `{direction}`"
        ));
    };
    let outcome = with_session(|session| {
        let _guard = session.runtime.enter();
        session.list.controller().dismiss(index as usize, direction)
    });
    match outcome {
        Ok(Ok(DismissOutcome::Deleted { person, .. })) => {
            ListActionResponse::success("Row deleted.", person.id)
        }
        Ok(Ok(DismissOutcome::Archived { person, .. })) => {
            ListActionResponse::success("Row archived.", person.id)
        }
        Ok(Err(err)) => ListActionResponse::failure(format!("swipe_row failed: {err}")),
        Err(err) => ListActionResponse::failure(format!("swipe_row failed: {err}")),
    }
}

/// Schedules a new row to appear after the configured add delay.
#[flutter_rust_bridge::frb(sync)]
pub fn add_person(id: i64, name: String, age: i32) -> ListActionResponse {
    let person = Person::new(id, name.trim(), age);
    let scheduled = with_session(|session| {
        let _guard = session.runtime.enter();
        session.list.add(person)
    });
    match scheduled {
        Ok(Ok(())) => ListActionResponse::success("Add scheduled.", id),
        Ok(Err(err)) => ListActionResponse::failure(format!("add_person failed: {err}")),
        Err(err) => ListActionResponse::failure(format!("add_person failed: {err}")),
    }
}

/// Records an in-flight drag for row background rendering.
#[flutter_rust_bridge::frb(sync)]
pub fn drag_row(id: i64, direction: String, progress: f32) -> ListActionResponse {
    let Some(direction) = DismissDirection::parse(direction.as_str()) else {
        return ListActionResponse::failure(format!(
            "drag_row failed: unsupported direction `{direction}`"
        ));
    };
    match with_session(|session| session.list.controller().drag(id, direction, progress)) {
        Ok(Ok(state)) => ListActionResponse::success(format!("{state:?}"), id),
        Ok(Err(err)) => ListActionResponse::failure(format!("drag_row failed: {err}")),
        Err(err) => ListActionResponse::failure(format!("drag_row failed: {err}")),
    }
}

/// Releases a drag that did not dismiss the row.
#[flutter_rust_bridge::frb(sync)]
pub fn release_row(id: i64) {
    let _ = with_session(|session| session.list.controller().release(id));
}

/// Returns background visuals for row `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn row_visuals(id: i64) -> Option<RowVisualsItem> {
    with_session(|session| {
        let visuals = session.list.controller().row_visuals(id);
        RowVisualsItem {
            background_argb: argb(visuals.background),
            icon: match visuals.icon {
                RowIcon::Delete => "delete",
                RowIcon::AddCircle => "add_circle",
            }
            .to_string(),
            icon_alignment: match visuals.icon_alignment {
                IconAlignment::CenterStart => "start",
                IconAlignment::CenterEnd => "end",
            }
            .to_string(),
            icon_scale: visuals.icon_scale,
        }
    })
    .ok()
}

/// Returns the snackbar currently on screen.
#[flutter_rust_bridge::frb(sync)]
pub fn current_notification() -> Option<NotificationItem> {
    with_session(|session| session.list.host().current().map(to_notification_item))
        .ok()
        .flatten()
}

/// Presses the visible snackbar's action. Returns whether one was pressed.
#[flutter_rust_bridge::frb(sync)]
pub fn notification_action() -> bool {
    with_session(|session| session.list.host().perform_action().is_some()).unwrap_or(false)
}

/// Dismisses the visible snackbar. Returns whether one was dismissed.
#[flutter_rust_bridge::frb(sync)]
pub fn notification_dismiss() -> bool {
    with_session(|session| session.list.host().dismiss_current()).unwrap_or(false)
}

fn with_session<T>(f: impl FnOnce(&Session) -> T) -> Result<T, String> {
    match SESSION.get_or_init(start_session) {
        Ok(session) => Ok(f(session)),
        Err(err) => Err(err.clone()),
    }
}

fn start_session() -> Result<Session, String> {
    let runtime = Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("swipelist-ui")
        .enable_time()
        .build()
        .map_err(|err| format!("list runtime start failed: {err}"))?;
    let list = {
        let _guard = runtime.enter();
        ListSession::start(ListConfig::from_env())
            .map_err(|err| format!("list session start failed: {err}"))?
    };
    log::info!("event=ffi_session_start module=ffi status=ok");
    Ok(Session { list, runtime })
}

fn to_person_item(person: Person) -> PersonItem {
    PersonItem {
        id: person.id,
        name: person.name,
        age: person.age,
    }
}

fn to_notification_item(visible: VisibleNotification) -> NotificationItem {
    NotificationItem {
        id: visible.id,
        message: visible.message,
        action_label: visible.action_label,
    }
}

fn argb(color: Rgba) -> u32 {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(color.alpha) << 24)
        | (channel(color.red) << 16)
        | (channel(color.green) << 8)
        | channel(color.blue)
}
