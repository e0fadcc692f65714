//! Headless snackbar host.
//!
//! # Responsibility
//! - Queue notification requests and expose the visible one to the UI.
//! - Resolve the visible notification on action, dismissal or timeout.
//!
//! # Invariants
//! - Requests are shown one at a time, in call order.
//! - A `show` future dropped mid-display clears its notification.

use crate::config::ListConfig;
use crate::notify::{
    NotificationDuration, NotificationPresenter, NotificationRequest, NotificationResult,
    NotificationTimeouts,
};
use async_trait::async_trait;
use log::debug;
use std::sync::{Mutex, PoisonError};
use tokio::sync::{broadcast, oneshot};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Host-scoped notification identifier.
pub type NotificationId = u64;

/// Snapshot of the notification currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleNotification {
    pub id: NotificationId,
    pub message: String,
    pub action_label: Option<String>,
    pub duration: NotificationDuration,
}

/// Lifecycle events for renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Shown(VisibleNotification),
    Resolved {
        id: NotificationId,
        result: NotificationResult,
    },
}

struct Visible {
    snapshot: VisibleNotification,
    resolver: oneshot::Sender<NotificationResult>,
}

#[derive(Default)]
struct HostState {
    next_id: NotificationId,
    current: Option<Visible>,
}

/// In-process snackbar host driven by the UI shell.
pub struct SnackbarHost {
    // Held for the whole display of one request; tokio's mutex is FIFO fair.
    slot: tokio::sync::Mutex<()>,
    state: Mutex<HostState>,
    events: broadcast::Sender<NotificationEvent>,
    timeouts: NotificationTimeouts,
}

impl SnackbarHost {
    pub fn new(timeouts: NotificationTimeouts) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            slot: tokio::sync::Mutex::new(()),
            state: Mutex::new(HostState::default()),
            events,
            timeouts,
        }
    }

    pub fn from_config(config: &ListConfig) -> Self {
        Self::new(NotificationTimeouts {
            short: config.short_timeout,
            long: config.long_timeout,
        })
    }

    /// Returns the notification currently on screen.
    pub fn current(&self) -> Option<VisibleNotification> {
        self.lock_state()
            .current
            .as_ref()
            .map(|visible| visible.snapshot.clone())
    }

    /// Presses the action button of the visible notification.
    ///
    /// Returns the resolved id, or `None` when nothing is visible or the
    /// visible notification has no action.
    pub fn perform_action(&self) -> Option<NotificationId> {
        let has_action = self
            .lock_state()
            .current
            .as_ref()
            .is_some_and(|visible| visible.snapshot.action_label.is_some());
        if !has_action {
            return None;
        }
        self.resolve_current(NotificationResult::ActionPerformed)
    }

    /// Subscribes to show/resolve events.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }

    fn resolve_current(&self, result: NotificationResult) -> Option<NotificationId> {
        let visible = self.lock_state().current.take()?;
        let id = visible.snapshot.id;
        // The waiting `show` may already be gone; resolution still stands.
        let _ = visible.resolver.send(result);
        debug!(
            "event=notification_resolve module=notify status=ok id={} result={:?}",
            id, result
        );
        Some(id)
    }

    fn clear_if_current(&self, id: NotificationId) {
        let mut state = self.lock_state();
        if state
            .current
            .as_ref()
            .is_some_and(|visible| visible.snapshot.id == id)
        {
            state.current = None;
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the visible entry if `show` is cancelled while displaying.
struct ClearOnDrop<'a> {
    host: &'a SnackbarHost,
    id: NotificationId,
}

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.host.clear_if_current(self.id);
    }
}

#[async_trait]
impl NotificationPresenter for SnackbarHost {
    async fn show(&self, request: NotificationRequest) -> NotificationResult {
        let _slot = self.slot.lock().await;

        let (resolver, resolved) = oneshot::channel();
        let snapshot = {
            let mut state = self.lock_state();
            state.next_id += 1;
            let snapshot = VisibleNotification {
                id: state.next_id,
                message: request.message,
                action_label: request.action_label,
                duration: request.duration,
            };
            state.current = Some(Visible {
                snapshot: snapshot.clone(),
                resolver,
            });
            snapshot
        };
        let id = snapshot.id;
        let _clear = ClearOnDrop { host: self, id };
        let timeout = self.timeouts.resolve(snapshot.duration);
        debug!(
            "event=notification_show module=notify status=ok id={} duration={:?}",
            id, snapshot.duration
        );
        let _ = self.events.send(NotificationEvent::Shown(snapshot));

        let result = match timeout {
            Some(limit) => match tokio::time::timeout(limit, resolved).await {
                Ok(Ok(result)) => result,
                Ok(Err(_)) | Err(_) => NotificationResult::Dismissed,
            },
            None => resolved.await.unwrap_or(NotificationResult::Dismissed),
        };

        self.clear_if_current(id);
        let _ = self
            .events
            .send(NotificationEvent::Resolved { id, result });
        result
    }

    fn dismiss_current(&self) -> bool {
        self.resolve_current(NotificationResult::Dismissed).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationEvent, SnackbarHost};
    use crate::notify::{
        NotificationDuration, NotificationPresenter, NotificationRequest, NotificationResult,
        NotificationTimeouts,
    };
    use std::sync::Arc;
    use std::time::Duration;

    fn host() -> Arc<SnackbarHost> {
        Arc::new(SnackbarHost::new(NotificationTimeouts {
            short: Duration::from_millis(4_000),
            long: Duration::from_millis(10_000),
        }))
    }

    fn undo(message: &str) -> NotificationRequest {
        NotificationRequest::new(message, NotificationDuration::Short).with_action("Undo")
    }

    #[tokio::test(start_paused = true)]
    async fn short_notification_times_out_as_dismissed() {
        let host = host();
        let result = host.show(undo("Deleted Teddy")).await;
        assert_eq!(result, NotificationResult::Dismissed);
        assert!(host.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn action_resolves_waiting_show() {
        let host = host();
        let shown = tokio::spawn({
            let host = Arc::clone(&host);
            async move { host.show(undo("Deleted Teddy")).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let visible = host.current().expect("notification should be visible");
        assert_eq!(visible.message, "Deleted Teddy");
        assert_eq!(host.perform_action(), Some(visible.id));
        assert_eq!(shown.await.unwrap(), NotificationResult::ActionPerformed);
    }

    #[tokio::test(start_paused = true)]
    async fn perform_action_without_label_is_ignored() {
        let host = host();
        let _shown = tokio::spawn({
            let host = Arc::clone(&host);
            async move {
                host.show(NotificationRequest::new(
                    "plain",
                    NotificationDuration::Indefinite,
                ))
                .await
            }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(host.perform_action(), None);
        assert!(host.current().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn queued_requests_show_in_order() {
        let host = host();
        let mut events = host.subscribe();
        let first = tokio::spawn({
            let host = Arc::clone(&host);
            async move { host.show(undo("first")).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = tokio::spawn({
            let host = Arc::clone(&host);
            async move { host.show(undo("second")).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(host.current().unwrap().message, "first");
        assert!(host.dismiss_current());
        assert_eq!(first.await.unwrap(), NotificationResult::Dismissed);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(host.current().unwrap().message, "second");
        assert_eq!(second.await.unwrap(), NotificationResult::Dismissed);

        let mut shown = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let NotificationEvent::Shown(visible) = event {
                shown.push(visible.message);
            }
        }
        assert_eq!(shown, vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_show_clears_visible_notification() {
        let host = host();
        let shown = tokio::spawn({
            let host = Arc::clone(&host);
            async move { host.show(undo("Deleted Bill")).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(host.current().is_some());

        shown.abort();
        let _ = shown.await;
        assert!(host.current().is_none());
    }
}
