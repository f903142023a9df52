//! # Observer Hub
//!
//! Registry of connected observers and the fan-out of change events.
//!
//! Delivery is fire-and-forget. Each event is serialized once and handed to
//! every registered observer; an observer that is closed, or whose channel
//! rejects the message, is skipped without affecting the others. Nothing
//! here blocks on an observer, so the transport behind `Observer::deliver`
//! must be non-blocking or buffered.

use crate::node::{ComponentNode, NodePatch, Page};
use crate::{ObserverId, PagecastError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

// =============================================================================
// OBSERVER TRAIT
// =============================================================================

/// A connected receiver of broadcast events.
///
/// Implemented by transport adapters (e.g. a WebSocket connection's
/// outbound queue).
pub trait Observer: Send + Sync {
    /// Whether the channel can still accept messages.
    fn is_open(&self) -> bool;

    /// Hand one serialized event to the channel without blocking.
    fn deliver(&self, message: &str) -> Result<(), PagecastError>;
}

// =============================================================================
// EVENTS
// =============================================================================

/// Payload of a `component_update` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUpdate {
    pub component_id: String,
    pub updates: NodePatch,
}

/// An interaction reported by a viewer, e.g. a button click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    pub event_name: String,
    pub component_id: String,
    /// Milliseconds since the Unix epoch, stamped on receipt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// Envelope exchanged with observers: `{ "type": ..., "payload": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ObserverEvent {
    /// Full page snapshot.
    PageUpdate(Page),
    ComponentUpdate(ComponentUpdate),
    ComponentAdd(ComponentNode),
    /// ID of the removed component.
    ComponentRemove(String),
    /// Inbound only: a viewer interaction.
    ComponentEvent(InteractionEvent),
}

impl ObserverEvent {
    /// Snapshot event for `page`.
    #[must_use]
    pub fn snapshot(page: &Page) -> Self {
        Self::PageUpdate(page.clone())
    }

    /// Wire name of the event type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::PageUpdate(_) => "page_update",
            Self::ComponentUpdate(_) => "component_update",
            Self::ComponentAdd(_) => "component_add",
            Self::ComponentRemove(_) => "component_remove",
            Self::ComponentEvent(_) => "component_event",
        }
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> Result<String, PagecastError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub skipped: usize,
}

// =============================================================================
// HUB
// =============================================================================

/// Set of registered observers.
#[derive(Default)]
pub struct ObserverHub {
    observers: BTreeMap<ObserverId, Box<dyn Observer>>,
    next_id: u64,
}

impl std::fmt::Debug for ObserverHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverHub")
            .field("observers", &self.observers.keys().collect::<Vec<_>>())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl ObserverHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// True when no observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Number of registered observers whose channel is still open.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.observers.values().filter(|o| o.is_open()).count()
    }

    /// Add `observer` and send it a snapshot of `active_page`.
    ///
    /// The snapshot is delivered before this returns, so it precedes any
    /// later broadcast. A failed snapshot delivery does not prevent
    /// registration; the observer will be skipped while closed.
    pub fn register(
        &mut self,
        observer: Box<dyn Observer>,
        active_page: &Page,
    ) -> Result<ObserverId, PagecastError> {
        let snapshot = ObserverEvent::snapshot(active_page).to_json()?;

        self.next_id += 1;
        let id = ObserverId(self.next_id);

        if let Err(e) = observer.deliver(&snapshot) {
            tracing::debug!(observer = %id, error = %e, "initial snapshot not delivered");
        }
        self.observers.insert(id, observer);

        tracing::info!(
            observer = %id,
            connected = self.observers.len(),
            page = %active_page.id,
            "observer registered"
        );
        Ok(id)
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn deregister(&mut self, id: ObserverId) -> bool {
        let removed = self.observers.remove(&id).is_some();
        if removed {
            tracing::info!(observer = %id, connected = self.observers.len(), "observer deregistered");
        }
        removed
    }

    /// Deliver `event` to every open observer.
    ///
    /// Closed or failing observers are skipped; the failure is never
    /// surfaced to the caller.
    pub fn broadcast(&self, event: &ObserverEvent) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        let message = match event.to_json() {
            Ok(m) => m,
            Err(e) => {
                tracing::error!(event = event.type_name(), error = %e, "event serialization failed");
                report.skipped = self.observers.len();
                return report;
            }
        };

        for (id, observer) in &self.observers {
            if !observer.is_open() {
                report.skipped += 1;
                continue;
            }
            match observer.deliver(&message) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::debug!(observer = %id, error = %e, "delivery skipped");
                    report.skipped += 1;
                }
            }
        }

        tracing::debug!(
            event = event.type_name(),
            delivered = report.delivered,
            skipped = report.skipped,
            "broadcast"
        );
        report
    }

    /// Handle a message sent by an observer.
    ///
    /// `component_event` messages are stamped and logged; other event types
    /// are ignored. Malformed JSON is a bad request.
    pub fn handle_inbound(
        &self,
        id: ObserverId,
        text: &str,
    ) -> Result<Option<InteractionEvent>, PagecastError> {
        let event: ObserverEvent = serde_json::from_str(text).map_err(|e| {
            PagecastError::BadRequest(format!("unreadable observer message: {}", e))
        })?;

        match event {
            ObserverEvent::ComponentEvent(mut interaction) => {
                interaction.timestamp = Some(now_millis());
                tracing::info!(
                    observer = %id,
                    event_name = %interaction.event_name,
                    component_id = %interaction.component_id,
                    "component interaction"
                );
                Ok(Some(interaction))
            }
            other => {
                tracing::debug!(observer = %id, event = other.type_name(), "ignoring inbound event");
                Ok(None)
            }
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed_page;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        messages: Arc<Mutex<Vec<String>>>,
        closed: Arc<AtomicBool>,
    }

    impl Recorder {
        fn received(&self) -> Vec<ObserverEvent> {
            self.messages
                .lock()
                .expect("lock")
                .iter()
                .map(|m| serde_json::from_str(m).expect("event json"))
                .collect()
        }

        fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    impl Observer for Recorder {
        fn is_open(&self) -> bool {
            !self.closed.load(Ordering::SeqCst)
        }

        fn deliver(&self, message: &str) -> Result<(), PagecastError> {
            self.messages.lock().expect("lock").push(message.to_string());
            Ok(())
        }
    }

    struct Broken;

    impl Observer for Broken {
        fn is_open(&self) -> bool {
            true
        }

        fn deliver(&self, _message: &str) -> Result<(), PagecastError> {
            Err(PagecastError::TransportFault("pipe closed".to_string()))
        }
    }

    #[test]
    fn register_sends_exactly_one_snapshot() {
        let page = seed_page();
        let mut hub = ObserverHub::new();
        let rec = Recorder::default();

        hub.register(Box::new(rec.clone()), &page).expect("register");

        assert_eq!(rec.received(), vec![ObserverEvent::PageUpdate(page)]);
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn broadcast_skips_closed_observers() {
        let page = seed_page();
        let mut hub = ObserverHub::new();
        let open = Recorder::default();
        let closed = Recorder::default();
        hub.register(Box::new(open.clone()), &page).expect("register");
        hub.register(Box::new(closed.clone()), &page).expect("register");
        closed.close();

        let report = hub.broadcast(&ObserverEvent::ComponentRemove("x".into()));

        assert_eq!(report, BroadcastReport { delivered: 1, skipped: 1 });
        assert_eq!(open.received().len(), 2);
        assert_eq!(closed.received().len(), 1);
        assert_eq!(hub.len(), 2);
        assert_eq!(hub.open_count(), 1);
    }

    #[test]
    fn broadcast_survives_a_failing_channel() {
        let page = seed_page();
        let mut hub = ObserverHub::new();
        hub.register(Box::new(Broken), &page).expect("register");
        let rec = Recorder::default();
        hub.register(Box::new(rec.clone()), &page).expect("register");

        let report = hub.broadcast(&ObserverEvent::ComponentRemove("x".into()));

        assert_eq!(report.delivered, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(rec.received().len(), 2);
    }

    #[test]
    fn deregister_is_idempotent() {
        let mut hub = ObserverHub::new();
        let id = hub
            .register(Box::new(Recorder::default()), &seed_page())
            .expect("register");
        assert!(hub.deregister(id));
        assert!(!hub.deregister(id));
        assert!(hub.is_empty());
    }

    #[test]
    fn event_envelope_shape() {
        let json = ObserverEvent::ComponentRemove("abc".into())
            .to_json()
            .expect("json");
        assert_eq!(json, r#"{"type":"component_remove","payload":"abc"}"#);
    }

    #[test]
    fn inbound_component_event_is_stamped() {
        let hub = ObserverHub::new();
        let msg = r#"{"type":"component_event","payload":{"eventName":"click","componentId":"demo-button"}}"#;
        let event = hub
            .handle_inbound(ObserverId(1), msg)
            .expect("parse")
            .expect("interaction");
        assert_eq!(event.event_name, "click");
        assert_eq!(event.component_id, "demo-button");
        assert!(event.timestamp.is_some());
    }

    #[test]
    fn inbound_other_events_are_ignored_and_garbage_rejected() {
        let hub = ObserverHub::new();
        let ignored = hub
            .handle_inbound(ObserverId(1), r#"{"type":"component_remove","payload":"x"}"#)
            .expect("parse");
        assert!(ignored.is_none());

        let err = hub.handle_inbound(ObserverId(1), "not json").expect_err("garbage");
        assert!(matches!(err, PagecastError::BadRequest(_)));
    }
}
