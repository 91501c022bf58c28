//! Event types for the SoundGate event system
//!
//! Provides shared event definitions and the EventBus used to notify
//! consumers (preview renderer, path display, error display) of intake
//! outcomes.

mod shared_types;

pub use shared_types::{EventOrigin, Parameter, UploadRole};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// SoundGate event types
///
/// Events are broadcast via the EventBus and can be serialized for
/// transmission to a host UI. All events use this central enum for type
/// safety and exhaustive matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IntakeEvent {
    /// Drag entered a drop-zone
    ///
    /// Emitted once per drag gesture; repeated drag-over notifications
    /// are suppressed by the controller's drag state.
    DragEntered {
        /// Drop-zone that observed the drag
        zone_id: Uuid,
        /// When the drag entered
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Drag left a drop-zone or a drop completed
    DragCleared {
        /// Drop-zone whose drag state was reset
        zone_id: Uuid,
        /// When the drag state cleared
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An upload event entered validation
    IntakeStarted {
        /// Validation session UUID
        session_id: Uuid,
        /// Drop-zone handling the upload
        zone_id: Uuid,
        /// Role of the upload surface
        role: UploadRole,
        /// Whether the upload came from a picker or a drop
        origin: EventOrigin,
        /// When validation started
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An entry could not be resolved during directory traversal
    ///
    /// Soft condition: the entry contributes zero files and the
    /// traversal continues.
    EntrySkipped {
        /// Name of the unresolvable entry
        name: String,
        /// Human-readable reason
        reason: String,
        /// When the entry was skipped
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Validation accepted the collected files
    ///
    /// Triggers:
    /// - Preview renderer: build one playable element per file
    /// - Path display: populate the placeholder path
    /// - Error display: clear the role's error container
    IntakeAccepted {
        /// Validation session UUID
        session_id: Uuid,
        /// Role of the upload surface
        role: UploadRole,
        /// Names of the accepted files
        file_names: Vec<String>,
        /// When validation completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Validation rejected the collected files
    ///
    /// Triggers:
    /// - Error display: render the (de-duplicated) error list
    /// - Host input: clear the selection when `clear_selection` is set
    IntakeRejected {
        /// Validation session UUID
        session_id: Uuid,
        /// Role of the upload surface
        role: UploadRole,
        /// Full ordered error list for the role's container
        errors: Vec<String>,
        /// Whether the host must clear the picker input's selection
        /// (always false for drop-originated uploads)
        clear_selection: bool,
        /// When validation completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A non-file parameter passed its checks
    ParameterSet {
        /// Role whose line the parameter belongs to
        role: UploadRole,
        /// Which parameter was set
        parameter: Parameter,
        /// When the parameter was accepted
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A role's parameter line is complete enough to hand downstream
    ///
    /// Emitted whenever a parameter is set while the line has a path.
    LineReady {
        /// Role the line belongs to
        role: UploadRole,
        /// Assembled line as JSON
        line: serde_json::Value,
        /// When the line became ready
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus for intake events
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use soundgate_common::events::{EventBus, IntakeEvent};
/// use uuid::Uuid;
///
/// let event_bus = EventBus::new(100);
///
/// // Subscribe to events
/// let mut rx = event_bus.subscribe();
///
/// // Emit an event
/// event_bus.emit_lossy(IntakeEvent::DragEntered {
///     zone_id: Uuid::new_v4(),
///     timestamp: chrono::Utc::now(),
/// });
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<IntakeEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// `capacity` is the number of events buffered before old events are
    /// dropped for lagging subscribers.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Returns a receiver that will receive all events emitted after
    /// subscription. Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<IntakeEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: IntakeEvent,
    ) -> std::result::Result<usize, broadcast::error::SendError<IntakeEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Useful for non-critical events where it's acceptable if no
    /// component is currently listening.
    pub fn emit_lossy(&self, event: IntakeEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Channel capacity this bus was created with
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_reaches_subscriber() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let zone_id = Uuid::new_v4();
        bus.emit(IntakeEvent::DragEntered {
            zone_id,
            timestamp: chrono::Utc::now(),
        })
        .expect("subscriber exists");

        match rx.recv().await {
            Ok(IntakeEvent::DragEntered { zone_id: got, .. }) => assert_eq!(got, zone_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn emit_without_subscribers_is_err_and_lossy_is_silent() {
        let bus = EventBus::new(16);
        let event = IntakeEvent::DragCleared {
            zone_id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
        };
        assert!(bus.emit(event.clone()).is_err());
        bus.emit_lossy(event);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = IntakeEvent::IntakeRejected {
            session_id: Uuid::new_v4(),
            role: UploadRole::Target,
            errors: vec!["Only audio files are accepted.".to_string()],
            clear_selection: true,
            timestamp: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&event).expect("serializable");
        assert_eq!(json["type"], "IntakeRejected");
        assert_eq!(json["role"], "target");
        assert_eq!(json["clear_selection"], true);
    }
}
