//! Drop-zone controller
//!
//! One controller per upload surface. Owns the surface's drag state and
//! displayed error list, runs the collect → validate pipeline for
//! upload events, dispatches text-input checks, and broadcasts outcomes
//! over the EventBus for the host's renderers.

use crate::params::{
    check_amplitude, check_offset, check_path, parameter_of, ParameterCheck, ParameterLine,
};
use crate::services::{merge_errors, EntryCollector, IntakeValidator};
use crate::types::{FileHandle, UploadEvent, UploadRole};
use soundgate_common::events::{EventBus, EventOrigin, IntakeEvent, Parameter};
use tracing::{info, warn};
use uuid::Uuid;

/// Validation lifecycle of one upload surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZoneState {
    Idle,
    Validating,
}

/// Outcome of handling one upload event
#[derive(Debug)]
pub enum UploadOutcome {
    /// A validation was already in flight; the event was dropped
    Ignored,
    /// Validation passed; files are ready for preview and path display
    Accepted {
        session_id: Uuid,
        files: Vec<FileHandle>,
    },
    /// Validation failed; `errors` is the full list for the role's
    /// container, `clear_selection` tells the host to reset its picker
    Rejected {
        session_id: Uuid,
        errors: Vec<String>,
        clear_selection: bool,
    },
}

/// Controller for one drop-zone / picker surface
pub struct DropZoneController {
    zone_id: Uuid,
    role: UploadRole,
    bus: EventBus,
    collector: EntryCollector,
    validator: IntakeValidator,
    state: ZoneState,
    drag_active: bool,
    displayed_errors: Vec<String>,
    line: ParameterLine,
}

impl DropZoneController {
    pub fn new(role: UploadRole, bus: EventBus) -> Self {
        let collector = EntryCollector::with_bus(bus.clone());
        Self {
            zone_id: Uuid::new_v4(),
            role,
            bus,
            collector,
            validator: IntakeValidator::new(),
            state: ZoneState::Idle,
            drag_active: false,
            displayed_errors: Vec::new(),
            line: ParameterLine::default(),
        }
    }

    pub fn zone_id(&self) -> Uuid {
        self.zone_id
    }

    pub fn role(&self) -> UploadRole {
        self.role
    }

    /// Errors currently rendered in this surface's container
    pub fn displayed_errors(&self) -> &[String] {
        &self.displayed_errors
    }

    /// Parameter line accumulated for this surface's role
    pub fn line(&self) -> &ParameterLine {
        &self.line
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// Drag entered the zone
    ///
    /// Repeated drag-over notifications within one gesture are
    /// suppressed; only the first emits an event.
    pub fn drag_entered(&mut self) {
        if self.drag_active {
            return;
        }
        self.drag_active = true;
        self.bus.emit_lossy(IntakeEvent::DragEntered {
            zone_id: self.zone_id,
            timestamp: chrono::Utc::now(),
        });
    }

    /// Drag left the zone without dropping
    pub fn drag_left(&mut self) {
        self.drag_active = false;
        self.bus.emit_lossy(IntakeEvent::DragCleared {
            zone_id: self.zone_id,
            timestamp: chrono::Utc::now(),
        });
    }

    /// Run the intake pipeline for one upload event
    ///
    /// Overlapping events are not supported: while a validation is in
    /// flight, further upload events for this zone are ignored rather
    /// than superseding it.
    pub async fn handle_upload(&mut self, event: UploadEvent) -> UploadOutcome {
        if self.state == ZoneState::Validating {
            warn!(zone = %self.zone_id, "Upload event ignored: validation already in flight");
            return UploadOutcome::Ignored;
        }

        let origin = event.origin();
        let session_id = Uuid::new_v4();
        self.state = ZoneState::Validating;
        self.bus.emit_lossy(IntakeEvent::IntakeStarted {
            session_id,
            zone_id: self.zone_id,
            role: self.role,
            origin,
            timestamp: chrono::Utc::now(),
        });

        let files = self.collector.collect(event).await;
        let result = self.validator.validate(self.role, files).await;

        // A completed drop always clears the drag state.
        if origin == EventOrigin::Drop && self.drag_active {
            self.drag_left();
        }
        self.state = ZoneState::Idle;

        if result.is_accepted() {
            self.displayed_errors.clear();
            let files = result.files().to_vec();
            self.bus.emit_lossy(IntakeEvent::IntakeAccepted {
                session_id,
                role: self.role,
                file_names: files.iter().map(|f| f.name.clone()).collect(),
                timestamp: chrono::Utc::now(),
            });
            UploadOutcome::Accepted { session_id, files }
        } else {
            self.displayed_errors = merge_errors(&self.displayed_errors, result.errors());
            let clear_selection = origin == EventOrigin::Picker;
            self.bus.emit_lossy(IntakeEvent::IntakeRejected {
                session_id,
                role: self.role,
                errors: self.displayed_errors.clone(),
                clear_selection,
                timestamp: chrono::Utc::now(),
            });
            UploadOutcome::Rejected {
                session_id,
                errors: self.displayed_errors.clone(),
                clear_selection,
            }
        }
    }

    /// Check a text-input parameter and fold it into the role's line
    ///
    /// Dispatch is an exhaustive match on [`Parameter`]; file uploads go
    /// through [`handle_upload`](Self::handle_upload) instead.
    pub fn handle_parameter(&mut self, parameter: Parameter, raw: &str) -> ParameterCheck {
        let check = match parameter {
            Parameter::Path => check_path(raw),
            Parameter::Amplitude => check_amplitude(raw),
            Parameter::Offset => check_offset(raw),
            Parameter::File => {
                warn!(zone = %self.zone_id, "File parameters are validated as upload events");
                return ParameterCheck::default();
            }
        };

        if let Some(value) = &check.value {
            self.line.set(value.clone());
            self.bus.emit_lossy(IntakeEvent::ParameterSet {
                role: self.role,
                parameter: parameter_of(value),
                timestamp: chrono::Utc::now(),
            });
            if self.line.is_ready() {
                let line = self.line.as_json();
                info!(role = %self.role, line = %line, "Parameter line ready");
                self.bus.emit_lossy(IntakeEvent::LineReady {
                    role: self.role,
                    line,
                    timestamp: chrono::Utc::now(),
                });
            }
        }
        check
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{AUDIO_TYPE_ERROR, TARGET_CARDINALITY_ERROR};

    fn wav(name: &str) -> FileHandle {
        FileHandle::from_bytes(name, b"RIFF0000WAVE".to_vec())
    }

    fn controller(role: UploadRole) -> DropZoneController {
        DropZoneController::new(role, EventBus::new(64))
    }

    #[tokio::test]
    async fn accepted_picker_upload_clears_errors() {
        let mut zone = controller(UploadRole::Target);

        // First attempt fails and populates the container.
        let outcome = zone
            .handle_upload(UploadEvent::Picker {
                files: vec![FileHandle::from_bytes("bad.wav", b"junk".to_vec())],
            })
            .await;
        match outcome {
            UploadOutcome::Rejected {
                errors,
                clear_selection,
                ..
            } => {
                assert_eq!(errors, [AUDIO_TYPE_ERROR]);
                assert!(clear_selection, "picker rejections clear the input");
            }
            other => panic!("expected rejection, got {:?}", other),
        }

        // Second attempt succeeds and clears the container.
        let outcome = zone
            .handle_upload(UploadEvent::Picker {
                files: vec![wav("good.wav")],
            })
            .await;
        assert!(matches!(outcome, UploadOutcome::Accepted { .. }));
        assert!(zone.displayed_errors().is_empty());
    }

    #[tokio::test]
    async fn drop_rejection_does_not_clear_selection() {
        let mut zone = controller(UploadRole::Target);
        let outcome = zone
            .handle_upload(UploadEvent::Drop {
                files: vec![
                    FileHandle::from_bytes("a.txt", b"aaaa".to_vec()),
                ],
                items: Vec::new(),
            })
            .await;
        match outcome {
            UploadOutcome::Rejected {
                clear_selection, ..
            } => assert!(!clear_selection, "drops have no input to clear"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn revalidation_does_not_stack_duplicate_errors() {
        let mut zone = controller(UploadRole::Target);
        let bad = || UploadEvent::Picker {
            files: vec![
                FileHandle::from_bytes("a.txt", b"aaaa".to_vec()),
                FileHandle::from_bytes("b.txt", b"bbbb".to_vec()),
            ],
        };

        zone.handle_upload(bad()).await;
        zone.handle_upload(bad()).await;

        assert_eq!(
            zone.displayed_errors(),
            [TARGET_CARDINALITY_ERROR, AUDIO_TYPE_ERROR]
        );
    }

    #[tokio::test]
    async fn new_distinct_error_appends_after_existing() {
        let mut zone = controller(UploadRole::Target);

        // Type error first.
        zone.handle_upload(UploadEvent::Picker {
            files: vec![FileHandle::from_bytes("a.txt", b"aaaa".to_vec())],
        })
        .await;
        assert_eq!(zone.displayed_errors(), [AUDIO_TYPE_ERROR]);

        // Cardinality joins on the next attempt, appended after.
        zone.handle_upload(UploadEvent::Picker {
            files: vec![wav("a.wav"), FileHandle::from_bytes("b.txt", b"bbbb".to_vec())],
        })
        .await;
        assert_eq!(
            zone.displayed_errors(),
            [AUDIO_TYPE_ERROR, TARGET_CARDINALITY_ERROR]
        );
    }

    #[test]
    fn drag_enter_is_suppressed_while_active() {
        let bus = EventBus::new(64);
        let mut rx = bus.subscribe();
        let mut zone = DropZoneController::new(UploadRole::Other, bus);

        zone.drag_entered();
        zone.drag_entered();
        zone.drag_entered();
        zone.drag_left();

        assert!(matches!(rx.try_recv(), Ok(IntakeEvent::DragEntered { .. })));
        assert!(matches!(rx.try_recv(), Ok(IntakeEvent::DragCleared { .. })));
        assert!(rx.try_recv().is_err(), "duplicate drag-enters are suppressed");
    }

    #[tokio::test]
    async fn parameters_assemble_a_line_once_path_is_set() {
        let bus = EventBus::new(64);
        let mut rx = bus.subscribe();
        let mut zone = DropZoneController::new(UploadRole::Target, bus);

        assert!(zone.handle_parameter(Parameter::Amplitude, "-6").is_valid());
        assert!(!zone.line().is_ready());

        assert!(zone
            .handle_parameter(Parameter::Path, "/music/target.wav")
            .is_valid());
        assert!(zone.line().is_ready());

        let mut saw_line_ready = false;
        while let Ok(event) = rx.try_recv() {
            if let IntakeEvent::LineReady { line, .. } = event {
                assert_eq!(line["path"], "/music/target.wav");
                assert_eq!(line["amplitude"], -6.0);
                saw_line_ready = true;
            }
        }
        assert!(saw_line_ready);
    }

    #[tokio::test]
    async fn invalid_parameter_reports_errors_without_touching_line() {
        let mut zone = controller(UploadRole::Target);
        let check = zone.handle_parameter(Parameter::Offset, "eleven");
        assert!(!check.is_valid());
        assert!(!zone.line().is_ready());
    }
}
