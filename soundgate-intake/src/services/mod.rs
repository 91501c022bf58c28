//! Intake pipeline services
//!
//! Entry collection, signature classification, and validation. The
//! drop-zone controller wires these together per upload event.

pub mod entry_collector;
pub mod intake_validator;
pub mod type_classifier;

pub use entry_collector::{
    drop_event_from_paths, picker_event_from_paths, EntryCollector, FsDirectoryReader,
};
pub use intake_validator::{
    merge_errors, IntakeValidator, AUDIO_TYPE_ERROR, TARGET_CARDINALITY_ERROR,
};
pub use type_classifier::{classify, classify_or_unknown, AudioKind, SIGNATURE_LEN};
