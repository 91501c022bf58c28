//! # SoundGate Intake Pipeline
//!
//! Client-side audio file intake: collects files from drop and picker
//! events (recursively expanding dropped directory trees), classifies
//! each file by its leading byte signature, and gates downstream
//! consumers (preview renderer, path display, error display) on an
//! aggregated validation result.
//!
//! The host UI owns layout, styling, and rendering; this crate owns the
//! pipeline. Platform file access is abstracted behind
//! [`types::ByteSource`] and [`types::DirectoryReader`], with
//! filesystem-backed implementations provided for native hosts and
//! tests.

pub mod display;
pub mod params;
pub mod preview;
pub mod services;
pub mod types;
pub mod zone;

pub use soundgate_common::{Error, Result};

pub use crate::services::{AudioKind, EntryCollector, IntakeValidator};
pub use crate::types::{Entry, FileHandle, UploadEvent, UploadRole, ValidationResult};
pub use crate::zone::{DropZoneController, UploadOutcome};
