//! Typed host-domain contracts for the desktop shell.
//!
//! This crate is the API-first boundary between the interaction core and the
//! browser: desktop snapshot persistence, interface sounds, window bitmap
//! capture, and icon timestamps. Concrete DOM-backed adapters live in
//! `shell_runtime`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod capture;
pub mod sound;
pub mod storage;
pub mod time;

pub use capture::{CaptureFuture, CaptureService, NoopCaptureService, StubCaptureService};
pub use sound::{MemorySoundService, NoopSoundService, SoundService};
pub use storage::{
    load_desktop_snapshot, save_desktop_snapshot, MemoryRecordStore, RecordStore,
    RecordStoreFuture, DESKTOP_RECORD_KEY,
};
pub use time::icon_timestamp_ms;
