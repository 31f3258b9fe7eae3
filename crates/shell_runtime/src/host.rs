//! Host service bundle and effect execution for the shell runtime.
//!
//! Keeps interaction-core semantics unchanged while moving effect execution
//! and viewport queries behind a typed boundary that can be injected and
//! mocked.

use std::rc::Rc;

use desktop_core::geometry::Rect;
use desktop_core::ShellEffect;
use leptos::{logging, spawn_local};
use shell_host::{CaptureService, RecordStore, SoundService};

use crate::adapters::{AudioSoundService, DomCaptureService, LocalRecordStore};

#[derive(Clone)]
/// Host service bundle for shell runtime side effects.
pub struct ShellHostContext {
    records: Rc<dyn RecordStore>,
    sounds: Rc<dyn SoundService>,
    capture: Rc<dyn CaptureService>,
}

impl Default for ShellHostContext {
    fn default() -> Self {
        Self {
            records: Rc::new(LocalRecordStore),
            sounds: Rc::new(AudioSoundService),
            capture: Rc::new(DomCaptureService),
        }
    }
}

impl ShellHostContext {
    /// Builds a bundle from explicit services (tests, alternate hosts).
    pub fn new(
        records: Rc<dyn RecordStore>,
        sounds: Rc<dyn SoundService>,
        capture: Rc<dyn CaptureService>,
    ) -> Self {
        Self {
            records,
            sounds,
            capture,
        }
    }

    /// Returns the configured record persistence service.
    pub fn record_store(&self) -> Rc<dyn RecordStore> {
        self.records.clone()
    }

    /// Returns the configured interface sound service.
    pub fn sound_service(&self) -> Rc<dyn SoundService> {
        self.sounds.clone()
    }

    /// Returns the configured window capture service.
    pub fn capture_service(&self) -> Rc<dyn CaptureService> {
        self.capture.clone()
    }

    /// Executes a single [`ShellEffect`] emitted by the interaction core.
    ///
    /// `snapshot` carries the desktop payload for persistence effects; other
    /// effects ignore it.
    pub fn run_effect(&self, effect: ShellEffect, snapshot: Option<&desktop_core::DesktopSnapshot>) {
        match effect {
            ShellEffect::PersistDesktop => {
                let Some(snapshot) = snapshot.cloned() else {
                    return;
                };
                let host = self.clone();
                spawn_local(async move {
                    if let Err(err) =
                        shell_host::save_desktop_snapshot(host.record_store().as_ref(), &snapshot)
                            .await
                    {
                        logging::warn!("persist desktop snapshot failed: {err}");
                    }
                });
            }
            ShellEffect::PlaySound(name) => self.sounds.play(name),
        }
    }

    /// Returns the current desktop viewport rect available to the shell.
    pub fn viewport_rect(&self) -> Rect {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                let w = window
                    .inner_width()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(1280.0) as i32;
                let h = window
                    .inner_height()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(800.0) as i32;
                return Rect::new(0, 0, w.max(1), h.max(1));
            }
            Rect::new(0, 0, 1280, 800)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Rect::new(0, 0, 1280, 800)
        }
    }
}
