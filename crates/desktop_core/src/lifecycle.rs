//! Animation-gated window lifecycle control.
//!
//! [`WindowController`] wraps the [`WindowRegistry`] and defers the actual
//! minimize/restore/close commits until the gating animation reports
//! completion, so window content never disappears before its animation
//! plays. Capture failures abort back to the prior stable state.

use std::collections::HashMap;

use crate::genie::{
    CapturedBitmap, GenieDirection, GenieEvent, GenieSpeed, GenieStep, GenieTransition,
};
use crate::model::{WindowId, WindowLifecycle};
use crate::registry::WindowRegistry;

/// Window registry plus in-flight genie transitions and retained captures.
#[derive(Debug, Default)]
pub struct WindowController {
    registry: WindowRegistry,
    transitions: HashMap<WindowId, GenieTransition>,
    captures: HashMap<WindowId, CapturedBitmap>,
}

#[derive(Debug, Clone, PartialEq)]
/// How a restore request starts.
pub enum RestoreStart {
    /// An expand animation was created; drive it with the returned first step.
    Animated(GenieStep),
    /// No bitmap was retained (collapse capture failed); the restore was
    /// committed immediately.
    Immediate,
    /// The window cannot be restored right now.
    Ignored,
}

impl WindowController {
    /// Read access to the underlying registry.
    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    /// Mutable access for operations that need no animation gating
    /// (open, focus, zoom, interactive move/resize).
    pub fn registry_mut(&mut self) -> &mut WindowRegistry {
        &mut self.registry
    }

    /// Begins a minimize: marks the window `Minimizing` and creates the
    /// collapse transition. Returns `false` when the window is missing or
    /// not in a stable open state.
    pub fn request_minimize(&mut self, id: WindowId, speed: GenieSpeed) -> bool {
        let Some(window) = self.registry.window(id) else {
            return false;
        };
        if window.lifecycle != WindowLifecycle::Open {
            return false;
        }
        self.registry.mark_lifecycle(id, WindowLifecycle::Minimizing);
        self.transitions.insert(id, GenieTransition::collapse(speed));
        true
    }

    /// Begins a restore. With a retained bitmap this creates the expand
    /// transition and marks the window `Restoring`; without one the restore
    /// commits immediately.
    pub fn request_restore(&mut self, id: WindowId, speed: GenieSpeed) -> RestoreStart {
        let Some(window) = self.registry.window(id) else {
            return RestoreStart::Ignored;
        };
        if window.lifecycle != WindowLifecycle::Minimized {
            return RestoreStart::Ignored;
        }
        match self.captures.remove(&id) {
            Some(bitmap) => {
                self.registry.mark_lifecycle(id, WindowLifecycle::Restoring);
                let mut transition = GenieTransition::expand(bitmap, speed);
                let first = transition.start();
                self.transitions.insert(id, transition);
                RestoreStart::Animated(first)
            }
            None => {
                self.registry.restore(id);
                RestoreStart::Immediate
            }
        }
    }

    /// Begins a close fade; the removal commits in [`Self::close_finished`].
    pub fn request_close(&mut self, id: WindowId) -> bool {
        let Some(window) = self.registry.window(id) else {
            return false;
        };
        if window.lifecycle == WindowLifecycle::Closing {
            return false;
        }
        self.registry.mark_lifecycle(id, WindowLifecycle::Closing);
        true
    }

    /// Commits a finished close fade.
    pub fn close_finished(&mut self, id: WindowId) {
        if self
            .registry
            .window(id)
            .map(|w| w.lifecycle == WindowLifecycle::Closing)
            .unwrap_or(false)
        {
            self.captures.remove(&id);
            self.registry.close(id);
        }
    }

    /// Delivers a successful capture to the window's transition.
    pub fn capture_ready(&mut self, id: WindowId, bitmap: CapturedBitmap) -> GenieStep {
        self.dispatch(id, GenieEvent::CaptureReady(bitmap))
    }

    /// Delivers a failed capture; the transition aborts and the window keeps
    /// its prior visible state.
    pub fn capture_failed(&mut self, id: WindowId) -> GenieStep {
        self.dispatch(id, GenieEvent::CaptureFailed)
    }

    /// Delivers a phase-timer completion to the window's transition.
    pub fn phase_finished(&mut self, id: WindowId) -> GenieStep {
        self.dispatch(id, GenieEvent::PhaseFinished)
    }

    /// The transition currently animating `id`, if any.
    pub fn transition(&self, id: WindowId) -> Option<&GenieTransition> {
        self.transitions.get(&id)
    }

    /// The bitmap retained for a minimized window's dock thumbnail.
    pub fn captured_thumbnail(&self, id: WindowId) -> Option<&CapturedBitmap> {
        self.captures.get(&id)
    }

    fn dispatch(&mut self, id: WindowId, event: GenieEvent) -> GenieStep {
        let Some(transition) = self.transitions.get_mut(&id) else {
            return GenieStep::Ignored;
        };
        let direction = transition.direction();
        let step = transition.handle(event);
        match &step {
            GenieStep::Complete { bitmap } => {
                self.transitions.remove(&id);
                match direction {
                    GenieDirection::Collapse => {
                        if !bitmap.is_empty() {
                            self.captures.insert(id, bitmap.clone());
                        }
                        self.registry.minimize(id);
                    }
                    GenieDirection::Expand => {
                        self.registry.restore(id);
                    }
                }
            }
            GenieStep::Abort => {
                self.transitions.remove(&id);
                match direction {
                    GenieDirection::Collapse => {
                        self.registry.mark_lifecycle(id, WindowLifecycle::Open);
                    }
                    GenieDirection::Expand => {
                        self.registry.mark_lifecycle(id, WindowLifecycle::Minimized);
                    }
                }
            }
            GenieStep::RunPhase(_) | GenieStep::Ignored => {}
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::genie::GeniePhase;
    use crate::model::AppId;

    fn bitmap() -> CapturedBitmap {
        CapturedBitmap {
            width: 540,
            height: 380,
            data_url: "data:image/png;base64,abc".to_string(),
        }
    }

    fn controller_with_window() -> (WindowController, WindowId) {
        let mut controller = WindowController::default();
        let id = controller
            .registry_mut()
            .open(AppId::trusted("shell.finder"), "Finder");
        (controller, id)
    }

    fn drain_phases(controller: &mut WindowController, id: WindowId) -> GenieStep {
        loop {
            match controller.phase_finished(id) {
                GenieStep::RunPhase(_) => continue,
                other => return other,
            }
        }
    }

    #[test]
    fn minimize_commits_only_after_all_phases_finish() {
        let (mut controller, id) = controller_with_window();
        assert!(controller.request_minimize(id, GenieSpeed::Normal));
        assert_eq!(
            controller.registry().window(id).unwrap().lifecycle,
            WindowLifecycle::Minimizing
        );

        let GenieStep::RunPhase(first) = controller.capture_ready(id, bitmap()) else {
            panic!("expected first phase");
        };
        assert_eq!(first.phase, GeniePhase::Pinch);
        // Still visible until the final phase lands.
        assert_eq!(controller.registry().visible_windows().count(), 1);

        let step = drain_phases(&mut controller, id);
        assert_eq!(step, GenieStep::Complete { bitmap: bitmap() });
        assert_eq!(
            controller.registry().window(id).unwrap().lifecycle,
            WindowLifecycle::Minimized
        );
        assert_eq!(controller.registry().focused_id(), None);
        assert_eq!(controller.captured_thumbnail(id), Some(&bitmap()));
    }

    #[test]
    fn capture_failure_leaves_window_open_and_completion_empty_handed() {
        let (mut controller, id) = controller_with_window();
        assert!(controller.request_minimize(id, GenieSpeed::Normal));
        assert_eq!(controller.capture_failed(id), GenieStep::Abort);
        assert_eq!(
            controller.registry().window(id).unwrap().lifecycle,
            WindowLifecycle::Open
        );
        assert_eq!(controller.captured_thumbnail(id), None);
        assert_eq!(controller.transition(id), None);
    }

    #[test]
    fn restore_replays_the_retained_bitmap_and_commits_on_completion() {
        let (mut controller, id) = controller_with_window();
        controller.request_minimize(id, GenieSpeed::Normal);
        controller.capture_ready(id, bitmap());
        drain_phases(&mut controller, id);

        let start = controller.request_restore(id, GenieSpeed::Normal);
        let RestoreStart::Animated(GenieStep::RunPhase(first)) = start else {
            panic!("expected animated restore, got {start:?}");
        };
        assert_eq!(first.phase, GeniePhase::Slide);
        assert_eq!(
            controller.registry().window(id).unwrap().lifecycle,
            WindowLifecycle::Restoring
        );

        drain_phases(&mut controller, id);
        let window = controller.registry().window(id).unwrap();
        assert_eq!(window.lifecycle, WindowLifecycle::Open);
        assert_eq!(controller.registry().focused_id(), Some(id));
    }

    #[test]
    fn restore_without_retained_bitmap_commits_immediately() {
        let (mut controller, id) = controller_with_window();
        controller.registry_mut().minimize(id);
        assert_eq!(
            controller.request_restore(id, GenieSpeed::Normal),
            RestoreStart::Immediate
        );
        assert_eq!(
            controller.registry().window(id).unwrap().lifecycle,
            WindowLifecycle::Open
        );
    }

    #[test]
    fn close_commits_on_fade_completion_only() {
        let (mut controller, id) = controller_with_window();
        assert!(controller.request_close(id));
        assert!(controller.registry().window(id).is_some());
        controller.close_finished(id);
        assert!(controller.registry().window(id).is_none());
    }

    #[test]
    fn duplicate_minimize_requests_are_rejected_mid_flight() {
        let (mut controller, id) = controller_with_window();
        assert!(controller.request_minimize(id, GenieSpeed::Normal));
        assert!(!controller.request_minimize(id, GenieSpeed::Normal));
        assert_eq!(controller.request_restore(id, GenieSpeed::Normal), RestoreStart::Ignored);
    }
}
