//! Canonical window list, z-order allocation, and lifecycle commits.

use crate::geometry::Rect;
use crate::model::{
    AppId, WindowId, WindowLifecycle, WindowRecord, CASCADE_BASE_X, CASCADE_BASE_Y, CASCADE_STEP,
    CASCADE_WRAP, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
    ZOOMED_WINDOW_HEIGHT, ZOOMED_WINDOW_WIDTH,
};

/// Registry of managed windows.
///
/// All mutating operations referencing an unknown window id are silent
/// no-ops: pointer/teardown races routinely deliver events for windows
/// that no longer exist.
///
/// Z-indices come from a monotonically increasing allocator and are never
/// reused for the lifetime of the registry, so a freshly focused window is
/// always strictly above every other window it has ever coexisted with.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRegistry {
    windows: Vec<WindowRecord>,
    focused: Option<WindowId>,
    next_id: u64,
    next_z: u32,
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            focused: None,
            next_id: 1,
            next_z: 1,
        }
    }
}

impl WindowRegistry {
    /// Opens a window for `app`, assigning cascading bounds, the next
    /// z-index, and focus.
    pub fn open(&mut self, app: AppId, title: impl Into<String>) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let cascade = (self.windows.len() as i32 % CASCADE_WRAP) * CASCADE_STEP;
        let record = WindowRecord {
            id,
            app,
            title: title.into(),
            bounds: Rect::new(
                CASCADE_BASE_X + cascade,
                CASCADE_BASE_Y + cascade,
                DEFAULT_WINDOW_WIDTH,
                DEFAULT_WINDOW_HEIGHT,
            ),
            z_index: self.allocate_z(),
            lifecycle: WindowLifecycle::Open,
            zoomed: false,
            saved_bounds: None,
        };
        self.windows.push(record);
        self.focused = Some(id);
        id
    }

    /// Removes the window record.
    ///
    /// Closing the focused window clears focus; no other window is
    /// auto-focused.
    pub fn close(&mut self, id: WindowId) {
        let before = self.windows.len();
        self.windows.retain(|w| w.id != id);
        if self.windows.len() != before && self.focused == Some(id) {
            self.focused = None;
        }
    }

    /// Focuses the window and raises it with a freshly allocated z-index.
    ///
    /// Focusing an already-top window still consumes a new z value: the
    /// ordering outcome is idempotent but the allocator stays monotonic.
    /// Minimized windows cannot take focus.
    pub fn focus(&mut self, id: WindowId) {
        let next_z = self.allocate_z();
        let Some(window) = self.find_mut(id) else {
            return;
        };
        if window.lifecycle == WindowLifecycle::Minimized {
            return;
        }
        window.z_index = next_z;
        self.focused = Some(id);
    }

    /// Commits the minimized state, clearing focus if the window held it.
    pub fn minimize(&mut self, id: WindowId) {
        let Some(window) = self.find_mut(id) else {
            return;
        };
        window.lifecycle = WindowLifecycle::Minimized;
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    /// Commits the open state for a minimized window, raising and focusing it.
    pub fn restore(&mut self, id: WindowId) {
        let next_z = self.allocate_z();
        let Some(window) = self.find_mut(id) else {
            return;
        };
        window.lifecycle = WindowLifecycle::Open;
        window.z_index = next_z;
        self.focused = Some(id);
    }

    /// Toggles between the current bounds and a fixed comfortable size,
    /// saving the pre-zoom bounds so a second zoom restores them exactly.
    pub fn zoom(&mut self, id: WindowId) {
        let Some(window) = self.find_mut(id) else {
            return;
        };
        if window.zoomed {
            if let Some(saved) = window.saved_bounds.take() {
                window.bounds = saved;
            }
            window.zoomed = false;
        } else {
            window.saved_bounds = Some(window.bounds);
            window.bounds = Rect::new(
                window.bounds.x,
                window.bounds.y,
                ZOOMED_WINDOW_WIDTH,
                ZOOMED_WINDOW_HEIGHT,
            );
            window.zoomed = true;
        }
    }

    /// Moves the window frame (interactive drag).
    pub fn update_position(&mut self, id: WindowId, x: i32, y: i32) {
        if let Some(window) = self.find_mut(id) {
            window.bounds.x = x;
            window.bounds.y = y;
        }
    }

    /// Resizes the window frame (interactive resize), enforcing minimums.
    pub fn update_size(&mut self, id: WindowId, w: i32, h: i32) {
        if let Some(window) = self.find_mut(id) {
            window.bounds.w = w.max(MIN_WINDOW_WIDTH);
            window.bounds.h = h.max(MIN_WINDOW_HEIGHT);
        }
    }

    /// Marks an in-flight lifecycle phase without committing its outcome.
    ///
    /// Used by the lifecycle controller for `Minimizing`/`Restoring`/
    /// `Closing` while the gating animation runs.
    pub fn mark_lifecycle(&mut self, id: WindowId, lifecycle: WindowLifecycle) {
        if let Some(window) = self.find_mut(id) {
            window.lifecycle = lifecycle;
        }
    }

    /// Returns the record for `id`, if present.
    pub fn window(&self, id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// Returns all records in creation order.
    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    /// Returns the windows that currently occupy screen space.
    pub fn visible_windows(&self) -> impl Iterator<Item = &WindowRecord> {
        self.windows.iter().filter(|w| w.lifecycle.is_visible())
    }

    /// Returns the minimized windows in creation order.
    pub fn minimized_windows(&self) -> impl Iterator<Item = &WindowRecord> {
        self.windows
            .iter()
            .filter(|w| w.lifecycle == WindowLifecycle::Minimized)
    }

    /// Returns the currently focused window id, if any.
    pub fn focused_id(&self) -> Option<WindowId> {
        self.focused
    }

    fn allocate_z(&mut self) -> u32 {
        let z = self.next_z;
        self.next_z = self.next_z.saturating_add(1);
        z
    }

    fn find_mut(&mut self, id: WindowId) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| w.id == id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn finder() -> AppId {
        AppId::trusted("shell.finder")
    }

    fn open(registry: &mut WindowRegistry) -> WindowId {
        registry.open(finder(), "Finder")
    }

    #[test]
    fn open_assigns_strictly_increasing_z_indices() {
        let mut registry = WindowRegistry::default();
        let mut last_z = 0;
        for _ in 0..5 {
            let id = open(&mut registry);
            let z = registry.window(id).unwrap().z_index;
            assert!(z > last_z);
            last_z = z;
        }
    }

    #[test]
    fn open_cascades_bounds_by_fixed_step() {
        let mut registry = WindowRegistry::default();
        let a = open(&mut registry);
        let b = open(&mut registry);
        let a = registry.window(a).unwrap().clone();
        let b = registry.window(b).unwrap().clone();
        assert_eq!(b.bounds.x, a.bounds.x + CASCADE_STEP);
        assert_eq!(b.bounds.y, a.bounds.y + CASCADE_STEP);
        assert_eq!(b.z_index, a.z_index + 1);
    }

    #[test]
    fn focus_always_lands_strictly_above_every_other_window() {
        let mut registry = WindowRegistry::default();
        let a = open(&mut registry);
        let b = open(&mut registry);
        registry.focus(a);
        let top = registry.window(a).unwrap().z_index;
        assert!(registry.windows().iter().all(|w| w.id == a || w.z_index < top));

        // Re-focusing the top window keeps allocating new values.
        registry.focus(a);
        assert!(registry.window(a).unwrap().z_index > top);
        assert_eq!(registry.focused_id(), Some(a));
        assert!(registry.window(b).unwrap().z_index < registry.window(a).unwrap().z_index);
    }

    #[test]
    fn closing_focused_window_clears_focus_without_refocusing() {
        let mut registry = WindowRegistry::default();
        let a = open(&mut registry);
        let b = open(&mut registry);
        registry.close(b);
        assert_eq!(registry.focused_id(), None);
        assert!(registry.window(a).is_some());

        registry.focus(a);
        let c = open(&mut registry);
        registry.close(a);
        assert_eq!(registry.focused_id(), Some(c));
    }

    #[test]
    fn minimize_clears_focus_and_hides_from_visible_enumeration() {
        let mut registry = WindowRegistry::default();
        let a = open(&mut registry);
        registry.minimize(a);
        assert_eq!(registry.focused_id(), None);
        assert_eq!(registry.visible_windows().count(), 0);
        assert_eq!(registry.minimized_windows().count(), 1);

        // A minimized window cannot take focus.
        registry.focus(a);
        assert_eq!(registry.focused_id(), None);
    }

    #[test]
    fn restore_reopens_focuses_and_raises() {
        let mut registry = WindowRegistry::default();
        let a = open(&mut registry);
        let b = open(&mut registry);
        registry.minimize(a);
        registry.restore(a);
        assert_eq!(registry.focused_id(), Some(a));
        assert!(registry.window(a).unwrap().z_index > registry.window(b).unwrap().z_index);
        assert_eq!(registry.window(a).unwrap().lifecycle, WindowLifecycle::Open);
    }

    #[test]
    fn zoom_is_its_own_inverse() {
        let mut registry = WindowRegistry::default();
        let a = open(&mut registry);
        registry.update_position(a, 123, 77);
        registry.update_size(a, 333, 222);
        let before = registry.window(a).unwrap().bounds;

        registry.zoom(a);
        let zoomed = registry.window(a).unwrap().clone();
        assert!(zoomed.zoomed);
        assert_eq!(zoomed.bounds.w, ZOOMED_WINDOW_WIDTH);
        assert_eq!(zoomed.bounds.h, ZOOMED_WINDOW_HEIGHT);

        registry.zoom(a);
        let restored = registry.window(a).unwrap().clone();
        assert!(!restored.zoomed);
        assert_eq!(restored.bounds, before);
    }

    #[test]
    fn operations_on_unknown_ids_are_noops() {
        let mut registry = WindowRegistry::default();
        let a = open(&mut registry);
        let before = registry.clone();
        let ghost = WindowId(999);

        registry.close(ghost);
        registry.minimize(ghost);
        registry.restore(ghost);
        registry.zoom(ghost);
        registry.update_position(ghost, 1, 2);
        registry.update_size(ghost, 3, 4);
        registry.mark_lifecycle(ghost, WindowLifecycle::Closing);

        // Focus on a ghost consumes an allocator value but changes no window.
        registry.focus(ghost);
        assert_eq!(registry.windows(), before.windows());
        assert_eq!(registry.focused_id(), Some(a));
    }
}
