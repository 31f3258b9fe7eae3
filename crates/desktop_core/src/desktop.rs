//! Desktop interaction controller: one pointer pipeline for selection,
//! marquee, synchronized drag, and drop resolution.
//!
//! The controller owns every sub-engine plus the handle registry, so a
//! single `&mut` borrow drives a whole gesture. It stays free of any
//! rendering or platform types; callers act on the returned
//! [`ShellEffect`]s.

use std::collections::HashSet;
use std::rc::Rc;

use crate::drag::{DragCoordinator, HandleRegistry, IconHandle};
use crate::drop_targets::{DropResolution, DropTargetResolver};
use crate::geometry::{Point, Rect};
use crate::icons::{DesktopItems, DesktopSnapshot, IconKind, SortKey, DOCUMENTS_FOLDER_ID};
use crate::model::{IconId, ICON_CELL_HEIGHT, ICON_CELL_WIDTH};
use crate::positions::{clamp_to_viewport, IconPositionStore};
use crate::selection::SelectionEngine;

/// Side effect requested by an interaction, executed by the host layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEffect {
    /// The desktop snapshot changed and should be persisted.
    PersistDesktop,
    /// Play the named interface sound (fire-and-forget).
    PlaySound(&'static str),
}

/// Modifier keys held during an icon pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerModifiers {
    /// Toggle membership (cmd/ctrl click).
    pub toggle: bool,
    /// Range extension (shift click).
    pub range: bool,
}

/// All interaction state for one desktop surface.
pub struct DesktopInteractionController {
    items: DesktopItems,
    positions: IconPositionStore,
    selection: SelectionEngine,
    drag: DragCoordinator,
    drops: DropTargetResolver,
    handles: HandleRegistry,
    entrance_suppressed: HashSet<IconId>,
}

impl Default for DesktopInteractionController {
    fn default() -> Self {
        Self {
            items: DesktopItems::default(),
            positions: IconPositionStore::default(),
            selection: SelectionEngine::default(),
            drag: DragCoordinator::default(),
            drops: DropTargetResolver::new(vec![DOCUMENTS_FOLDER_ID]),
            handles: HandleRegistry::default(),
            entrance_suppressed: HashSet::new(),
        }
    }
}

impl DesktopInteractionController {
    /// The desktop item collections.
    pub fn items(&self) -> &DesktopItems {
        &self.items
    }

    /// The committed position store.
    pub fn positions(&self) -> &IconPositionStore {
        &self.positions
    }

    /// The current selection, in selection order.
    pub fn selected(&self) -> &[IconId] {
        self.selection.selected()
    }

    /// Returns whether `id` is selected.
    pub fn is_selected(&self, id: IconId) -> bool {
        self.selection.is_selected(id)
    }

    /// The live marquee rectangle, when a marquee is in flight.
    pub fn marquee_rect(&self) -> Option<Rect> {
        self.selection.marquee_rect()
    }

    /// Whether an icon drag gesture is in flight.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Registers the presentation handle for a mounted icon.
    pub fn register_icon_handle(&mut self, id: IconId, handle: Rc<dyn IconHandle>) {
        self.handles.register(id, handle);
    }

    /// Drops the handle for an unmounted icon.
    pub fn unregister_icon_handle(&mut self, id: IconId) {
        self.handles.unregister(id);
    }

    /// Returns the committed position for `id`, allocating a grid cell on
    /// first sight.
    pub fn ensure_position(&mut self, id: IconId, viewport: Rect) -> Point {
        self.positions.ensure(id, viewport)
    }

    /// Publishes the trash region for drop hit-testing.
    pub fn set_trash_region(&mut self, region: Rect) {
        self.drops.set_trash_region(region);
    }

    /// Publishes a drop-capable folder window's content region.
    pub fn set_folder_region(&mut self, folder: IconId, region: Rect) {
        self.drops.set_folder_region(folder, region);
    }

    /// Withdraws a folder window's drop region.
    pub fn clear_folder_region(&mut self, folder: IconId) {
        self.drops.clear_folder_region(folder);
    }

    /// Pointer-down on an icon: applies click selection semantics and arms
    /// the drag gesture.
    pub fn icon_pointer_down(
        &mut self,
        id: IconId,
        pointer: Point,
        modifiers: PointerModifiers,
    ) {
        if modifiers.range {
            self.selection.select_range(id, &self.items.display_order());
        } else if modifiers.toggle {
            self.selection.toggle(id);
        } else if !self.selection.is_selected(id) {
            // Clicking inside an existing multi-selection keeps it intact so
            // the drag moves the whole group.
            self.selection.select_single(id);
        }
        self.drag
            .begin(id, self.selection.selected(), &self.positions, pointer);
    }

    /// Pointer-down on empty desktop: starts a marquee.
    pub fn background_pointer_down(&mut self, pointer: Point, additive: bool) {
        self.selection.begin_marquee(pointer, additive);
    }

    /// Click on empty desktop (no gesture). Clears the selection unless the
    /// click is the synthetic tail of a just-finished marquee.
    pub fn background_click(&mut self) {
        if !self.selection.take_suppressed_click() {
            self.selection.clear();
        }
    }

    /// Pointer movement. Feeds the drag's live offsets or the marquee's
    /// live selection, whichever gesture is active.
    ///
    /// Returns the new trash-hover state when it changed mid-drag.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<bool> {
        if self.drag.is_dragging() {
            self.drag.update(pointer, &self.handles);
            let drop_point = self.drag.live_drop_point()?;
            self.drops.update_trash_hover(drop_point)
        } else {
            let layout = self.icon_layout();
            self.selection.update_marquee(pointer, &layout);
            None
        }
    }

    /// Pointer-up: ends whichever gesture is active and resolves the drop.
    pub fn pointer_up(
        &mut self,
        pointer: Point,
        viewport: Rect,
        now_ms: u64,
    ) -> Vec<ShellEffect> {
        if self.selection.marquee_rect().is_some() {
            self.selection.finish_marquee();
            return Vec::new();
        }
        let Some(release) = self.drag.release(pointer, viewport) else {
            return Vec::new();
        };
        self.drops.reset_trash_hover();

        match self.drops.resolve(release.drop_point) {
            DropResolution::Trashed => {
                let mut trashed_any = false;
                for (id, position) in &release.commits {
                    // The drive never enters the trash; it lands in place.
                    let previous = self.positions.position(*id).unwrap_or(*position);
                    if self.items.trash(*id, previous, now_ms) {
                        trashed_any = true;
                        self.positions.remove(*id);
                        self.handles.unregister(*id);
                        self.selection_remove(*id);
                    } else {
                        self.commit_one(*id, *position);
                    }
                }
                if trashed_any {
                    vec![ShellEffect::PlaySound("trash"), ShellEffect::PersistDesktop]
                } else {
                    vec![ShellEffect::PlaySound("error")]
                }
            }
            DropResolution::Filed(folder) => {
                let mut filed_any = false;
                for (id, position) in &release.commits {
                    if self.items.file_into_folder(*id, folder) {
                        filed_any = true;
                        self.positions.remove(*id);
                        self.handles.unregister(*id);
                        self.selection_remove(*id);
                    } else {
                        self.commit_one(*id, *position);
                    }
                }
                if filed_any {
                    vec![ShellEffect::PersistDesktop]
                } else {
                    Vec::new()
                }
            }
            DropResolution::Repositioned => {
                self.positions.commit_batch(&release.commits);
                for (id, position) in &release.commits {
                    if let Some(handle) = self.handles.get(*id) {
                        // Commit and offset-clear land in the same tick so
                        // the icon never visibly jumps.
                        handle.commit(*position);
                        handle.clear_live_offset();
                    }
                    self.entrance_suppressed.insert(*id);
                }
                vec![ShellEffect::PersistDesktop]
            }
        }
    }

    /// Abandons any in-flight gesture, restoring pre-gesture presentation.
    pub fn cancel_gesture(&mut self) {
        for id in self.drag.participants().to_vec() {
            if let Some(handle) = self.handles.get(id) {
                handle.clear_live_offset();
            }
        }
        self.drag.cancel();
        self.drops.reset_trash_hover();
        self.selection.finish_marquee();
    }

    /// Creates a user icon, places it on the grid, and selects it.
    pub fn create_icon(
        &mut self,
        label: impl Into<String>,
        kind: IconKind,
        viewport: Rect,
        now_ms: u64,
    ) -> (IconId, Vec<ShellEffect>) {
        let id = self.items.create_icon(label, kind, now_ms);
        self.positions.ensure(id, viewport);
        self.selection.select_single(id);
        (id, vec![ShellEffect::PersistDesktop])
    }

    /// Renames a user icon.
    pub fn rename_icon(
        &mut self,
        id: IconId,
        label: impl Into<String>,
        now_ms: u64,
    ) -> Vec<ShellEffect> {
        if self.items.rename(id, label, now_ms) {
            vec![ShellEffect::PersistDesktop]
        } else {
            Vec::new()
        }
    }

    /// Copies the single selected icon onto the clipboard.
    pub fn copy_selected(&mut self) -> bool {
        match self.selection.selected() {
            [id] => self.items.copy_to_clipboard(*id),
            _ => false,
        }
    }

    /// Pastes the clipboard as a new icon next to a free grid cell.
    pub fn paste(&mut self, viewport: Rect, now_ms: u64) -> Vec<ShellEffect> {
        match self.items.paste(now_ms) {
            Some(id) => {
                self.positions.ensure(id, viewport);
                self.selection.select_single(id);
                vec![ShellEffect::PersistDesktop]
            }
            None => Vec::new(),
        }
    }

    /// Moves the current selection to the trash (menu command path).
    pub fn trash_selected(&mut self, now_ms: u64) -> Vec<ShellEffect> {
        let mut trashed_any = false;
        for id in self.selection.selected().to_vec() {
            let previous = self.positions.position(id).unwrap_or(Point::new(0, 0));
            if self.items.trash(id, previous, now_ms) {
                trashed_any = true;
                self.positions.remove(id);
                self.handles.unregister(id);
                self.selection_remove(id);
            }
        }
        if trashed_any {
            vec![ShellEffect::PlaySound("trash"), ShellEffect::PersistDesktop]
        } else {
            vec![ShellEffect::PlaySound("error")]
        }
    }

    /// Puts a trashed icon back at its recorded position (clamped to the
    /// current viewport).
    pub fn restore_trashed(&mut self, id: IconId, viewport: Rect) -> Vec<ShellEffect> {
        match self.items.restore_trashed(id) {
            Some(previous) => {
                self.positions.set(id, clamp_to_viewport(previous, viewport));
                self.entrance_suppressed.insert(id);
                vec![ShellEffect::PersistDesktop]
            }
            None => Vec::new(),
        }
    }

    /// Discards the trash contents.
    pub fn empty_trash(&mut self) -> Vec<ShellEffect> {
        if self.items.empty_trash() > 0 {
            vec![
                ShellEffect::PlaySound("empty-trash"),
                ShellEffect::PersistDesktop,
            ]
        } else {
            Vec::new()
        }
    }

    /// Snaps every desktop icon back onto the grid in display order.
    pub fn clean_up(&mut self, viewport: Rect) -> Vec<ShellEffect> {
        let order = self.items.display_order();
        self.positions.clean_up(&order, viewport);
        for (id, position) in self.positions.entries() {
            if let Some(handle) = self.handles.get(id) {
                handle.commit(position);
            }
        }
        vec![ShellEffect::PersistDesktop]
    }

    /// Arranges icons by `key` and re-lays the grid.
    pub fn sort_icons(&mut self, key: SortKey, viewport: Rect) -> Vec<ShellEffect> {
        self.items.sort_user_icons(key);
        self.clean_up(viewport)
    }

    /// Builds the persistable desktop payload.
    pub fn snapshot(&self) -> DesktopSnapshot {
        self.items.snapshot(self.positions.entries())
    }

    /// Restores the controller from a persisted payload. Gesture and
    /// selection state always starts fresh.
    pub fn apply_snapshot(&mut self, snapshot: &DesktopSnapshot) {
        self.items.apply_snapshot(snapshot);
        self.positions.load_entries(&snapshot.positions);
        self.selection = SelectionEngine::default();
        self.drag = DragCoordinator::default();
    }

    /// Takes the set of icons whose entrance animation should be skipped on
    /// the next render (they were just moved, not newly created).
    pub fn take_entrance_suppressed(&mut self) -> HashSet<IconId> {
        std::mem::take(&mut self.entrance_suppressed)
    }

    /// Fixed-size cell rectangles for every positioned desktop icon, in
    /// display order.
    pub fn icon_layout(&self) -> Vec<(IconId, Rect)> {
        self.items
            .display_order()
            .into_iter()
            .filter_map(|id| {
                self.positions.position(id).map(|p| {
                    (id, Rect::new(p.x, p.y, ICON_CELL_WIDTH, ICON_CELL_HEIGHT))
                })
            })
            .collect()
    }

    fn commit_one(&mut self, id: IconId, position: Point) {
        self.positions.set(id, position);
        if let Some(handle) = self.handles.get(id) {
            handle.commit(position);
            handle.clear_live_offset();
        }
        self.entrance_suppressed.insert(id);
    }

    fn selection_remove(&mut self, id: IconId) {
        if self.selection.is_selected(id) {
            self.selection.toggle(id);
        }
    }
}

impl std::fmt::Debug for DesktopInteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopInteractionController")
            .field("items", &self.items)
            .field("selection", &self.selection)
            .field("dragging", &self.drag.is_dragging())
            .finish()
    }
}
