//! Per-gesture drag engine mirroring live offsets across a selection.
//!
//! During a gesture the coordinator never touches the canonical position
//! store: every pointer move is pushed straight into each participant's
//! presentation handle, keeping per-frame cost proportional to the selection
//! size. The store is reconciled exactly once, at release.

use std::collections::HashMap;
use std::rc::Rc;

use crate::geometry::{Point, Rect};
use crate::model::{IconId, ICON_CELL_HEIGHT, ICON_CELL_WIDTH};
use crate::positions::{clamp_to_viewport, IconPositionStore};

/// Imperative presentation seam for one draggable icon.
///
/// Implementable by any rendering backend; the DOM implementation writes a
/// CSS transform for the live offset and absolute coordinates on commit.
pub trait IconHandle {
    /// Applies a temporary presentation-only offset.
    fn set_live_offset(&self, dx: i32, dy: i32);
    /// Removes the temporary offset.
    fn clear_live_offset(&self);
    /// Moves the presentation to its final committed position. Must land in
    /// the same tick as [`IconHandle::clear_live_offset`] so the icon does
    /// not visibly jump.
    fn commit(&self, position: Point);
}

/// Handle map owned by the interaction controller (never a global).
#[derive(Clone, Default)]
pub struct HandleRegistry {
    handles: HashMap<IconId, Rc<dyn IconHandle>>,
}

impl HandleRegistry {
    /// Registers (or replaces) the handle for an icon.
    pub fn register(&mut self, id: IconId, handle: Rc<dyn IconHandle>) {
        self.handles.insert(id, handle);
    }

    /// Drops the handle for an icon that left the desktop.
    pub fn unregister(&mut self, id: IconId) {
        self.handles.remove(&id);
    }

    /// Looks up the handle for `id`.
    pub fn get(&self, id: IconId) -> Option<&Rc<dyn IconHandle>> {
        self.handles.get(&id)
    }
}

impl std::fmt::Debug for HandleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleRegistry")
            .field("len", &self.handles.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DragSession {
    primary: IconId,
    participants: Vec<IconId>,
    pointer_start: Point,
    start_positions: HashMap<IconId, Point>,
    offset: (i32, i32),
}

/// Final outcome of a released drag gesture, before drop-target resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragRelease {
    /// Icon the gesture started on.
    pub primary: IconId,
    /// Every icon that mirrored the gesture.
    pub participants: Vec<IconId>,
    /// Total pointer offset of the gesture.
    pub offset: (i32, i32),
    /// Center of the primary icon's cell at release, for drop hit-testing.
    pub drop_point: Point,
    /// Clamped final position per participant, ready for one batch commit.
    pub commits: Vec<(IconId, Point)>,
}

/// Engine for one drag gesture at a time.
#[derive(Debug, Clone, Default)]
pub struct DragCoordinator {
    session: Option<DragSession>,
}

impl DragCoordinator {
    /// Begins a gesture on `primary`.
    ///
    /// When `primary` belongs to a multi-icon selection, every selected icon
    /// becomes a participant and mirrors the offset; otherwise the gesture
    /// moves `primary` alone.
    pub fn begin(
        &mut self,
        primary: IconId,
        selection: &[IconId],
        positions: &IconPositionStore,
        pointer: Point,
    ) {
        let participants: Vec<IconId> =
            if selection.len() > 1 && selection.contains(&primary) {
                selection.to_vec()
            } else {
                vec![primary]
            };
        let start_positions = participants
            .iter()
            .filter_map(|id| positions.position(*id).map(|p| (*id, p)))
            .collect();
        self.session = Some(DragSession {
            primary,
            participants,
            pointer_start: pointer,
            start_positions,
            offset: (0, 0),
        });
    }

    /// Whether a gesture is in flight.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// The icons participating in the active gesture.
    pub fn participants(&self) -> &[IconId] {
        self.session
            .as_ref()
            .map(|s| s.participants.as_slice())
            .unwrap_or(&[])
    }

    /// Pushes the live offset for the current pointer position into every
    /// participant's presentation handle. No canonical state is written.
    pub fn update(&mut self, pointer: Point, handles: &HandleRegistry) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.offset = (
            pointer.x - session.pointer_start.x,
            pointer.y - session.pointer_start.y,
        );
        for id in &session.participants {
            if let Some(handle) = handles.get(*id) {
                handle.set_live_offset(session.offset.0, session.offset.1);
            }
        }
    }

    /// Center of the primary icon's cell under the live offset, used for
    /// mid-drag drop-target feedback.
    pub fn live_drop_point(&self) -> Option<Point> {
        let session = self.session.as_ref()?;
        let start = session.start_positions.get(&session.primary)?;
        Some(Point {
            x: start.x + session.offset.0 + ICON_CELL_WIDTH / 2,
            y: start.y + session.offset.1 + ICON_CELL_HEIGHT / 2,
        })
    }

    /// Ends the gesture, producing the clamped batch commit.
    ///
    /// Each participant's final position is its committed start position
    /// plus the common offset, clamped to the viewport independently.
    pub fn release(&mut self, pointer: Point, viewport: Rect) -> Option<DragRelease> {
        let mut session = self.session.take()?;
        session.offset = (
            pointer.x - session.pointer_start.x,
            pointer.y - session.pointer_start.y,
        );
        let (dx, dy) = session.offset;
        let commits: Vec<(IconId, Point)> = session
            .participants
            .iter()
            .filter_map(|id| {
                session
                    .start_positions
                    .get(id)
                    .map(|start| (*id, clamp_to_viewport(start.offset(dx, dy), viewport)))
            })
            .collect();
        let drop_point = session
            .start_positions
            .get(&session.primary)
            .map(|start| Point {
                x: start.x + dx + ICON_CELL_WIDTH / 2,
                y: start.y + dy + ICON_CELL_HEIGHT / 2,
            })?;
        Some(DragRelease {
            primary: session.primary,
            participants: session.participants,
            offset: session.offset,
            drop_point,
            commits,
        })
    }

    /// Abandons the gesture without producing a commit.
    pub fn cancel(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{DOCK_HEIGHT, MENU_BAR_HEIGHT};

    #[derive(Default)]
    struct RecordingHandle {
        offsets: RefCell<Vec<(i32, i32)>>,
        committed: RefCell<Option<Point>>,
        cleared: RefCell<bool>,
    }

    impl IconHandle for RecordingHandle {
        fn set_live_offset(&self, dx: i32, dy: i32) {
            self.offsets.borrow_mut().push((dx, dy));
        }
        fn clear_live_offset(&self) {
            *self.cleared.borrow_mut() = true;
        }
        fn commit(&self, position: Point) {
            *self.committed.borrow_mut() = Some(position);
        }
    }

    fn viewport() -> Rect {
        Rect::new(0, 0, 1280, 800)
    }

    fn store() -> IconPositionStore {
        let mut store = IconPositionStore::default();
        store.set(IconId(1), Point::new(100, 100));
        store.set(IconId(2), Point::new(200, 100));
        store.set(IconId(3), Point::new(300, 100));
        store
    }

    #[test]
    fn solo_drag_moves_only_the_primary() {
        let positions = store();
        let mut registry = HandleRegistry::default();
        let h1 = Rc::new(RecordingHandle::default());
        let h2 = Rc::new(RecordingHandle::default());
        registry.register(IconId(1), h1.clone());
        registry.register(IconId(2), h2.clone());

        let mut drag = DragCoordinator::default();
        drag.begin(IconId(1), &[IconId(2)], &positions, Point::new(110, 110));
        drag.update(Point::new(150, 130), &registry);

        assert_eq!(h1.offsets.borrow().as_slice(), &[(40, 20)]);
        assert!(h2.offsets.borrow().is_empty());

        let release = drag.release(Point::new(150, 130), viewport()).unwrap();
        assert_eq!(release.commits, vec![(IconId(1), Point::new(140, 120))]);
    }

    #[test]
    fn multi_drag_mirrors_the_offset_across_the_selection() {
        let positions = store();
        let mut registry = HandleRegistry::default();
        let handles: Vec<Rc<RecordingHandle>> = (1..=3)
            .map(|i| {
                let h = Rc::new(RecordingHandle::default());
                registry.register(IconId(i), h.clone());
                h
            })
            .collect();

        let selection = [IconId(1), IconId(2), IconId(3)];
        let mut drag = DragCoordinator::default();
        drag.begin(IconId(2), &selection, &positions, Point::new(0, 0));
        drag.update(Point::new(25, -10), &registry);

        for handle in &handles {
            assert_eq!(handle.offsets.borrow().last(), Some(&(25, -10)));
        }

        let release = drag.release(Point::new(25, -10), viewport()).unwrap();
        assert_eq!(
            release.commits,
            vec![
                (IconId(1), Point::new(125, 90)),
                (IconId(2), Point::new(225, 90)),
                (IconId(3), Point::new(325, 90)),
            ]
        );
    }

    #[test]
    fn release_clamps_each_participant_independently() {
        let mut positions = IconPositionStore::default();
        positions.set(IconId(1), Point::new(10, MENU_BAR_HEIGHT));
        positions.set(IconId(2), Point::new(600, 400));

        let mut drag = DragCoordinator::default();
        drag.begin(
            IconId(1),
            &[IconId(1), IconId(2)],
            &positions,
            Point::new(0, 0),
        );
        let release = drag.release(Point::new(-100, -100), viewport()).unwrap();
        assert_eq!(
            release.commits,
            vec![
                (IconId(1), Point::new(0, MENU_BAR_HEIGHT)),
                (IconId(2), Point::new(500, 300)),
            ]
        );

        // Downward overflow stops short of the dock strip.
        drag.begin(
            IconId(2),
            &[IconId(2)],
            &positions,
            Point::new(0, 0),
        );
        let release = drag.release(Point::new(0, 900), viewport()).unwrap();
        assert_eq!(
            release.commits,
            vec![(IconId(2), Point::new(600, 800 - DOCK_HEIGHT - 72))]
        );
    }

    #[test]
    fn drop_point_tracks_the_primary_cell_center() {
        let positions = store();
        let mut drag = DragCoordinator::default();
        drag.begin(IconId(1), &[], &positions, Point::new(0, 0));
        drag.update(Point::new(30, 40), &HandleRegistry::default());
        assert_eq!(
            drag.live_drop_point(),
            Some(Point::new(100 + 30 + 40, 100 + 40 + 36))
        );
        let release = drag.release(Point::new(30, 40), viewport()).unwrap();
        assert_eq!(release.drop_point, Point::new(170, 176));
    }

    #[test]
    fn dragging_a_non_member_of_the_selection_ignores_the_selection() {
        let positions = store();
        let mut drag = DragCoordinator::default();
        drag.begin(
            IconId(3),
            &[IconId(1), IconId(2)],
            &positions,
            Point::new(0, 0),
        );
        assert_eq!(drag.participants(), &[IconId(3)]);
    }
}
