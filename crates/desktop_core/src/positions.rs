//! Per-icon position map and grid allocator, independent of icon identity.

use std::collections::HashMap;

use crate::geometry::{Point, Rect};
use crate::model::{IconId, DOCK_HEIGHT, ICON_CELL_HEIGHT, ICON_CELL_WIDTH, MENU_BAR_HEIGHT};

/// Margin between the grid and the viewport edges.
const GRID_MARGIN: i32 = 12;

/// Key→position map for desktop icons.
///
/// Positions are kept apart from the icon records themselves so layout
/// recalculation (viewport resize, "clean up") never touches icon identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IconPositionStore {
    positions: HashMap<IconId, Point>,
}

impl IconPositionStore {
    /// Returns the committed position for `id`, if known.
    pub fn position(&self, id: IconId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    /// Commits a single position.
    pub fn set(&mut self, id: IconId, position: Point) {
        self.positions.insert(id, position);
    }

    /// Removes and returns the position for `id`.
    pub fn remove(&mut self, id: IconId) -> Option<Point> {
        self.positions.remove(&id)
    }

    /// Commits a batch of final positions in one pass.
    pub fn commit_batch(&mut self, moves: &[(IconId, Point)]) {
        for (id, position) in moves {
            self.positions.insert(*id, *position);
        }
    }

    /// Returns the stored position for `id`, allocating the first free grid
    /// cell when none exists yet.
    pub fn ensure(&mut self, id: IconId, viewport: Rect) -> Point {
        if let Some(position) = self.position(id) {
            return position;
        }
        let position = self.first_free_cell(viewport);
        self.positions.insert(id, position);
        position
    }

    /// Reassigns every id in `order` to consecutive grid cells ("clean up").
    pub fn clean_up(&mut self, order: &[IconId], viewport: Rect) {
        self.positions.retain(|id, _| order.contains(id));
        for (slot, id) in order.iter().enumerate() {
            self.positions.insert(*id, grid_cell(slot, viewport));
        }
    }

    /// Stable, sorted view of every committed position (snapshot order).
    pub fn entries(&self) -> Vec<(IconId, Point)> {
        let mut entries: Vec<_> = self.positions.iter().map(|(id, p)| (*id, *p)).collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }

    /// Replaces the map from snapshot entries.
    pub fn load_entries(&mut self, entries: &[(IconId, Point)]) {
        self.positions = entries.iter().copied().collect();
    }

    fn first_free_cell(&self, viewport: Rect) -> Point {
        for slot in 0.. {
            let candidate = grid_cell(slot, viewport);
            let cell = Rect::new(candidate.x, candidate.y, ICON_CELL_WIDTH, ICON_CELL_HEIGHT);
            if !self.positions.values().any(|p| cell.contains(*p)) {
                return candidate;
            }
        }
        unreachable!("grid cells are unbounded");
    }
}

/// Position of grid slot `slot`: columns fill from the right edge, each
/// column running top to bottom inside the usable band.
fn grid_cell(slot: usize, viewport: Rect) -> Point {
    let usable_h = (viewport.h - MENU_BAR_HEIGHT - DOCK_HEIGHT - 2 * GRID_MARGIN).max(ICON_CELL_HEIGHT);
    let rows = (usable_h / ICON_CELL_HEIGHT).max(1) as usize;
    let column = slot / rows;
    let row = slot % rows;
    Point {
        x: viewport.w - GRID_MARGIN - ICON_CELL_WIDTH - column as i32 * ICON_CELL_WIDTH,
        y: MENU_BAR_HEIGHT + GRID_MARGIN + row as i32 * ICON_CELL_HEIGHT,
    }
}

/// Clamps a committed icon position to the usable desktop band: never above
/// the menu bar, never past the usable width, and clear of the dock strip.
pub fn clamp_to_viewport(position: Point, viewport: Rect) -> Point {
    Point {
        x: position.x.clamp(0, (viewport.w - ICON_CELL_WIDTH).max(0)),
        y: position.y.clamp(
            MENU_BAR_HEIGHT,
            (viewport.h - DOCK_HEIGHT - ICON_CELL_HEIGHT).max(MENU_BAR_HEIGHT),
        ),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn viewport() -> Rect {
        Rect::new(0, 0, 1280, 800)
    }

    #[test]
    fn ensure_allocates_right_edge_columns_top_down() {
        let mut store = IconPositionStore::default();
        let a = store.ensure(IconId(1), viewport());
        let b = store.ensure(IconId(2), viewport());
        assert_eq!(a.x, 1280 - GRID_MARGIN - ICON_CELL_WIDTH);
        assert_eq!(a.y, MENU_BAR_HEIGHT + GRID_MARGIN);
        assert_eq!(b.x, a.x);
        assert_eq!(b.y, a.y + ICON_CELL_HEIGHT);
        // Ensure is idempotent for known ids.
        assert_eq!(store.ensure(IconId(1), viewport()), a);
    }

    #[test]
    fn allocation_skips_cells_occupied_by_manual_positions() {
        let mut store = IconPositionStore::default();
        let first = store.ensure(IconId(1), viewport());
        store.set(IconId(1), first.offset(4, 6));
        let second = store.ensure(IconId(2), viewport());
        assert_ne!(second, first);
    }

    #[test]
    fn clean_up_reassigns_display_order_and_drops_strays() {
        let mut store = IconPositionStore::default();
        store.set(IconId(1), Point::new(500, 400));
        store.set(IconId(2), Point::new(100, 300));
        store.set(IconId(9), Point::new(7, 7));

        store.clean_up(&[IconId(2), IconId(1)], viewport());
        assert_eq!(store.position(IconId(2)), Some(grid_cell(0, viewport())));
        assert_eq!(store.position(IconId(1)), Some(grid_cell(1, viewport())));
        assert_eq!(store.position(IconId(9)), None);
    }

    #[test]
    fn clamp_respects_menu_bar_and_dock_bands() {
        let v = viewport();
        assert_eq!(
            clamp_to_viewport(Point::new(-50, -50), v),
            Point::new(0, MENU_BAR_HEIGHT)
        );
        assert_eq!(
            clamp_to_viewport(Point::new(5000, 5000), v),
            Point::new(
                v.w - ICON_CELL_WIDTH,
                v.h - DOCK_HEIGHT - ICON_CELL_HEIGHT
            )
        );
        let inside = Point::new(300, 300);
        assert_eq!(clamp_to_viewport(inside, v), inside);
    }

    #[test]
    fn entries_round_trip_in_stable_order() {
        let mut store = IconPositionStore::default();
        store.set(IconId(3), Point::new(1, 2));
        store.set(IconId(1), Point::new(3, 4));
        let entries = store.entries();
        assert_eq!(entries[0].0, IconId(1));

        let mut reloaded = IconPositionStore::default();
        reloaded.load_entries(&entries);
        assert_eq!(reloaded, store);
    }
}
