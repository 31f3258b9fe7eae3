//! Desktop icon selection: click semantics and marquee tracking.

use crate::geometry::{Point, Rect};
use crate::model::IconId;

#[derive(Debug, Clone, PartialEq, Eq)]
/// An in-progress marquee gesture.
struct Marquee {
    origin: Point,
    current: Point,
    /// Selection snapshot taken at marquee start (kept for additive drags).
    base: Vec<IconId>,
    additive: bool,
}

/// Ordered selection set plus marquee gesture state.
///
/// Ordering matters: range selection (shift-click) anchors on the *last*
/// selected id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionEngine {
    selected: Vec<IconId>,
    marquee: Option<Marquee>,
    suppress_next_click: bool,
}

impl SelectionEngine {
    /// The current selection in selection order.
    pub fn selected(&self) -> &[IconId] {
        &self.selected
    }

    /// Returns whether `id` is currently selected.
    pub fn is_selected(&self, id: IconId) -> bool {
        self.selected.contains(&id)
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Plain click: replaces the selection with `id`.
    pub fn select_single(&mut self, id: IconId) {
        self.selected.clear();
        self.selected.push(id);
    }

    /// Modifier click: adds or removes `id`.
    pub fn toggle(&mut self, id: IconId) {
        if let Some(index) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(index);
        } else {
            self.selected.push(id);
        }
    }

    /// Shift click: selects the inclusive run between the last selected id
    /// and `id` in `display_order`. Falls back to a single selection when
    /// nothing is selected or either endpoint is not displayed.
    pub fn select_range(&mut self, id: IconId, display_order: &[IconId]) {
        let Some(anchor) = self.selected.last().copied() else {
            self.select_single(id);
            return;
        };
        let anchor_index = display_order.iter().position(|d| *d == anchor);
        let target_index = display_order.iter().position(|d| *d == id);
        let (Some(a), Some(b)) = (anchor_index, target_index) else {
            self.select_single(id);
            return;
        };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.selected = display_order[lo..=hi].to_vec();
    }

    /// Begins a marquee at `origin`. Without a modifier the existing
    /// selection is cleared first; with one it is kept and unioned.
    pub fn begin_marquee(&mut self, origin: Point, additive: bool) {
        if !additive {
            self.selected.clear();
        }
        self.marquee = Some(Marquee {
            origin,
            current: origin,
            base: self.selected.clone(),
            additive,
        });
    }

    /// Recomputes the live selection for the marquee spanning `current`.
    ///
    /// `layout` supplies each icon's fixed-size cell rectangle in display
    /// order; the selection is every cell intersecting the marquee
    /// rectangle (drag direction does not matter).
    pub fn update_marquee(&mut self, current: Point, layout: &[(IconId, Rect)]) {
        let Some(marquee) = self.marquee.as_mut() else {
            return;
        };
        marquee.current = current;
        let rect = Rect::from_corners(marquee.origin, marquee.current);
        let mut next = if marquee.additive {
            marquee.base.clone()
        } else {
            Vec::new()
        };
        for (id, cell) in layout {
            if rect.intersects(*cell) && !next.contains(id) {
                next.push(*id);
            }
        }
        self.selected = next;
    }

    /// The live marquee rectangle, if a marquee is active.
    pub fn marquee_rect(&self) -> Option<Rect> {
        self.marquee
            .as_ref()
            .map(|m| Rect::from_corners(m.origin, m.current))
    }

    /// Ends the marquee, arming suppression of the synthetic click that
    /// follows the gesture (which would otherwise clear the selection).
    pub fn finish_marquee(&mut self) {
        if self.marquee.take().is_some() {
            self.suppress_next_click = true;
        }
    }

    /// Consumes the one-shot click suppression flag.
    pub fn take_suppressed_click(&mut self) -> bool {
        std::mem::take(&mut self.suppress_next_click)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const X: IconId = IconId(1);
    const Y: IconId = IconId(2);
    const Z: IconId = IconId(3);

    fn layout() -> Vec<(IconId, Rect)> {
        vec![
            (X, Rect::new(0, 0, 80, 72)),
            (Y, Rect::new(0, 80, 80, 72)),
            (Z, Rect::new(300, 300, 80, 72)),
        ]
    }

    #[test]
    fn plain_click_replaces_and_toggle_adds_and_removes() {
        let mut engine = SelectionEngine::default();
        engine.select_single(X);
        engine.select_single(Y);
        assert_eq!(engine.selected(), &[Y]);

        engine.toggle(X);
        assert_eq!(engine.selected(), &[Y, X]);
        engine.toggle(Y);
        assert_eq!(engine.selected(), &[X]);
    }

    #[test]
    fn range_select_covers_the_inclusive_display_run() {
        let order = [X, Y, Z];
        let mut engine = SelectionEngine::default();
        engine.select_single(X);
        engine.select_range(Z, &order);
        assert_eq!(engine.selected(), &[X, Y, Z]);

        // Reversed direction anchors on the last selected id.
        engine.select_single(Z);
        engine.select_range(X, &order);
        assert_eq!(engine.selected(), &[X, Y, Z]);
    }

    #[test]
    fn range_select_without_anchor_degrades_to_single() {
        let mut engine = SelectionEngine::default();
        engine.select_range(Y, &[X, Y, Z]);
        assert_eq!(engine.selected(), &[Y]);
    }

    #[test]
    fn marquee_selects_intersecting_cells_in_any_drag_direction() {
        let mut engine = SelectionEngine::default();
        engine.begin_marquee(Point::new(70, 140), false);
        engine.update_marquee(Point::new(10, 10), &layout());
        assert_eq!(engine.selected(), &[X, Y]);

        let mut reverse = SelectionEngine::default();
        reverse.begin_marquee(Point::new(10, 10), false);
        reverse.update_marquee(Point::new(70, 140), &layout());
        assert_eq!(reverse.selected(), engine.selected());
    }

    #[test]
    fn non_additive_marquee_clears_existing_selection_first() {
        let mut engine = SelectionEngine::default();
        engine.select_single(Z);
        engine.begin_marquee(Point::new(0, 0), false);
        assert_eq!(engine.selected(), &[] as &[IconId]);

        engine.update_marquee(Point::new(60, 60), &layout());
        assert_eq!(engine.selected(), &[X]);
    }

    #[test]
    fn additive_marquee_unions_with_the_starting_selection() {
        let mut engine = SelectionEngine::default();
        engine.select_single(Z);
        engine.begin_marquee(Point::new(0, 0), true);
        engine.update_marquee(Point::new(60, 60), &layout());
        assert_eq!(engine.selected(), &[Z, X]);
    }

    #[test]
    fn finishing_a_marquee_suppresses_the_following_click_once() {
        let mut engine = SelectionEngine::default();
        engine.begin_marquee(Point::new(0, 0), false);
        engine.update_marquee(Point::new(60, 60), &layout());
        engine.finish_marquee();
        assert!(engine.take_suppressed_click());
        assert!(!engine.take_suppressed_click());
        assert_eq!(engine.marquee_rect(), None);
    }
}
