//! Geometric resolution of drag release points against named drop regions.

use crate::geometry::{Point, Rect};
use crate::model::IconId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a drag gesture resolved at release.
pub enum DropResolution {
    /// The release point landed on the trash region.
    Trashed,
    /// The release point landed inside an eligible folder window.
    Filed(IconId),
    /// Ordinary move; positions are committed in place.
    Repositioned,
}

/// Hit-tester for the trash region and drop-capable folder windows.
///
/// Trash is always checked before folders: when a point satisfies both,
/// trash wins by fixed priority.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DropTargetResolver {
    trash_region: Option<Rect>,
    folder_regions: Vec<(IconId, Rect)>,
    allowed_folders: Vec<IconId>,
    trash_hovered: bool,
}

impl DropTargetResolver {
    /// Builds a resolver with the fixed allow-list of drop-capable folders.
    pub fn new(allowed_folders: Vec<IconId>) -> Self {
        Self {
            allowed_folders,
            ..Self::default()
        }
    }

    /// Publishes the trash region's current rectangle.
    pub fn set_trash_region(&mut self, region: Rect) {
        self.trash_region = Some(region);
    }

    /// Publishes a folder window's content rectangle. Folders outside the
    /// allow-list are ignored.
    pub fn set_folder_region(&mut self, folder: IconId, region: Rect) {
        if !self.allowed_folders.contains(&folder) {
            return;
        }
        if let Some(entry) = self.folder_regions.iter_mut().find(|(id, _)| *id == folder) {
            entry.1 = region;
        } else {
            self.folder_regions.push((folder, region));
        }
    }

    /// Withdraws a folder window's region (window closed or minimized).
    pub fn clear_folder_region(&mut self, folder: IconId) {
        self.folder_regions.retain(|(id, _)| *id != folder);
    }

    /// Resolves a release point. Trash beats folders; anything else is an
    /// ordinary reposition.
    pub fn resolve(&self, point: Point) -> DropResolution {
        if self.trash_region.map(|r| r.contains(point)).unwrap_or(false) {
            return DropResolution::Trashed;
        }
        for (folder, region) in &self.folder_regions {
            if region.contains(point) {
                return DropResolution::Filed(*folder);
            }
        }
        DropResolution::Repositioned
    }

    /// Updates the mid-drag "hovering trash" signal.
    ///
    /// Returns the new value only when it changed, so callers can forward it
    /// without redundant signal churn.
    pub fn update_trash_hover(&mut self, point: Point) -> Option<bool> {
        let hovered = self.trash_region.map(|r| r.contains(point)).unwrap_or(false);
        if hovered != self.trash_hovered {
            self.trash_hovered = hovered;
            Some(hovered)
        } else {
            None
        }
    }

    /// Resets the hover signal at gesture end. Returns `true` when the
    /// signal was set and the caller should publish the cleared state.
    pub fn reset_trash_hover(&mut self) -> bool {
        std::mem::take(&mut self.trash_hovered)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DOCS: IconId = IconId(2);
    const STRANGER: IconId = IconId(77);

    fn resolver() -> DropTargetResolver {
        let mut resolver = DropTargetResolver::new(vec![DOCS]);
        resolver.set_trash_region(Rect::new(1200, 730, 64, 64));
        resolver.set_folder_region(DOCS, Rect::new(100, 100, 400, 300));
        resolver
    }

    #[test]
    fn trash_wins_over_an_overlapping_folder() {
        let mut resolver = resolver();
        resolver.set_folder_region(DOCS, Rect::new(1100, 700, 300, 100));
        assert_eq!(
            resolver.resolve(Point::new(1210, 740)),
            DropResolution::Trashed
        );
    }

    #[test]
    fn eligible_folder_resolves_to_filed() {
        let resolver = resolver();
        assert_eq!(
            resolver.resolve(Point::new(200, 200)),
            DropResolution::Filed(DOCS)
        );
        assert_eq!(
            resolver.resolve(Point::new(700, 200)),
            DropResolution::Repositioned
        );
    }

    #[test]
    fn folders_outside_the_allow_list_never_register() {
        let mut resolver = resolver();
        resolver.set_folder_region(STRANGER, Rect::new(600, 100, 400, 300));
        assert_eq!(
            resolver.resolve(Point::new(700, 200)),
            DropResolution::Repositioned
        );
    }

    #[test]
    fn trash_hover_signal_fires_only_on_change() {
        let mut resolver = resolver();
        assert_eq!(resolver.update_trash_hover(Point::new(0, 0)), None);
        assert_eq!(
            resolver.update_trash_hover(Point::new(1210, 740)),
            Some(true)
        );
        assert_eq!(resolver.update_trash_hover(Point::new(1215, 745)), None);
        assert_eq!(resolver.update_trash_hover(Point::new(0, 0)), Some(false));
        assert!(!resolver.reset_trash_hover());
    }
}
