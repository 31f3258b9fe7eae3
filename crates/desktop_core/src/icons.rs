//! Desktop icon records, built-in catalog, trash, and clipboard.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::model::IconId;

/// Ids below this value are reserved for the built-in icon set.
pub const FIRST_USER_ICON_ID: u64 = 1000;

/// The root drive icon: immutable, never trashed, never filed.
pub const DRIVE_ICON_ID: IconId = IconId(1);
/// The built-in documents folder, the default drop-capable folder.
pub const DOCUMENTS_FOLDER_ID: IconId = IconId(2);

/// Schema version of the persisted desktop snapshot.
pub const DESKTOP_SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Category of a desktop icon.
pub enum IconKind {
    /// A mounted drive.
    Drive,
    /// A plain document.
    File,
    /// A folder that opens into a window.
    Folder,
    /// An application launcher.
    Application,
    /// A saved-search folder.
    SmartFolder,
    /// A disc-burning staging folder.
    BurnFolder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One desktop icon record.
pub struct Icon {
    /// Stable identifier.
    pub id: IconId,
    /// Display label.
    pub label: String,
    /// Icon category.
    pub kind: IconKind,
    /// Document payload reference, when the icon fronts a document.
    pub document: Option<String>,
    /// External link target, when the icon fronts a URL.
    pub link: Option<String>,
    /// Creation timestamp (unix ms).
    pub created_at_ms: u64,
    /// Last modification timestamp (unix ms).
    pub modified_at_ms: u64,
}

impl Icon {
    /// Whether this icon belongs to the fixed built-in set.
    pub fn is_builtin(&self) -> bool {
        self.id.0 < FIRST_USER_ICON_ID
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A trashed icon, retaining everything needed for exact restoration.
pub struct TrashedIcon {
    /// The icon record itself.
    pub icon: Icon,
    /// Desktop position at the moment of trashing.
    pub previous_position: Point,
    /// When the icon was trashed (unix ms).
    pub trashed_at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A copyable icon snapshot, independent of the original's lifecycle.
pub struct ClipboardItem {
    /// The copied icon record.
    pub icon: Icon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Sort key for the "arrange icons" menu.
pub enum SortKey {
    /// Arrange by icon category.
    Kind,
    /// Arrange by modification date.
    Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Persisted desktop payload: user icons, positions, trash contents.
pub struct DesktopSnapshot {
    /// Snapshot schema version.
    pub schema_version: u32,
    /// User-created icons on the desktop.
    pub user_icons: Vec<Icon>,
    /// Committed icon positions.
    pub positions: Vec<(IconId, Point)>,
    /// Trash contents.
    pub trash: Vec<TrashedIcon>,
}

/// Icon collections for one desktop.
///
/// An icon lives in exactly one of the desktop list, one folder's contents,
/// or the trash; every operation here moves records between those
/// collections rather than copying them.
#[derive(Debug, Clone, PartialEq)]
pub struct DesktopItems {
    desktop: Vec<Icon>,
    folder_contents: HashMap<IconId, Vec<Icon>>,
    trash: Vec<TrashedIcon>,
    clipboard: Option<ClipboardItem>,
    next_user_icon: u64,
}

impl Default for DesktopItems {
    fn default() -> Self {
        let builtins = vec![
            Icon {
                id: DRIVE_ICON_ID,
                label: "System Disk".to_string(),
                kind: IconKind::Drive,
                document: None,
                link: None,
                created_at_ms: 0,
                modified_at_ms: 0,
            },
            Icon {
                id: DOCUMENTS_FOLDER_ID,
                label: "Documents".to_string(),
                kind: IconKind::Folder,
                document: None,
                link: None,
                created_at_ms: 0,
                modified_at_ms: 0,
            },
        ];
        Self {
            desktop: builtins,
            folder_contents: HashMap::new(),
            trash: Vec::new(),
            clipboard: None,
            next_user_icon: FIRST_USER_ICON_ID,
        }
    }
}

impl DesktopItems {
    /// Icons currently on the desktop, in display order.
    pub fn desktop_icons(&self) -> &[Icon] {
        &self.desktop
    }

    /// Display order of desktop icon ids.
    pub fn display_order(&self) -> Vec<IconId> {
        self.desktop.iter().map(|i| i.id).collect()
    }

    /// Looks up a desktop icon by id.
    pub fn icon(&self, id: IconId) -> Option<&Icon> {
        self.desktop.iter().find(|i| i.id == id)
    }

    /// Contents of a folder, empty when the folder has never been filled.
    pub fn folder_contents(&self, folder: IconId) -> &[Icon] {
        self.folder_contents
            .get(&folder)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Current trash contents, oldest first.
    pub fn trash_contents(&self) -> &[TrashedIcon] {
        &self.trash
    }

    /// The current clipboard snapshot, if any.
    pub fn clipboard(&self) -> Option<&ClipboardItem> {
        self.clipboard.as_ref()
    }

    /// Creates a user icon on the desktop and returns its id.
    pub fn create_icon(
        &mut self,
        label: impl Into<String>,
        kind: IconKind,
        now_ms: u64,
    ) -> IconId {
        let id = IconId(self.next_user_icon);
        self.next_user_icon += 1;
        self.desktop.push(Icon {
            id,
            label: label.into(),
            kind,
            document: None,
            link: None,
            created_at_ms: now_ms,
            modified_at_ms: now_ms,
        });
        id
    }

    /// Renames a user icon. Built-in icons keep their identity.
    pub fn rename(&mut self, id: IconId, label: impl Into<String>, now_ms: u64) -> bool {
        let Some(icon) = self.desktop.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        if icon.is_builtin() {
            return false;
        }
        icon.label = label.into();
        icon.modified_at_ms = now_ms;
        true
    }

    /// Copies a desktop icon's snapshot onto the clipboard.
    pub fn copy_to_clipboard(&mut self, id: IconId) -> bool {
        match self.icon(id) {
            Some(icon) => {
                self.clipboard = Some(ClipboardItem { icon: icon.clone() });
                true
            }
            None => false,
        }
    }

    /// Pastes the clipboard snapshot as a fresh user icon.
    ///
    /// The paste is independent of the original: it gets a new id and a
    /// `copy` label suffix, and survives the original being trashed.
    pub fn paste(&mut self, now_ms: u64) -> Option<IconId> {
        let snapshot = self.clipboard.clone()?;
        let id = IconId(self.next_user_icon);
        self.next_user_icon += 1;
        let mut icon = snapshot.icon;
        icon.id = id;
        icon.label = format!("{} copy", icon.label);
        icon.created_at_ms = now_ms;
        icon.modified_at_ms = now_ms;
        self.desktop.push(icon);
        Some(id)
    }

    /// Moves a desktop icon into the trash, recording its position.
    ///
    /// The drive icon is never trashed.
    pub fn trash(&mut self, id: IconId, position: Point, now_ms: u64) -> bool {
        if id == DRIVE_ICON_ID {
            return false;
        }
        let Some(index) = self.desktop.iter().position(|i| i.id == id) else {
            return false;
        };
        let icon = self.desktop.remove(index);
        self.trash.push(TrashedIcon {
            icon,
            previous_position: position,
            trashed_at_ms: now_ms,
        });
        true
    }

    /// Puts a trashed icon back on the desktop, returning its pre-trash
    /// position for the caller to re-commit.
    pub fn restore_trashed(&mut self, id: IconId) -> Option<Point> {
        let index = self.trash.iter().position(|t| t.icon.id == id)?;
        let trashed = self.trash.remove(index);
        let position = trashed.previous_position;
        self.desktop.push(trashed.icon);
        Some(position)
    }

    /// Discards every trashed icon. Returns how many were discarded.
    pub fn empty_trash(&mut self) -> usize {
        std::mem::take(&mut self.trash).len()
    }

    /// Moves a desktop icon into a folder's contents.
    ///
    /// The target must be a folder-kind icon on the desktop; the drive is
    /// never filed.
    pub fn file_into_folder(&mut self, id: IconId, folder: IconId) -> bool {
        if id == DRIVE_ICON_ID || id == folder {
            return false;
        }
        let folder_ok = self
            .icon(folder)
            .map(|i| matches!(i.kind, IconKind::Folder | IconKind::BurnFolder))
            .unwrap_or(false);
        if !folder_ok {
            return false;
        }
        let Some(index) = self.desktop.iter().position(|i| i.id == id) else {
            return false;
        };
        let icon = self.desktop.remove(index);
        self.folder_contents.entry(folder).or_default().push(icon);
        true
    }

    /// Arranges desktop icons by `key`.
    ///
    /// The comparison deliberately treats every pair of user-created icons
    /// as equal, so for them the stable sort is a no-op; only built-ins
    /// carry a fixed rank. Source behavior preserved pending a product
    /// decision on user-icon ordering.
    pub fn sort_user_icons(&mut self, key: SortKey) {
        let _ = key;
        self.desktop.sort_by(|a, b| match (a.is_builtin(), b.is_builtin()) {
            (true, true) => a.id.cmp(&b.id),
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            (false, false) => std::cmp::Ordering::Equal,
        });
    }

    /// Builds the persistable payload (built-ins are reconstructed, not
    /// stored).
    pub fn snapshot(&self, positions: Vec<(IconId, Point)>) -> DesktopSnapshot {
        DesktopSnapshot {
            schema_version: DESKTOP_SNAPSHOT_SCHEMA_VERSION,
            user_icons: self
                .desktop
                .iter()
                .filter(|i| !i.is_builtin())
                .cloned()
                .collect(),
            positions,
            trash: self.trash.clone(),
        }
    }

    /// Rebuilds the collections from a persisted snapshot.
    pub fn apply_snapshot(&mut self, snapshot: &DesktopSnapshot) {
        let mut items = Self::default();
        items.desktop.extend(snapshot.user_icons.iter().cloned());
        items.trash = snapshot.trash.clone();
        items.next_user_icon = items
            .desktop
            .iter()
            .chain(items.trash.iter().map(|t| &t.icon))
            .map(|i| i.id.0)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
            .max(FIRST_USER_ICON_ID);
        *self = items;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn trash_and_restore_round_trip_keeps_the_recorded_position() {
        let mut items = DesktopItems::default();
        let id = items.create_icon("Notes", IconKind::File, 10);
        assert!(items.trash(id, Point::new(400, 250), 11));
        assert!(items.icon(id).is_none());
        assert_eq!(items.trash_contents().len(), 1);

        assert_eq!(items.restore_trashed(id), Some(Point::new(400, 250)));
        assert!(items.icon(id).is_some());
        assert!(items.trash_contents().is_empty());
    }

    #[test]
    fn the_drive_refuses_trash_and_folder_filing() {
        let mut items = DesktopItems::default();
        assert!(!items.trash(DRIVE_ICON_ID, Point::new(0, 0), 1));
        assert!(!items.file_into_folder(DRIVE_ICON_ID, DOCUMENTS_FOLDER_ID));
        assert!(items.icon(DRIVE_ICON_ID).is_some());
    }

    #[test]
    fn filing_moves_the_icon_out_of_the_desktop_list() {
        let mut items = DesktopItems::default();
        let id = items.create_icon("Report", IconKind::File, 5);
        assert!(items.file_into_folder(id, DOCUMENTS_FOLDER_ID));
        assert!(items.icon(id).is_none());
        assert_eq!(items.folder_contents(DOCUMENTS_FOLDER_ID).len(), 1);

        // Not a folder: filing into a plain file is refused.
        let doc = items.create_icon("Target", IconKind::File, 6);
        let other = items.create_icon("Loose", IconKind::File, 7);
        assert!(!items.file_into_folder(other, doc));
    }

    #[test]
    fn paste_is_independent_of_the_original() {
        let mut items = DesktopItems::default();
        let id = items.create_icon("Draft", IconKind::File, 20);
        assert!(items.copy_to_clipboard(id));
        items.trash(id, Point::new(0, 0), 21);

        let pasted = items.paste(22).expect("paste from clipboard");
        let icon = items.icon(pasted).unwrap();
        assert_eq!(icon.label, "Draft copy");
        assert_ne!(pasted, id);
    }

    #[test]
    fn rename_applies_to_user_icons_only() {
        let mut items = DesktopItems::default();
        let id = items.create_icon("Untitled", IconKind::Folder, 30);
        assert!(items.rename(id, "Projects", 31));
        assert_eq!(items.icon(id).unwrap().label, "Projects");
        assert!(!items.rename(DRIVE_ICON_ID, "Hacked", 32));
        assert_eq!(items.icon(DRIVE_ICON_ID).unwrap().label, "System Disk");
    }

    #[test]
    fn sort_keeps_user_icon_order_stable() {
        let mut items = DesktopItems::default();
        let c = items.create_icon("c", IconKind::File, 3);
        let a = items.create_icon("a", IconKind::Folder, 1);
        let b = items.create_icon("b", IconKind::File, 2);

        items.sort_user_icons(SortKey::Kind);
        let order: Vec<IconId> = items.display_order();
        assert_eq!(order, vec![DRIVE_ICON_ID, DOCUMENTS_FOLDER_ID, c, a, b]);

        items.sort_user_icons(SortKey::Date);
        assert_eq!(items.display_order(), order);
    }

    #[test]
    fn snapshot_round_trip_rebuilds_user_state_and_id_allocator() {
        let mut items = DesktopItems::default();
        let a = items.create_icon("Keep", IconKind::File, 1);
        let b = items.create_icon("Bin", IconKind::File, 2);
        items.trash(b, Point::new(9, 9), 3);

        let snapshot = items.snapshot(vec![(a, Point::new(50, 60))]);
        let mut reloaded = DesktopItems::default();
        reloaded.apply_snapshot(&snapshot);

        assert_eq!(reloaded.icon(a).unwrap().label, "Keep");
        assert_eq!(reloaded.trash_contents().len(), 1);
        let next = reloaded.create_icon("Fresh", IconKind::File, 4);
        assert!(next.0 > b.0);
    }
}
