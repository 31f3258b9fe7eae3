//! Pure interaction core for the desktop shell: window lifecycle and z-order,
//! genie slice math, icon selection/drag/drop engines, and the desktop
//! controller that composes them. No DOM or framework types; the runtime
//! crate drives everything here through plain calls and owns the timers.

pub mod desktop;
pub mod drag;
pub mod drop_targets;
pub mod genie;
pub mod geometry;
pub mod icons;
pub mod lifecycle;
pub mod model;
pub mod positions;
pub mod registry;
pub mod selection;

pub use desktop::{DesktopInteractionController, PointerModifiers, ShellEffect};
pub use drag::{DragCoordinator, DragRelease, HandleRegistry, IconHandle};
pub use drop_targets::{DropResolution, DropTargetResolver};
pub use genie::{
    slice_wave_offset, CapturedBitmap, GenieDirection, GenieEvent, GeniePhase, GeniePhaseSpec,
    GenieSpeed, GenieStep, GenieTransition,
};
pub use geometry::{Point, Rect};
pub use icons::{
    ClipboardItem, DesktopItems, DesktopSnapshot, Icon, IconKind, SortKey, TrashedIcon,
    DESKTOP_SNAPSHOT_SCHEMA_VERSION, DOCUMENTS_FOLDER_ID, DRIVE_ICON_ID,
};
pub use lifecycle::{RestoreStart, WindowController};
pub use model::*;
pub use positions::{clamp_to_viewport, IconPositionStore};
pub use registry::WindowRegistry;
pub use selection::SelectionEngine;
