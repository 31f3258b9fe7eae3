//! Core identifiers, layout constants, and window records for the desktop shell.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Rect;

/// Horizontal/vertical cascade step applied between successively opened windows.
pub const CASCADE_STEP: i32 = 30;
/// Number of cascade slots before the open offset wraps back to the origin.
pub const CASCADE_WRAP: i32 = 8;
/// Left edge of the first cascaded window.
pub const CASCADE_BASE_X: i32 = 60;
/// Top edge of the first cascaded window.
pub const CASCADE_BASE_Y: i32 = 52;

/// Default width for a newly opened window.
pub const DEFAULT_WINDOW_WIDTH: i32 = 540;
/// Default height for a newly opened window.
pub const DEFAULT_WINDOW_HEIGHT: i32 = 380;
/// Minimum managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 220;
/// Minimum managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 140;
/// Width applied by the zoom toggle.
pub const ZOOMED_WINDOW_WIDTH: i32 = 960;
/// Height applied by the zoom toggle.
pub const ZOOMED_WINDOW_HEIGHT: i32 = 620;

/// Height of the menu bar strip reserved at the top of the viewport.
pub const MENU_BAR_HEIGHT: i32 = 24;
/// Height of the dock strip reserved at the bottom of the viewport.
pub const DOCK_HEIGHT: i32 = 70;
/// Width of one desktop icon cell.
pub const ICON_CELL_WIDTH: i32 = 80;
/// Height of one desktop icon cell.
pub const ICON_CELL_HEIGHT: i32 = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Stable identifier for a managed window.
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Stable identifier for a desktop icon.
pub struct IconId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of the application that owns a window's content.
pub struct AppId(String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Validation error for [`AppId`] construction.
pub enum AppIdError {
    /// The raw identifier did not match the dotted lowercase-segment policy.
    #[error("invalid app id `{0}`; expected dotted lowercase segments")]
    Invalid(String),
}

impl AppId {
    /// Returns an app identifier when `raw` conforms to the
    /// `segment.segment...` policy (lowercase ASCII, digits, `-`).
    pub fn new(raw: impl Into<String>) -> Result<Self, AppIdError> {
        let raw = raw.into();
        if is_valid_app_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(AppIdError::Invalid(raw))
        }
    }

    /// Creates an id without validation for trusted compile-time constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_valid_app_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 120 {
        return false;
    }
    raw.split('.').all(|part| {
        !part.is_empty()
            && part.as_bytes()[0].is_ascii_lowercase()
            && !part.ends_with('-')
            && part
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Lifecycle state of a managed window.
pub enum WindowLifecycle {
    /// Fully open and interactive.
    Open,
    /// Collapse animation in flight; the minimized commit is pending.
    Minimizing,
    /// Hidden in the dock.
    Minimized,
    /// Expand animation in flight; the open commit is pending.
    Restoring,
    /// Close animation in flight; the removal commit is pending.
    Closing,
}

impl WindowLifecycle {
    /// Returns whether the window occupies screen space in this state.
    ///
    /// Windows mid-animation still occupy their frame; only a minimized
    /// window is removed from the visible set and from z-order comparisons.
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Minimized)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Canonical record for one managed window.
pub struct WindowRecord {
    /// Stable window identifier.
    pub id: WindowId,
    /// Owning application.
    pub app: AppId,
    /// Display title.
    pub title: String,
    /// Current frame bounds.
    pub bounds: Rect,
    /// Stacking key; higher renders above lower.
    pub z_index: u32,
    /// Current lifecycle state.
    pub lifecycle: WindowLifecycle,
    /// Whether the zoom toggle is currently applied.
    pub zoomed: bool,
    /// Bounds saved by zoom, restored on un-zoom.
    pub saved_bounds: Option<Rect>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn app_id_policy_accepts_dotted_lowercase() {
        assert!(AppId::new("shell.finder").is_ok());
        assert!(AppId::new("media-player").is_ok());
        assert!(AppId::new("").is_err());
        assert!(AppId::new("Shell.Finder").is_err());
        assert!(AppId::new("shell..finder").is_err());
        assert!(AppId::new("shell.finder-").is_err());
    }

    #[test]
    fn minimized_is_the_only_invisible_lifecycle() {
        assert!(WindowLifecycle::Open.is_visible());
        assert!(WindowLifecycle::Minimizing.is_visible());
        assert!(WindowLifecycle::Restoring.is_visible());
        assert!(WindowLifecycle::Closing.is_visible());
        assert_eq!(WindowLifecycle::Minimized.is_visible(), false);
    }
}
