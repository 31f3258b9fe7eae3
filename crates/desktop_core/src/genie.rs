//! Slice geometry and phase sequencing for the genie minimize/restore effect.
//!
//! The effect captures a bitmap of the window, replaces it with a stack of
//! one-pixel-tall horizontal slices, pinches the slices into a sine-wave
//! silhouette toward the dock target, then slides the slice backgrounds down
//! into the target. Everything here is pure data: the runtime layer owns the
//! timers and the DOM, and drives [`GenieTransition`] with named events so the
//! lifecycle commit only happens once the animation reports completion.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// A captured window bitmap, kept as an encoded data URL.
pub struct CapturedBitmap {
    /// Bitmap width in pixels.
    pub width: i32,
    /// Bitmap height in pixels.
    pub height: i32,
    /// Encoded image payload (`data:` URL).
    pub data_url: String,
}

impl CapturedBitmap {
    /// The empty bitmap handed to completion hooks when capture failed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns whether this bitmap carries no pixels.
    pub fn is_empty(&self) -> bool {
        self.data_url.is_empty()
    }
}

/// Horizontal offset of one slice on the settled sine-wave silhouette.
///
/// Every slice follows the same curve, phase-shifted by
/// `index * (PI / step_count)`; `amplitude` is driven by the horizontal
/// distance between the window and the dock target. `subtract` flips the
/// offset direction for the far edge of the silhouette.
pub fn slice_wave_offset(index: usize, step_count: usize, amplitude: f64, subtract: bool) -> i32 {
    if step_count == 0 {
        return 0;
    }
    let phase = index as f64 * (PI / step_count as f64);
    let offset = (phase.sin() * amplitude).round() as i32;
    if subtract {
        -offset
    } else {
        offset
    }
}

/// Vertical background offset mapping slice `index` onto its bitmap row.
///
/// The slice stack is `step_count` rows tall while the bitmap is
/// `bitmap_height` rows tall, so rows are scaled linearly.
pub fn slice_background_offset(index: usize, step_count: usize, bitmap_height: i32) -> i32 {
    if step_count == 0 {
        return 0;
    }
    -((index as i64 * bitmap_height as i64) / step_count as i64) as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Placement of one horizontal slice: its row and horizontal extent.
pub struct SliceBand {
    /// Absolute top edge of the slice row.
    pub top: i32,
    /// Absolute left edge.
    pub left: i32,
    /// Slice width.
    pub width: i32,
}

/// Number of one-pixel slices for a collapse from `window` into `target`:
/// the vertical distance between the two top edges.
pub fn slice_step_count(window: Rect, target: Rect) -> usize {
    (target.y - window.y).unsigned_abs().max(1) as usize
}

/// The flat (un-pinched) slice profile covering the window frame.
pub fn flat_profile(window: Rect, target: Rect) -> Vec<SliceBand> {
    let steps = slice_step_count(window, target);
    (0..steps)
        .map(|i| SliceBand {
            top: window.y + i as i32,
            left: window.x,
            width: window.w,
        })
        .collect()
}

/// The settled pinched profile: each slice's left edge and width offset along
/// the phase-shifted sine curve toward the target.
pub fn pinched_profile(window: Rect, target: Rect) -> Vec<SliceBand> {
    let steps = slice_step_count(window, target);
    let left_amplitude = (target.x - window.x) as f64;
    let width_amplitude = (window.w - target.w) as f64;
    let narrowest = target.w.min(window.w);
    (0..steps)
        .map(|i| SliceBand {
            top: window.y + i as i32,
            left: window.x + slice_wave_offset(i, steps, left_amplitude, false),
            width: (window.w - slice_wave_offset(i, steps, width_amplitude, false)).max(narrowest),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Uniform playback-speed divisor for every phase duration and delay.
///
/// Holding the shell's slow-motion modifier key selects `Slow`/`Slowest`.
pub enum GenieSpeed {
    /// Normal playback.
    #[default]
    Normal,
    /// Half-speed playback.
    Slow,
    /// Quarter-speed playback.
    Slowest,
}

impl GenieSpeed {
    /// Duration multiplier applied to every phase.
    pub const fn multiplier(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Slow => 2,
            Self::Slowest => 4,
        }
    }

    /// Scales a base duration by this speed.
    pub const fn scale(self, base_ms: u32) -> u32 {
        base_ms * self.multiplier()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One visual phase of the genie timeline.
pub enum GeniePhase {
    /// Curve the slices' left/width into the pinched silhouette.
    Pinch,
    /// Slide every slice background toward the target's vertical offset while
    /// collapsing the container height.
    Slide,
    /// Fan the slices back out to the flat rectangle (expand only).
    Straighten,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A scheduled phase: wait `delay_ms`, then run for `duration_ms`.
pub struct GeniePhaseSpec {
    /// Phase to run.
    pub phase: GeniePhase,
    /// Delay before the phase starts.
    pub delay_ms: u32,
    /// Transition duration.
    pub duration_ms: u32,
}

const PINCH_DELAY_MS: u32 = 40;
const PINCH_DURATION_MS: u32 = 300;
const SLIDE_DELAY_MS: u32 = 20;
const SLIDE_DURATION_MS: u32 = 330;

/// Fixed phase timeline for a collapse (minimize), scaled by `speed`.
pub fn collapse_timeline(speed: GenieSpeed) -> Vec<GeniePhaseSpec> {
    vec![
        GeniePhaseSpec {
            phase: GeniePhase::Pinch,
            delay_ms: speed.scale(PINCH_DELAY_MS),
            duration_ms: speed.scale(PINCH_DURATION_MS),
        },
        GeniePhaseSpec {
            phase: GeniePhase::Slide,
            delay_ms: speed.scale(SLIDE_DELAY_MS),
            duration_ms: speed.scale(SLIDE_DURATION_MS),
        },
    ]
}

/// Fixed phase timeline for an expand (restore): the collapse mirrored.
pub fn expand_timeline(speed: GenieSpeed) -> Vec<GeniePhaseSpec> {
    vec![
        GeniePhaseSpec {
            phase: GeniePhase::Slide,
            delay_ms: speed.scale(PINCH_DELAY_MS),
            duration_ms: speed.scale(SLIDE_DURATION_MS),
        },
        GeniePhaseSpec {
            phase: GeniePhase::Straighten,
            delay_ms: speed.scale(SLIDE_DELAY_MS),
            duration_ms: speed.scale(PINCH_DURATION_MS),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Direction of a genie transition.
pub enum GenieDirection {
    /// Window is being sucked into the dock target.
    Collapse,
    /// Window is expanding back out of the dock target.
    Expand,
}

#[derive(Debug, Clone, PartialEq)]
/// Events fed into [`GenieTransition`] by the animation driver.
pub enum GenieEvent {
    /// Bitmap capture succeeded; slices can be seeded.
    CaptureReady(CapturedBitmap),
    /// Bitmap capture failed; the transition must abort.
    CaptureFailed,
    /// The currently running phase's timer fired.
    PhaseFinished,
}

#[derive(Debug, Clone, PartialEq)]
/// Instruction returned to the animation driver after each event.
pub enum GenieStep {
    /// Schedule the given phase.
    RunPhase(GeniePhaseSpec),
    /// Animation finished; commit the gated lifecycle transition. The bitmap
    /// is returned for reuse (dock thumbnail, later expand).
    Complete {
        /// Captured bitmap, empty when capture was skipped.
        bitmap: CapturedBitmap,
    },
    /// Capture failed; tear the overlay down and keep the prior stable state.
    Abort,
    /// Stale event (transition already settled); nothing to do.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionState {
    AwaitingCapture,
    Running,
    Settled,
}

#[derive(Debug, Clone, PartialEq)]
/// Event-driven state machine for one genie animation.
///
/// The owning controller creates one transition per gesture and feeds it
/// [`GenieEvent`]s; the returned [`GenieStep`] tells the driver what to
/// schedule next. The underlying lifecycle commit must only happen when
/// [`GenieStep::Complete`] is returned.
pub struct GenieTransition {
    direction: GenieDirection,
    timeline: Vec<GeniePhaseSpec>,
    next_phase: usize,
    bitmap: CapturedBitmap,
    state: TransitionState,
}

impl GenieTransition {
    /// Starts a collapse; the driver must deliver a capture event first.
    pub fn collapse(speed: GenieSpeed) -> Self {
        Self {
            direction: GenieDirection::Collapse,
            timeline: collapse_timeline(speed),
            next_phase: 0,
            bitmap: CapturedBitmap::empty(),
            state: TransitionState::AwaitingCapture,
        }
    }

    /// Starts an expand seeded with the bitmap captured during collapse.
    pub fn expand(bitmap: CapturedBitmap, speed: GenieSpeed) -> Self {
        Self {
            direction: GenieDirection::Expand,
            timeline: expand_timeline(speed),
            next_phase: 0,
            bitmap,
            state: TransitionState::Running,
        }
    }

    /// Direction of this transition.
    pub fn direction(&self) -> GenieDirection {
        self.direction
    }

    /// Bitmap seeded into the slice overlay.
    pub fn bitmap(&self) -> &CapturedBitmap {
        &self.bitmap
    }

    /// Returns the first step for a transition that needs no capture.
    pub fn start(&mut self) -> GenieStep {
        if self.state != TransitionState::Running || self.next_phase != 0 {
            return GenieStep::Ignored;
        }
        self.advance()
    }

    /// Applies one driver event.
    pub fn handle(&mut self, event: GenieEvent) -> GenieStep {
        match (self.state, event) {
            (TransitionState::AwaitingCapture, GenieEvent::CaptureReady(bitmap)) => {
                self.bitmap = bitmap;
                self.state = TransitionState::Running;
                self.advance()
            }
            (TransitionState::AwaitingCapture, GenieEvent::CaptureFailed) => {
                self.state = TransitionState::Settled;
                GenieStep::Abort
            }
            (TransitionState::Running, GenieEvent::PhaseFinished) => self.advance(),
            _ => GenieStep::Ignored,
        }
    }

    fn advance(&mut self) -> GenieStep {
        if let Some(spec) = self.timeline.get(self.next_phase).copied() {
            self.next_phase += 1;
            GenieStep::RunPhase(spec)
        } else {
            self.state = TransitionState::Settled;
            GenieStep::Complete {
                bitmap: std::mem::take(&mut self.bitmap),
            }
        }
    }
}
