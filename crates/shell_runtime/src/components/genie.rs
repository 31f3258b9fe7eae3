//! Genie animation driver and slice overlay rendering.
//!
//! The driver owns the timers: it requests the gated lifecycle transition,
//! spawns the bitmap capture, and feeds [`GenieEvent`]s into the window
//! controller, scheduling each returned phase with `set_timeout`. The
//! lifecycle commit happens inside the controller only when the final phase
//! reports completion, so window content never disappears early.

use std::time::Duration;

use desktop_core::genie::{
    flat_profile, pinched_profile, slice_background_offset, slice_step_count, CapturedBitmap,
    GenieDirection, GeniePhase, GeniePhaseSpec, GenieStep, SliceBand,
};
use desktop_core::{RestoreStart, Rect, WindowId, DOCK_HEIGHT};
use leptos::*;

use crate::runtime_context::{use_shell_runtime, GenieOverlayState, ShellRuntimeContext};

/// Edge length of one dock slot.
pub const DOCK_SLOT: i32 = 48;
/// Gap between dock slots and around the dock edges.
pub const DOCK_GAP: i32 = 10;
/// Duration of the window close fade.
pub const CLOSE_FADE_MS: u32 = 160;

/// DOM id of a window frame, used by the capture hook.
pub fn window_dom_id(id: WindowId) -> String {
    format!("shell-window-{}", id.0)
}

/// Dock slot rect for the minimized thumbnail at `index`, computed
/// geometrically from the viewport (slots fill from the left edge).
pub fn dock_slot_rect(index: usize, viewport: Rect) -> Rect {
    Rect::new(
        DOCK_GAP + index as i32 * (DOCK_SLOT + DOCK_GAP),
        viewport.h - DOCK_HEIGHT + (DOCK_HEIGHT - DOCK_SLOT) / 2,
        DOCK_SLOT,
        DOCK_SLOT,
    )
}

/// Dock rect of the trash, pinned to the right edge.
pub fn dock_trash_rect(viewport: Rect) -> Rect {
    Rect::new(
        viewport.w - DOCK_GAP - DOCK_SLOT,
        viewport.h - DOCK_HEIGHT + (DOCK_HEIGHT - DOCK_SLOT) / 2,
        DOCK_SLOT,
        DOCK_SLOT,
    )
}

/// Starts a gated minimize for `id`: capture first, then the collapse
/// timeline, with the minimized commit deferred to the final phase.
pub fn start_minimize(runtime: ShellRuntimeContext, id: WindowId) {
    let speed = runtime.genie_speed.get_untracked();
    let slot = runtime.windows.with_value(|c| {
        c.registry()
            .minimized_windows()
            .count()
    });
    let started = runtime.update_windows(|c| c.request_minimize(id, speed));
    if !started {
        return;
    }
    let Some(frame) = runtime
        .windows
        .with_value(|c| c.registry().window(id).map(|w| w.bounds))
    else {
        return;
    };
    let viewport = runtime.host.get_value().viewport_rect();
    let target = dock_slot_rect(slot, viewport);
    runtime.genie_overlay.set(Some(GenieOverlayState {
        window_id: id,
        frame,
        target,
        bitmap: CapturedBitmap::empty(),
        direction: GenieDirection::Collapse,
        phase: None,
        duration_ms: 0,
    }));

    let capture = runtime.host.get_value().capture_service();
    spawn_local(async move {
        let dom_id = window_dom_id(id);
        let step = match capture.capture_window(&dom_id, frame).await {
            Ok(bitmap) => {
                runtime.genie_overlay.update(|overlay| {
                    if let Some(overlay) = overlay.as_mut() {
                        overlay.bitmap = bitmap.clone();
                    }
                });
                runtime.update_windows(|c| c.capture_ready(id, bitmap))
            }
            Err(err) => {
                logging::warn!("window capture failed: {err}");
                runtime.update_windows(|c| c.capture_failed(id))
            }
        };
        drive_step(runtime, id, step);
    });
}

/// Starts a gated restore for `id`, replaying the retained bitmap out of its
/// dock slot. Without a bitmap the restore commits immediately.
pub fn start_restore(runtime: ShellRuntimeContext, id: WindowId) {
    let speed = runtime.genie_speed.get_untracked();
    let slot = runtime.windows.with_value(|c| {
        c.registry()
            .minimized_windows()
            .position(|w| w.id == id)
            .unwrap_or(0)
    });
    let frame = runtime
        .windows
        .with_value(|c| c.registry().window(id).map(|w| w.bounds));
    let start = runtime.update_windows(|c| c.request_restore(id, speed));
    let RestoreStart::Animated(step) = start else {
        return;
    };
    let (Some(frame), Some(bitmap)) = (
        frame,
        runtime
            .windows
            .with_value(|c| c.transition(id).map(|t| t.bitmap().clone())),
    ) else {
        drive_step(runtime, id, step);
        return;
    };
    let viewport = runtime.host.get_value().viewport_rect();
    runtime.genie_overlay.set(Some(GenieOverlayState {
        window_id: id,
        frame,
        target: dock_slot_rect(slot, viewport),
        bitmap,
        direction: GenieDirection::Expand,
        phase: None,
        duration_ms: 0,
    }));
    drive_step(runtime, id, step);
}

/// Starts the close fade; removal commits when the fade timer fires.
pub fn start_close(runtime: ShellRuntimeContext, id: WindowId) {
    if !runtime.update_windows(|c| c.request_close(id)) {
        return;
    }
    set_timeout(
        move || {
            runtime.update_windows(|c| c.close_finished(id));
        },
        Duration::from_millis(CLOSE_FADE_MS as u64),
    );
}

/// When a phase's styles are applied and when its timer reports completion,
/// relative to the step being issued. The slices keep their previous
/// placement until `start`, so the delay is a visible hold, not a dead span
/// inside the transition.
fn phase_schedule(spec: GeniePhaseSpec) -> (Duration, Duration) {
    let start = Duration::from_millis(spec.delay_ms as u64);
    let finish = Duration::from_millis((spec.delay_ms + spec.duration_ms) as u64);
    (start, finish)
}

fn drive_step(runtime: ShellRuntimeContext, id: WindowId, step: GenieStep) {
    match step {
        GenieStep::RunPhase(spec) => {
            let (start, finish) = phase_schedule(spec);
            set_timeout(
                move || {
                    runtime.genie_overlay.update(|overlay| {
                        if let Some(overlay) = overlay.as_mut() {
                            overlay.phase = Some(spec.phase);
                            overlay.duration_ms = spec.duration_ms;
                        }
                    });
                },
                start,
            );
            set_timeout(
                move || {
                    let next = runtime.update_windows(|c| c.phase_finished(id));
                    drive_step(runtime, id, next);
                },
                finish,
            );
        }
        GenieStep::Complete { .. } | GenieStep::Abort => {
            runtime.genie_overlay.set(None);
        }
        GenieStep::Ignored => {}
    }
}

/// Style for slice `index` of the overlay in its current phase.
fn band_style(
    index: usize,
    overlay: &GenieOverlayState,
    flat: &[SliceBand],
    pinched: &[SliceBand],
) -> String {
    let steps = slice_step_count(overlay.frame, overlay.target);
    let settled = match (overlay.direction, overlay.phase) {
        // Collapse: flat at rest, pinched during the pinch, swallowed into
        // the target during the slide.
        (GenieDirection::Collapse, None) => flat.get(index).copied(),
        (GenieDirection::Collapse, Some(GeniePhase::Pinch)) => pinched.get(index).copied(),
        (GenieDirection::Collapse, Some(_)) => None,
        // Expand: the slide pulls the pinched silhouette out of the target,
        // the straighten phase relaxes it to flat.
        (GenieDirection::Expand, None | Some(GeniePhase::Slide)) => pinched.get(index).copied(),
        (GenieDirection::Expand, Some(_)) => flat.get(index).copied(),
    };
    let (top, left, width) = match settled {
        Some(band) => (band.top, band.left, band.width),
        // Swallowed: every band converges on the target slot.
        None => (overlay.target.y, overlay.target.x, overlay.target.w),
    };
    let background_y = slice_background_offset(index, steps, overlay.bitmap.height.max(1));
    format!(
        "top:{top}px;left:{left}px;width:{width}px;height:1px;\
         background-image:url('{}');background-size:{}px {}px;\
         background-position:0px {background_y}px;\
         transition:all {}ms ease-in;",
        overlay.bitmap.data_url,
        width.max(1),
        overlay.bitmap.height.max(1),
        overlay.duration_ms
    )
}

#[component]
/// Renders the slice overlay for the in-flight genie animation.
pub fn GenieOverlay() -> impl IntoView {
    let runtime = use_shell_runtime();
    let overlay = runtime.genie_overlay;

    view! {
        <Show when=move || overlay.get().is_some() fallback=|| ()>
            {move || {
                let Some(state) = overlay.get() else {
                    return ().into_view();
                };
                let steps = slice_step_count(state.frame, state.target);
                let flat = flat_profile(state.frame, state.target);
                let pinched = pinched_profile(state.frame, state.target);
                view! {
                    <div class="genie-overlay" aria-hidden="true">
                        {(0..steps)
                            .map(|index| {
                                view! {
                                    <div
                                        class="genie-slice"
                                        style=band_style(index, &state, &flat, &pinched)
                                    />
                                }
                            })
                            .collect_view()}
                    </div>
                }
                    .into_view()
            }}
        </Show>
    }
}
