//! Desktop shell UI composition and interaction surfaces.

mod desktop;
mod dock;
pub mod genie;
mod window;

use desktop_core::genie::GenieSpeed;
use desktop_core::{AppId, Point, Rect, WindowId, MENU_BAR_HEIGHT};
use leptos::*;

use self::{desktop::DesktopSurface, dock::Dock, genie::GenieOverlay, window::WindowFrame};
use crate::apps;
use crate::runtime_context::{use_shell_runtime, ShellRuntimeContext};

pub use crate::runtime_context::{ShellProvider, ShellRuntimeContext as RuntimeContext};

/// Titlebar height inside a window frame, used to derive content regions.
const TITLEBAR_HEIGHT: i32 = MENU_BAR_HEIGHT;

/// Content rect of a window frame (frame minus titlebar).
fn window_content_rect(bounds: Rect) -> Rect {
    Rect::new(
        bounds.x,
        bounds.y + TITLEBAR_HEIGHT,
        bounds.w,
        (bounds.h - TITLEBAR_HEIGHT).max(0),
    )
}

/// Keeps folder drop regions in sync with their presenting windows:
/// published while the window is visibly open, withdrawn when it minimizes
/// or closes.
fn install_folder_region_sync(runtime: ShellRuntimeContext) {
    create_effect(move |_| {
        let windows = runtime.windows_view.get().windows;
        let associations =
            runtime.folder_windows.with_value(|map| map.iter().map(|(w, f)| (*w, *f)).collect::<Vec<_>>());
        let mut stale = Vec::new();
        for (window_id, folder) in associations {
            match windows.iter().find(|w| w.id == window_id) {
                Some(window) if window.lifecycle.is_visible() => {
                    let region = window_content_rect(window.bounds);
                    runtime.desktop.update_value(|d| d.set_folder_region(folder, region));
                }
                Some(_) => {
                    runtime.desktop.update_value(|d| d.clear_folder_region(folder));
                }
                None => {
                    runtime.desktop.update_value(|d| d.clear_folder_region(folder));
                    stale.push(window_id);
                }
            }
        }
        if !stale.is_empty() {
            runtime.folder_windows.update_value(|map| {
                for window_id in stale {
                    map.remove(&window_id);
                }
            });
        }
    });
}

fn install_keyboard_shortcuts(runtime: ShellRuntimeContext) {
    let keydown = window_event_listener(ev::keydown, move |ev| {
        if ev.key() == "Shift" {
            let speed = if ev.ctrl_key() {
                GenieSpeed::Slowest
            } else {
                GenieSpeed::Slow
            };
            runtime.genie_speed.set(speed);
        }
        if ev.key() == "Escape" {
            runtime.update_desktop(|d| {
                d.cancel_gesture();
                Vec::new()
            });
            runtime.trash_hovered.set(false);
        }
    });
    let keyup = window_event_listener(ev::keyup, move |ev| {
        if ev.key() == "Shift" {
            runtime.genie_speed.set(GenieSpeed::Normal);
        }
    });
    on_cleanup(move || {
        keydown.remove();
        keyup.remove();
    });
}

#[component]
/// Renders the full desktop shell: icon field, window layer, genie overlay,
/// and dock.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_shell_runtime();
    install_folder_region_sync(runtime);
    install_keyboard_shortcuts(runtime);

    let window_ids = Signal::derive(move || {
        runtime
            .windows_view
            .get()
            .windows
            .iter()
            .map(|w| w.id)
            .collect::<Vec<_>>()
    });

    view! {
        <div class="desktop-shell">
            <DesktopSurface />
            <div class="window-layer">
                <For
                    each=move || window_ids.get()
                    key=|id| *id
                    children=move |id: WindowId| view! { <WindowFrame window_id=id /> }
                />
            </div>
            <GenieOverlay />
            <Dock />
        </div>
    }
}
